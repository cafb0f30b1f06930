//! Data module - CSV loading, typed tables, filtering and reshaping

mod filter;
mod loader;
mod model;
mod processor;

pub use filter::FilterState;
pub use loader::{DataLoader, DataSources, LoadError};
pub use model::{
    DailyRecord, DailyTable, Dataset, HourlyRecord, HourlyTable, Month, RentalRecord, Season,
    Table, UserType, WeatherColumn, Weekday,
};
pub use processor::{DataProcessor, LongRow, UserTypeValues};
