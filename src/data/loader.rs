//! CSV Data Loader Module
//! Reads the daily and hourly rental tables with Polars and converts them to typed records.

use super::model::{
    DailyRecord, DailyTable, Dataset, HourlyRecord, HourlyTable, Month, Season, WeatherColumn,
    Weekday,
};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },
    #[error("{table} table, row {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        table: &'static str,
        row: usize,
        column: String,
        value: String,
    },
    #[error("{table} table has no rows")]
    Empty { table: &'static str },
}

/// Paths of the two source files. Also the memoization key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub day_csv: PathBuf,
    pub hour_csv: PathBuf,
}

impl DataSources {
    pub fn new(day_csv: impl Into<PathBuf>, hour_csv: impl Into<PathBuf>) -> Self {
        Self {
            day_csv: day_csv.into(),
            hour_csv: hour_csv.into(),
        }
    }
}

/// Loads both tables once and hands out the cached dataset on repeat calls.
pub struct DataLoader {
    cached: Option<(DataSources, Arc<Dataset>)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Load both tables, reusing the previous result if the sources are unchanged.
    pub fn load(&mut self, sources: &DataSources) -> Result<Arc<Dataset>, LoadError> {
        if let Some((cached_sources, dataset)) = &self.cached {
            if cached_sources == sources {
                log::debug!("Reusing cached dataset for {:?}", sources);
                return Ok(Arc::clone(dataset));
            }
        }

        let dataset = Arc::new(load_dataset(sources)?);
        self.cached = Some((sources.clone(), Arc::clone(&dataset)));
        Ok(dataset)
    }
}

/// Read both files without caching.
pub fn load_dataset(sources: &DataSources) -> Result<Dataset, LoadError> {
    let daily = load_daily(&sources.day_csv)?;
    let hourly = load_hourly(&sources.hour_csv)?;

    log::info!(
        "Loaded {} daily rows from {} and {} hourly rows from {}",
        daily.len(),
        sources.day_csv.display(),
        hourly.len(),
        sources.hour_csv.display()
    );

    for (name, weather) in [("daily", daily.weather), ("hourly", hourly.weather)] {
        match weather {
            Some(column) => log::info!("{} table weather column: {}", name, column.name()),
            None => log::warn!(
                "{} table has no weather column; weather filtering is disabled for it",
                name
            ),
        }
    }

    // casual + registered == count is expected but not enforced.
    let daily_mismatch = daily.inconsistent_rows();
    let hourly_mismatch = hourly.inconsistent_rows();
    if daily_mismatch > 0 || hourly_mismatch > 0 {
        log::warn!(
            "casual + registered != count in {} daily and {} hourly rows",
            daily_mismatch,
            hourly_mismatch
        );
    }

    Ok(Dataset { daily, hourly })
}

fn read_frame(path: &Path) -> Result<DataFrame, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let path_str = path.to_string_lossy().to_string();
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;
    Ok(df)
}

/// Typed column access over a loaded frame.
struct Columns<'a> {
    df: &'a DataFrame,
    table: &'static str,
}

impl<'a> Columns<'a> {
    fn new(df: &'a DataFrame, table: &'static str) -> Result<Self, LoadError> {
        if df.height() == 0 {
            return Err(LoadError::Empty { table });
        }
        Ok(Self { df, table })
    }

    fn names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn column(&self, name: &str) -> Result<&Column, LoadError> {
        self.df.column(name).map_err(|_| LoadError::MissingColumn {
            table: self.table,
            column: name.to_string(),
        })
    }

    fn strings(&self, name: &str) -> Result<Vec<Option<String>>, LoadError> {
        let casted = self.column(name)?.cast(&DataType::String)?;
        let ca = casted.as_materialized_series().str()?;
        Ok(ca
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect())
    }

    fn integers(&self, name: &str) -> Result<Vec<Option<i64>>, LoadError> {
        let casted = self.column(name)?.cast(&DataType::Int64)?;
        let ca = casted.as_materialized_series().i64()?;
        Ok(ca.into_iter().collect())
    }

    fn invalid(&self, row: usize, column: &str, value: impl ToString) -> LoadError {
        LoadError::InvalidValue {
            table: self.table,
            row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn dates(&self, name: &str) -> Result<Vec<NaiveDate>, LoadError> {
        self.strings(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.unwrap_or_default();
                parse_date(&value).ok_or_else(|| self.invalid(row, name, &value))
            })
            .collect()
    }

    fn labels<T: FromStr>(&self, name: &str) -> Result<Vec<T>, LoadError> {
        self.strings(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.unwrap_or_default();
                value.parse::<T>().map_err(|_| self.invalid(row, name, &value))
            })
            .collect()
    }

    fn counts(&self, name: &str) -> Result<Vec<u32>, LoadError> {
        self.integers(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| self.invalid(row, name, display_opt(value)))
            })
            .collect()
    }

    fn years(&self, name: &str) -> Result<Vec<i32>, LoadError> {
        self.integers(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| self.invalid(row, name, display_opt(value)))
            })
            .collect()
    }

    fn hours(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        self.integers(name)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .filter(|v| (0..=23).contains(v))
                    .map(|v| v as u8)
                    .ok_or_else(|| self.invalid(row, name, display_opt(value)))
            })
            .collect()
    }

    fn weather(&self) -> Result<(Option<WeatherColumn>, Vec<Option<String>>), LoadError> {
        let names = self.names();
        match WeatherColumn::detect(names.as_slice()) {
            Some(column) => {
                let values = self
                    .strings(column.name())?
                    .into_iter()
                    .map(|v| v.filter(|s| !s.is_empty()))
                    .collect();
                Ok((Some(column), values))
            }
            None => Ok((None, vec![None; self.df.height()])),
        }
    }
}

fn display_opt(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

pub fn load_daily(path: &Path) -> Result<DailyTable, LoadError> {
    let df = read_frame(path)?;
    let cols = Columns::new(&df, "daily")?;

    let dates = cols.dates("date")?;
    let years = cols.years("year")?;
    let months = cols.labels::<Month>("month")?;
    let seasons = cols.labels::<Season>("season")?;
    let counts = cols.counts("count")?;
    let casual = cols.counts("casual")?;
    let registered = cols.counts("registered")?;
    let (weather_column, weather) = cols.weather()?;

    let rows = (0..df.height())
        .map(|i| DailyRecord {
            date: dates[i],
            year: years[i],
            month: months[i],
            season: seasons[i],
            weather: weather[i].clone(),
            count: counts[i],
            casual: casual[i],
            registered: registered[i],
        })
        .collect();

    Ok(DailyTable::new(rows, weather_column))
}

pub fn load_hourly(path: &Path) -> Result<HourlyTable, LoadError> {
    let df = read_frame(path)?;
    let cols = Columns::new(&df, "hourly")?;

    let dates = cols.dates("date")?;
    let hours = cols.hours("hour")?;
    let years = cols.years("year")?;
    let seasons = cols.labels::<Season>("season")?;
    let weekdays = cols.labels::<Weekday>("weekday")?;
    let counts = cols.counts("count")?;
    let casual = cols.counts("casual")?;
    let registered = cols.counts("registered")?;
    let (weather_column, weather) = cols.weather()?;

    let rows = (0..df.height())
        .map(|i| HourlyRecord {
            date: dates[i],
            hour: hours[i],
            year: years[i],
            season: seasons[i],
            weekday: weekdays[i],
            weather: weather[i].clone(),
            count: counts[i],
            casual: casual[i],
            registered: registered[i],
        })
        .collect();

    Ok(HourlyTable::new(rows, weather_column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DAY_CSV: &str = "\
date,year,month,season,weather_label,count,casual,registered
2011-01-01,2011,Jan,Spring,Cloudy,985,331,654
2011-01-02,2011,Jan,Spring,Clear,801,131,670
2012-07-04,2012,Jul,Fall,Clear,7403,3065,4338
";

    const HOUR_CSV: &str = "\
date,hour,year,season,weekday,weather,count,casual,registered
2011-01-01,0,2011,Spring,Saturday,Clear,16,3,13
2011-01-01,1,2011,Spring,Saturday,Clear,40,8,32
2012-07-04,17,2012,Fall,Wednesday,Light Rain,500,120,380
";

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn sources(dir: &TempDir) -> DataSources {
        DataSources::new(
            write(dir, "day.csv", DAY_CSV),
            write(dir, "hour.csv", HOUR_CSV),
        )
    }

    #[test]
    fn test_loads_typed_tables() {
        let dir = TempDir::new().unwrap();
        let dataset = load_dataset(&sources(&dir)).unwrap();

        assert_eq!(dataset.daily.len(), 3);
        assert_eq!(dataset.hourly.len(), 3);
        assert_eq!(dataset.daily.weather, Some(WeatherColumn::WeatherLabel));
        assert_eq!(dataset.hourly.weather, Some(WeatherColumn::Weather));

        let first = &dataset.daily.rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.season, Season::Spring);
        assert_eq!(first.month, Month::Jan);
        assert_eq!(first.weather.as_deref(), Some("Cloudy"));
        assert_eq!(first.count, 985);

        let last = &dataset.hourly.rows[2];
        assert_eq!(last.hour, 17);
        assert_eq!(last.weekday, Weekday::Wednesday);
        assert_eq!(last.weather.as_deref(), Some("Light Rain"));
    }

    #[test]
    fn test_missing_weather_column_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let day = write(
            &dir,
            "day.csv",
            "date,year,month,season,count,casual,registered\n2011-01-01,2011,1,1,10,4,6\n",
        );
        let table = load_daily(&day).unwrap();
        assert_eq!(table.weather, None);
        assert_eq!(table.rows[0].weather, None);
        assert_eq!(table.rows[0].season, Season::Spring);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_daily(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::MissingFile { .. }));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let day = write(&dir, "day.csv", "date,year,count\n2011-01-01,2011,5\n");
        let err = load_daily(&day).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { table: "daily", .. }));
    }

    #[test]
    fn test_invalid_hour_rejected() {
        let dir = TempDir::new().unwrap();
        let hour = write(
            &dir,
            "hour.csv",
            "date,hour,year,season,weekday,count,casual,registered\n2011-01-01,24,2011,Spring,Saturday,1,0,1\n",
        );
        let err = load_hourly(&hour).unwrap_err();
        match err {
            LoadError::InvalidValue { column, row, .. } => {
                assert_eq!(column, "hour");
                assert_eq!(row, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_date_with_time_part() {
        assert_eq!(
            parse_date("2012-03-05 00:00:00"),
            NaiveDate::from_ymd_opt(2012, 3, 5)
        );
        assert_eq!(parse_date("05/03/2012"), None);
    }

    #[test]
    fn test_loader_memoizes_by_sources() {
        let dir = TempDir::new().unwrap();
        let sources = sources(&dir);
        let mut loader = DataLoader::new();

        let first = loader.load(&sources).unwrap();
        // Removing the files proves the second call never touches disk.
        fs::remove_file(&sources.day_csv).unwrap();
        let second = loader.load(&sources).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = DataSources::new(dir.path().join("other.csv"), &sources.hour_csv);
        assert!(loader.load(&other).is_err());
    }
}
