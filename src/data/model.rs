//! Data Model Module
//! Typed records for the daily and hourly rental tables and their categorical domains.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A categorical value that matched none of the accepted labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} label: {value:?}")]
pub struct LabelError {
    pub kind: &'static str,
    pub value: String,
}

impl LabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Parse a numeric code such as `"3"` or `"3.0"`.
fn numeric_code(value: &str) -> Option<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

/// Season of the year. Declaration order is the chart axis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl FromStr for Season {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(code) = numeric_code(s) {
            return match code {
                1 => Ok(Season::Spring),
                2 => Ok(Season::Summer),
                3 => Ok(Season::Fall),
                4 => Ok(Season::Winter),
                _ => Err(LabelError::new("season", s)),
            };
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(LabelError::new("season", s)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Row index in the weekday x hour grid.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Weekday {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Raw bike-sharing data counts weekdays from Sunday = 0.
        if let Some(code) = numeric_code(s) {
            return match code {
                0 => Ok(Weekday::Sunday),
                1 => Ok(Weekday::Monday),
                2 => Ok(Weekday::Tuesday),
                3 => Ok(Weekday::Wednesday),
                4 => Ok(Weekday::Thursday),
                5 => Ok(Weekday::Friday),
                6 => Ok(Weekday::Saturday),
                _ => Err(LabelError::new("weekday", s)),
            };
        }
        let lower = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| {
                let name = day.label().to_ascii_lowercase();
                lower == name || lower == name[..3]
            })
            .ok_or_else(|| LabelError::new("weekday", s))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar month, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::Jan => "January",
            Month::Feb => "February",
            Month::Mar => "March",
            Month::Apr => "April",
            Month::May => "May",
            Month::Jun => "June",
            Month::Jul => "July",
            Month::Aug => "August",
            Month::Sep => "September",
            Month::Oct => "October",
            Month::Nov => "November",
            Month::Dec => "December",
        }
    }
}

impl FromStr for Month {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(code) = numeric_code(s) {
            return usize::try_from(code)
                .ok()
                .and_then(|c| c.checked_sub(1))
                .and_then(|i| Month::ALL.get(i).copied())
                .ok_or_else(|| LabelError::new("month", s));
        }
        let label = s.trim();
        Month::ALL
            .into_iter()
            .find(|m| {
                label.eq_ignore_ascii_case(m.label()) || label.eq_ignore_ascii_case(m.name())
            })
            .ok_or_else(|| LabelError::new("month", s))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rental user category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum UserType {
    Casual,
    Registered,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Casual, UserType::Registered];

    /// Lowercase label, as used in the hourly long-form table.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Casual => "casual",
            UserType::Registered => "registered",
        }
    }

    /// Capitalized label, as used in the comparison charts.
    pub fn title(&self) -> &'static str {
        match self {
            UserType::Casual => "Casual",
            UserType::Registered => "Registered",
        }
    }
}

/// Which of the two known weather column names a table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherColumn {
    Weather,
    WeatherLabel,
}

impl WeatherColumn {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherColumn::Weather => "weather",
            WeatherColumn::WeatherLabel => "weather_label",
        }
    }

    /// Detect the weather column from a header, preferring `weather`.
    pub fn detect<S: AsRef<str>>(columns: &[S]) -> Option<Self> {
        let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);
        if has(WeatherColumn::Weather.name()) {
            Some(WeatherColumn::Weather)
        } else if has(WeatherColumn::WeatherLabel.name()) {
            Some(WeatherColumn::WeatherLabel)
        } else {
            None
        }
    }
}

/// One row per calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: Month,
    pub season: Season,
    pub weather: Option<String>,
    pub count: u32,
    pub casual: u32,
    pub registered: u32,
}

/// One row per (date, hour).
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub year: i32,
    pub season: Season,
    pub weekday: Weekday,
    pub weather: Option<String>,
    pub count: u32,
    pub casual: u32,
    pub registered: u32,
}

/// Columns shared by both tables, used by the filter and the user-type views.
pub trait RentalRecord {
    fn date(&self) -> NaiveDate;
    fn year(&self) -> i32;
    fn season(&self) -> Season;
    fn weather(&self) -> Option<&str>;
    fn count(&self) -> u32;
    fn casual(&self) -> u32;
    fn registered(&self) -> u32;

    /// Whether `casual + registered == count` holds for this row.
    fn is_consistent(&self) -> bool {
        u64::from(self.casual()) + u64::from(self.registered()) == u64::from(self.count())
    }
}

macro_rules! impl_rental_record {
    ($ty:ty) => {
        impl RentalRecord for $ty {
            fn date(&self) -> NaiveDate {
                self.date
            }
            fn year(&self) -> i32 {
                self.year
            }
            fn season(&self) -> Season {
                self.season
            }
            fn weather(&self) -> Option<&str> {
                self.weather.as_deref()
            }
            fn count(&self) -> u32 {
                self.count
            }
            fn casual(&self) -> u32 {
                self.casual
            }
            fn registered(&self) -> u32 {
                self.registered
            }
        }
    };
}

impl_rental_record!(DailyRecord);
impl_rental_record!(HourlyRecord);

/// An immutable table plus its resolved weather capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    pub rows: Vec<R>,
    pub weather: Option<WeatherColumn>,
}

pub type DailyTable = Table<DailyRecord>;
pub type HourlyTable = Table<HourlyRecord>;

impl<R> Table<R> {
    pub fn new(rows: Vec<R>, weather: Option<WeatherColumn>) -> Self {
        Self { rows, weather }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: RentalRecord> Table<R> {
    pub fn years(&self) -> BTreeSet<i32> {
        self.rows.iter().map(|r| r.year()).collect()
    }

    pub fn seasons(&self) -> BTreeSet<Season> {
        self.rows.iter().map(|r| r.season()).collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date()).min()?;
        let max = self.rows.iter().map(|r| r.date()).max()?;
        Some((min, max))
    }

    pub fn weather_labels(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|r| r.weather().map(str::to_string))
            .collect()
    }

    pub fn inconsistent_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_consistent()).count()
    }
}

/// Both loaded tables. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub daily: DailyTable,
    pub hourly: HourlyTable,
}

/// Option sets below span both tables, so the full-domain filter keeps every row.
impl Dataset {
    /// Min and max date over both tables.
    pub fn date_domain(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.daily.date_range(), self.hourly.date_range()) {
            (Some((a_min, a_max)), Some((b_min, b_max))) => {
                Some((a_min.min(b_min), a_max.max(b_max)))
            }
            (daily, hourly) => daily.or(hourly),
        }
    }

    pub fn year_options(&self) -> Vec<i32> {
        let mut years = self.daily.years();
        years.extend(self.hourly.years());
        years.into_iter().collect()
    }

    pub fn season_options(&self) -> Vec<Season> {
        let mut seasons = self.daily.seasons();
        seasons.extend(self.hourly.seasons());
        seasons.into_iter().collect()
    }

    /// Weather is filterable when either table carries a weather column.
    pub fn weather_enabled(&self) -> bool {
        self.hourly.weather.is_some() || self.daily.weather.is_some()
    }

    /// Sorted weather labels found in either table.
    pub fn weather_options(&self) -> Vec<String> {
        let mut labels = self.daily.weather_labels();
        labels.extend(self.hourly.weather_labels());
        labels.into_iter().collect()
    }
}
