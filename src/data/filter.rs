//! Filter Controller
//! Applies the sidebar selections (date range, years, seasons, weather) to both tables.

use super::model::{Dataset, RentalRecord, Season, Table};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// The current sidebar selection.
///
/// An empty set selects nothing. `weather` is `None` when no table has a
/// weather column; the weather predicate is then skipped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub years: BTreeSet<i32>,
    pub seasons: BTreeSet<Season>,
    pub weather: Option<BTreeSet<String>>,
}

impl FilterState {
    /// Everything selected: the state shown on first load.
    pub fn full_domain(dataset: &Dataset) -> Self {
        let (start, end) = dataset
            .date_domain()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));

        Self {
            start,
            end,
            years: dataset.year_options().into_iter().collect(),
            seasons: dataset.season_options().into_iter().collect(),
            weather: dataset
                .weather_enabled()
                .then(|| dataset.weather_options().into_iter().collect()),
        }
    }

    /// Keep the date interval inside `[min, max]`.
    pub fn clamp_dates(&mut self, min: NaiveDate, max: NaiveDate) {
        self.start = self.start.clamp(min, max);
        self.end = self.end.clamp(min, max);
    }

    /// Row predicate. `table_has_weather` disables the weather test for
    /// tables without a weather column.
    pub fn matches<R: RentalRecord>(&self, row: &R, table_has_weather: bool) -> bool {
        let date = row.date();
        if date < self.start || date > self.end {
            return false;
        }
        if !self.years.contains(&row.year()) || !self.seasons.contains(&row.season()) {
            return false;
        }
        match (&self.weather, table_has_weather) {
            (Some(selected), true) => row.weather().is_some_and(|w| selected.contains(w)),
            _ => true,
        }
    }

    /// Filter one table, preserving row order.
    pub fn apply<R: RentalRecord + Clone>(&self, table: &Table<R>) -> Table<R> {
        let has_weather = table.weather.is_some();
        let rows = table
            .rows
            .iter()
            .filter(|row| self.matches(*row, has_weather))
            .cloned()
            .collect();
        Table::new(rows, table.weather)
    }

    /// Filter both tables.
    pub fn apply_dataset(&self, dataset: &Dataset) -> Dataset {
        Dataset {
            daily: self.apply(&dataset.daily),
            hourly: self.apply(&dataset.hourly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DailyRecord, HourlyRecord, Month, WeatherColumn, Weekday};
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(date: NaiveDate, season: Season, weather: &str, count: u32) -> DailyRecord {
        DailyRecord {
            date,
            year: date.year(),
            month: Month::Jan,
            season,
            weather: Some(weather.to_string()),
            count,
            casual: count / 2,
            registered: count - count / 2,
        }
    }

    fn hourly(date: NaiveDate, hour: u8, season: Season) -> HourlyRecord {
        HourlyRecord {
            date,
            hour,
            year: date.year(),
            season,
            weekday: Weekday::Monday,
            weather: None,
            count: 10,
            casual: 4,
            registered: 6,
        }
    }

    fn hourly_with_weather(date: NaiveDate, hour: u8, weather: Option<&str>) -> HourlyRecord {
        HourlyRecord {
            weather: weather.map(str::to_string),
            ..hourly(date, hour, Season::Spring)
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            daily: Table::new(
                vec![
                    daily(date(2011, 1, 1), Season::Spring, "Clear", 100),
                    daily(date(2011, 7, 1), Season::Fall, "Cloudy", 300),
                    daily(date(2012, 1, 1), Season::Spring, "Light Rain", 50),
                    daily(date(2012, 7, 1), Season::Fall, "Clear", 500),
                ],
                Some(WeatherColumn::WeatherLabel),
            ),
            hourly: Table::new(
                vec![
                    hourly(date(2011, 1, 1), 8, Season::Spring),
                    hourly(date(2012, 7, 1), 17, Season::Fall),
                ],
                None,
            ),
        }
    }

    #[test]
    fn test_full_domain_returns_everything() {
        let ds = dataset();
        let filter = FilterState::full_domain(&ds);
        assert_eq!(filter.start, date(2011, 1, 1));
        assert_eq!(filter.end, date(2012, 7, 1));
        assert_eq!(filter.apply_dataset(&ds), ds);
    }

    #[test]
    fn test_full_domain_keeps_weather_label_missing_from_hourly() {
        let ds = Dataset {
            daily: Table::new(
                vec![
                    daily(date(2011, 1, 1), Season::Spring, "Clear", 100),
                    daily(date(2011, 1, 2), Season::Spring, "Mist", 80),
                ],
                Some(WeatherColumn::Weather),
            ),
            hourly: Table::new(
                vec![hourly_with_weather(date(2011, 1, 1), 8, Some("Clear"))],
                Some(WeatherColumn::Weather),
            ),
        };
        let filter = FilterState::full_domain(&ds);
        assert_eq!(ds.weather_options(), vec!["Clear".to_string(), "Mist".to_string()]);
        assert_eq!(filter.apply_dataset(&ds), ds);
    }

    #[test]
    fn test_full_domain_covers_hourly_only_rows() {
        let mut ds = dataset();
        ds.hourly.rows.push(hourly(date(2013, 3, 1), 9, Season::Winter));

        let filter = FilterState::full_domain(&ds);
        assert!(filter.years.contains(&2013));
        assert!(filter.seasons.contains(&Season::Winter));
        assert_eq!(filter.end, date(2013, 3, 1));
        assert_eq!(filter.apply_dataset(&ds), ds);
    }

    #[test]
    fn test_weather_filter_applies_to_hourly_table() {
        let ds = Dataset {
            daily: Table::new(
                vec![daily(date(2011, 1, 1), Season::Spring, "Clear", 100)],
                Some(WeatherColumn::Weather),
            ),
            hourly: Table::new(
                vec![
                    hourly_with_weather(date(2011, 1, 1), 7, Some("Clear")),
                    hourly_with_weather(date(2011, 1, 1), 8, Some("Mist")),
                    hourly_with_weather(date(2011, 1, 1), 9, None),
                    hourly_with_weather(date(2011, 1, 1), 10, Some("Clear")),
                ],
                Some(WeatherColumn::Weather),
            ),
        };
        let mut filter = FilterState::full_domain(&ds);
        filter.weather = Some(["Clear".to_string()].into_iter().collect());

        let out = filter.apply(&ds.hourly);
        let hours: Vec<_> = out.rows.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![7, 10]);
    }

    #[test]
    fn test_missing_weather_excluded_while_filter_active() {
        let ds = Dataset {
            daily: Table::new(Vec::new(), None),
            hourly: Table::new(
                vec![
                    hourly_with_weather(date(2011, 1, 1), 7, Some("Clear")),
                    hourly_with_weather(date(2011, 1, 1), 9, None),
                ],
                Some(WeatherColumn::Weather),
            ),
        };
        let mut filter = FilterState::full_domain(&ds);
        filter.weather = Some(["Clear".to_string(), "Mist".to_string()].into_iter().collect());
        let out = filter.apply(&ds.hourly);
        assert_eq!(out.len(), 1);
        assert!(out.rows.iter().all(|r| r.weather.is_some()));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.start = date(2011, 6, 1);
        filter.seasons = [Season::Fall].into_iter().collect();

        let once = filter.apply_dataset(&ds);
        let twice = filter.apply_dataset(&once);
        assert_eq!(once, twice);
        assert_eq!(once.daily.len(), 2);
        assert_eq!(once.hourly.len(), 1);
    }

    #[test]
    fn test_date_interval_is_inclusive() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.start = date(2011, 7, 1);
        filter.end = date(2012, 1, 1);
        let out = filter.apply(&ds.daily);
        let dates: Vec<_> = out.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2011, 7, 1), date(2012, 1, 1)]);
    }

    #[test]
    fn test_weather_skipped_for_table_without_column() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.weather = Some(["Clear".to_string()].into_iter().collect());

        let out = filter.apply_dataset(&ds);
        assert_eq!(out.daily.len(), 2);
        assert!(out.daily.rows.iter().all(|r| r.weather.as_deref() == Some("Clear")));
        assert_eq!(out.hourly.len(), 2);
    }

    #[test]
    fn test_empty_selection_yields_empty_tables() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.years.clear();
        let out = filter.apply_dataset(&ds);
        assert!(out.daily.is_empty());
        assert!(out.hourly.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.years = [2012].into_iter().collect();
        let out = filter.apply(&ds.daily);
        let counts: Vec<_> = out.rows.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![50, 500]);
    }

    #[test]
    fn test_clamp_dates() {
        let ds = dataset();
        let mut filter = FilterState::full_domain(&ds);
        filter.start = date(2000, 1, 1);
        filter.end = date(2030, 1, 1);
        filter.clamp_dates(date(2011, 1, 1), date(2012, 7, 1));
        assert_eq!(filter.start, date(2011, 1, 1));
        assert_eq!(filter.end, date(2012, 7, 1));
    }
}
