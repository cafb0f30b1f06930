//! Seasonal and weather breakdowns of average daily rentals.

use super::mean;
use crate::data::{DailyRecord, DailyTable, Season};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean daily `count` for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean<K> {
    pub category: K,
    pub mean: f64,
}

/// Mean `count` by season (rows) and weather (columns); absent cells are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonWeatherPivot {
    pub seasons: Vec<Season>,
    pub weather: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

pub struct SeasonalStats;

impl SeasonalStats {
    /// Group values by key (keys come out in `Ord` order) and take the mean.
    fn grouped_means<K: Ord>(pairs: impl Iterator<Item = (K, f64)>) -> Vec<CategoryMean<K>> {
        let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
        for (key, value) in pairs {
            groups.entry(key).or_default().push(value);
        }
        groups
            .into_iter()
            .map(|(category, values)| CategoryMean {
                category,
                mean: mean(&values),
            })
            .collect()
    }

    /// Stable descending sort, so ties keep the key order.
    fn sort_descending<K>(means: &mut [CategoryMean<K>]) {
        means.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    }

    /// Mean daily rentals per season, highest first. Ties keep Spring..Winter order.
    pub fn season_means(rows: &[DailyRecord]) -> Vec<CategoryMean<Season>> {
        let mut means =
            Self::grouped_means(rows.iter().map(|r| (r.season, f64::from(r.count))));
        Self::sort_descending(&mut means);
        means
    }

    /// Mean daily rentals per weather label, highest first.
    ///
    /// `None` when the table has no weather column. Rows without a label are skipped.
    pub fn weather_means(table: &DailyTable) -> Option<Vec<CategoryMean<String>>> {
        table.weather?;
        let mut means = Self::grouped_means(
            table
                .rows
                .iter()
                .filter_map(|r| r.weather.clone().map(|w| (w, f64::from(r.count)))),
        );
        Self::sort_descending(&mut means);
        Some(means)
    }

    /// Season x weather pivot of mean daily rentals.
    ///
    /// Rows are the seasons present, in canonical order; columns are the
    /// weather labels present, sorted. `None` when the table has no weather column.
    pub fn season_weather_pivot(table: &DailyTable) -> Option<SeasonWeatherPivot> {
        table.weather?;

        let mut cells: BTreeMap<(Season, &str), Vec<f64>> = BTreeMap::new();
        for row in &table.rows {
            if let Some(weather) = row.weather.as_deref() {
                cells
                    .entry((row.season, weather))
                    .or_default()
                    .push(f64::from(row.count));
            }
        }

        let mut seasons: Vec<Season> = cells.keys().map(|(s, _)| *s).collect();
        seasons.dedup();
        let mut weather: Vec<String> = cells.keys().map(|(_, w)| w.to_string()).collect();
        weather.sort();
        weather.dedup();

        let values = seasons
            .iter()
            .map(|season| {
                weather
                    .iter()
                    .map(|w| {
                        cells
                            .get(&(*season, w.as_str()))
                            .map(|v| mean(v))
                            .unwrap_or(0.0)
                    })
                    .collect()
            })
            .collect();

        Some(SeasonWeatherPivot {
            seasons,
            weather,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Month, WeatherColumn};
    use chrono::NaiveDate;

    fn row(day: u32, season: Season, weather: Option<&str>, count: u32) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2011, 3, day).unwrap(),
            year: 2011,
            month: Month::Mar,
            season,
            weather: weather.map(str::to_string),
            count,
            casual: 0,
            registered: count,
        }
    }

    fn table(rows: Vec<DailyRecord>) -> DailyTable {
        DailyTable::new(rows, Some(WeatherColumn::Weather))
    }

    #[test]
    fn test_season_means_sorted_descending() {
        let rows = vec![
            row(1, Season::Spring, None, 100),
            row(2, Season::Spring, None, 200),
            row(3, Season::Fall, None, 500),
            row(4, Season::Summer, None, 400),
        ];
        let means = SeasonalStats::season_means(&rows);
        let order: Vec<_> = means.iter().map(|m| m.category).collect();
        assert_eq!(order, vec![Season::Fall, Season::Summer, Season::Spring]);
        assert_eq!(means[2].mean, 150.0);
    }

    #[test]
    fn test_season_ties_keep_canonical_order() {
        let rows = vec![
            row(1, Season::Winter, None, 300),
            row(2, Season::Summer, None, 300),
            row(3, Season::Spring, None, 300),
        ];
        let order: Vec<_> = SeasonalStats::season_means(&rows)
            .into_iter()
            .map(|m| m.category)
            .collect();
        assert_eq!(order, vec![Season::Spring, Season::Summer, Season::Winter]);
    }

    #[test]
    fn test_weather_means_absent_column() {
        let t = DailyTable::new(vec![row(1, Season::Spring, None, 1)], None);
        assert!(SeasonalStats::weather_means(&t).is_none());
        assert!(SeasonalStats::season_weather_pivot(&t).is_none());
    }

    #[test]
    fn test_weather_means() {
        let t = table(vec![
            row(1, Season::Spring, Some("Clear"), 400),
            row(2, Season::Spring, Some("Light Rain"), 100),
            row(3, Season::Fall, Some("Clear"), 600),
        ]);
        let means = SeasonalStats::weather_means(&t).unwrap();
        assert_eq!(means[0].category, "Clear");
        assert_eq!(means[0].mean, 500.0);
        assert_eq!(means[1].category, "Light Rain");
    }

    #[test]
    fn test_pivot_fills_missing_with_zero() {
        let t = table(vec![
            row(1, Season::Fall, Some("Clear"), 600),
            row(2, Season::Spring, Some("Clear"), 200),
            row(3, Season::Spring, Some("Cloudy"), 100),
            row(4, Season::Spring, Some("Cloudy"), 300),
        ]);
        let pivot = SeasonalStats::season_weather_pivot(&t).unwrap();
        assert_eq!(pivot.seasons, vec![Season::Spring, Season::Fall]);
        assert_eq!(pivot.weather, vec!["Clear".to_string(), "Cloudy".to_string()]);
        assert_eq!(pivot.values, vec![vec![200.0, 200.0], vec![600.0, 0.0]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(SeasonalStats::season_means(&[]).is_empty());
        let pivot = SeasonalStats::season_weather_pivot(&table(Vec::new())).unwrap();
        assert!(pivot.seasons.is_empty());
        assert!(pivot.weather.is_empty());
    }
}
