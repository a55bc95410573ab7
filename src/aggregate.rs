use std::collections::BTreeMap;

use crate::dataset::{Dataset, SeasonRecord};
use crate::filter::{FilterState, TeamChoice};
use crate::metrics::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    LeagueAverage,
    SelectedTeam,
}

/// One renderable line: (year, value) points strictly increasing by year.
/// Ephemeral: rebuilt from dataset + filter on every relevant change.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub role: SeriesRole,
    pub metric: Metric,
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub league: Vec<Series>,
    pub team: Vec<Series>,
}

impl Aggregation {
    /// Display order: league-average lines first, then team lines.
    pub fn into_series(self) -> Vec<Series> {
        let mut out = self.league;
        out.extend(self.team);
        out
    }
}

/// Restrict the dataset to the filter's league scope and year range, then
/// produce one league-average series per requested metric and, when a team
/// is selected, one team series per requested metric.
///
/// Output ordering ascending by year is an invariant the renderer consumes
/// directly; it must not re-sort. A selected team with no qualifying seasons
/// yields an empty team series, not an error.
pub fn aggregate(dataset: &Dataset, filter: &FilterState) -> Aggregation {
    let (year_lo, year_hi) = filter.year_range();
    let scoped: Vec<&SeasonRecord> = dataset
        .records()
        .iter()
        .filter(|record| {
            filter.league().admits(record.league) && (year_lo..=year_hi).contains(&record.year)
        })
        .collect();

    let metrics = filter.mode().metrics();
    let league_label = filter.league().label();

    let league = metrics
        .iter()
        .map(|&metric| Series {
            role: SeriesRole::LeagueAverage,
            metric,
            label: format!("{} avg {}", league_label, metric.info().legend_label),
            points: yearly_means(&scoped, metric),
        })
        .collect();

    let team = match filter.team() {
        TeamChoice::All => Vec::new(),
        TeamChoice::Name(name) => {
            let team_scoped: Vec<&SeasonRecord> = scoped
                .iter()
                .copied()
                .filter(|record| record.team == *name)
                .collect();
            metrics
                .iter()
                .map(|&metric| Series {
                    role: SeriesRole::SelectedTeam,
                    metric,
                    label: format!("{} {}", name, metric.info().legend_label),
                    // A team contributes at most one record per year, so the
                    // per-year mean degenerates to its own per-game value.
                    points: yearly_means(&team_scoped, metric),
                })
                .collect()
        }
    };

    Aggregation { league, team }
}

/// Arithmetic mean per year over records where the metric is available.
/// Years where no record carries the metric are skipped, not emitted as zero.
fn yearly_means(records: &[&SeasonRecord], metric: Metric) -> Vec<(f64, f64)> {
    let mut by_year: BTreeMap<i32, (f64, u32)> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.metric(metric) {
            let slot = by_year.entry(record.year).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, (sum, count))| (year as f64, sum / count as f64))
        .collect()
}
