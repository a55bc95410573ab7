use ratatui::style::Color;

use crate::aggregate::{Series, SeriesRole, aggregate};
use crate::dataset::Dataset;
use crate::filter::{FilterState, TeamChoice};
use crate::metrics::{Metric, MetricMode};
use crate::scale::{ChartDomains, compute_domains, value_labels, year_labels};

pub const X_TICKS: usize = 4;
pub const Y_TICKS: usize = 4;

/// Stable stroke assignment: a given (role, metric) always renders in the
/// same color, so legend meaning never shifts between redraws.
pub fn series_color(role: SeriesRole, metric: Metric) -> Color {
    match (role, metric) {
        (SeriesRole::LeagueAverage, Metric::Runs) => Color::Blue,
        (SeriesRole::LeagueAverage, Metric::Hits) => Color::Red,
        (SeriesRole::LeagueAverage, Metric::Strikeouts) => Color::Magenta,
        (SeriesRole::LeagueAverage, Metric::RunsAllowed) => Color::Cyan,
        (SeriesRole::SelectedTeam, Metric::Runs) => Color::Yellow,
        (SeriesRole::SelectedTeam, Metric::Hits) => Color::LightYellow,
        (SeriesRole::SelectedTeam, Metric::Strikeouts) => Color::LightMagenta,
        (SeriesRole::SelectedTeam, Metric::RunsAllowed) => Color::LightCyan,
    }
}

/// Point-marker glyph per role so a team line reads differently from a
/// league line even where colors are remapped by the terminal theme.
pub fn series_marker(role: SeriesRole) -> &'static str {
    match role {
        SeriesRole::LeagueAverage => "●",
        SeriesRole::SelectedTeam => "■",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub marker: &'static str,
}

/// Legend holds one entry per non-empty (role, metric) series; empty series
/// render as absent lines with no legend entry.
pub fn legend_entries(series: &[Series]) -> Vec<LegendEntry> {
    series
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| LegendEntry {
            label: s.label.clone(),
            color: series_color(s.role, s.metric),
            marker: series_marker(s.role),
        })
        .collect()
}

/// Chart title, a pure function of the current filter.
pub fn title_text(filter: &FilterState) -> String {
    let what = match filter.mode() {
        MetricMode::Single(metric) => format!("{} per Game by Year", metric.info().display),
        MetricMode::Combined => "Runs and Hits per Game by Year".to_string(),
    };
    let mut title = format!("{} {}", filter.league().label(), what);
    if let TeamChoice::Name(name) = filter.team() {
        title.push_str(&format!(" - {} vs league average", name));
    }
    title
}

pub fn y_axis_title(filter: &FilterState) -> &'static str {
    match filter.mode() {
        MetricMode::Single(metric) => metric.info().axis_label,
        MetricMode::Combined => "Value per Game",
    }
}

/// Everything one render pass needs, derived in a single step from the
/// dataset and filter. Rebuilt whole after each filter mutation; the
/// renderer holds no state of its own between passes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub series: Vec<Series>,
    pub domains: ChartDomains,
    pub title: String,
    pub y_title: &'static str,
    pub legend: Vec<LegendEntry>,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl ChartModel {
    pub fn build(dataset: &Dataset, filter: &FilterState) -> ChartModel {
        let series = aggregate(dataset, filter).into_series();
        let domains = compute_domains(&series, filter.year_range());
        ChartModel {
            legend: legend_entries(&series),
            title: title_text(filter),
            y_title: y_axis_title(filter),
            x_labels: year_labels(domains.x, X_TICKS),
            y_labels: value_labels(domains.y, Y_TICKS),
            series,
            domains,
        }
    }
}
