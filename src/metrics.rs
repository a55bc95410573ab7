use crate::dataset::RawTeamSeason;

/// Closed set of per-game derived statistics the chart can plot.
///
/// Dispatch is data-driven through [`MetricInfo`]; adding a metric means
/// adding a variant here and one table row below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Runs,
    Hits,
    Strikeouts,
    RunsAllowed,
}

impl Metric {
    pub const COUNT: usize = 4;
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Runs,
        Metric::Hits,
        Metric::Strikeouts,
        Metric::RunsAllowed,
    ];

    pub fn index(self) -> usize {
        match self {
            Metric::Runs => 0,
            Metric::Hits => 1,
            Metric::Strikeouts => 2,
            Metric::RunsAllowed => 3,
        }
    }

    pub fn info(self) -> &'static MetricInfo {
        &METRIC_TABLE[self.index()]
    }
}

/// One dispatch-table entry per metric: where the numerator comes from and
/// how the metric is labelled on the axis, legend, and tooltip.
pub struct MetricInfo {
    pub key: &'static str,
    pub display: &'static str,
    pub axis_label: &'static str,
    pub legend_label: &'static str,
    pub tooltip_label: &'static str,
    pub numerator: fn(&RawTeamSeason) -> Option<f64>,
}

pub static METRIC_TABLE: [MetricInfo; Metric::COUNT] = [
    MetricInfo {
        key: "runs",
        display: "Runs",
        axis_label: "Runs per Game",
        legend_label: "Runs/Game",
        tooltip_label: "runs/game",
        numerator: |row| row.runs,
    },
    MetricInfo {
        key: "hits",
        display: "Hits",
        axis_label: "Hits per Game",
        legend_label: "Hits/Game",
        tooltip_label: "hits/game",
        numerator: |row| row.hits,
    },
    MetricInfo {
        key: "strikeouts",
        display: "Strikeouts",
        axis_label: "Strikeouts per Game",
        legend_label: "SO/Game",
        tooltip_label: "so/game",
        numerator: |row| row.strikeouts,
    },
    MetricInfo {
        key: "runs_allowed",
        display: "Runs Allowed",
        axis_label: "Runs Allowed per Game",
        legend_label: "RA/Game",
        tooltip_label: "ra/game",
        numerator: |row| row.runs_allowed,
    },
];

/// What the metric selector currently requests: one metric, or the combined
/// runs+hits view. Combined only ever pairs per-game counting stats, so the
/// shared y-domain stays unit-comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricMode {
    Single(Metric),
    Combined,
}

impl MetricMode {
    /// Metrics requested for display, in stable legend order.
    pub fn metrics(self) -> Vec<Metric> {
        match self {
            MetricMode::Single(metric) => vec![metric],
            MetricMode::Combined => vec![Metric::Runs, Metric::Hits],
        }
    }

    pub fn next(self) -> MetricMode {
        match self {
            MetricMode::Single(Metric::Runs) => MetricMode::Single(Metric::Hits),
            MetricMode::Single(Metric::Hits) => MetricMode::Single(Metric::Strikeouts),
            MetricMode::Single(Metric::Strikeouts) => MetricMode::Single(Metric::RunsAllowed),
            MetricMode::Single(Metric::RunsAllowed) => MetricMode::Combined,
            MetricMode::Combined => MetricMode::Single(Metric::Runs),
        }
    }

    pub fn label(self) -> String {
        match self {
            MetricMode::Single(metric) => metric.info().display.to_string(),
            MetricMode::Combined => "Runs + Hits".to_string(),
        }
    }
}
