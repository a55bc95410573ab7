use std::collections::VecDeque;

use ratatui::layout::Rect;

use crate::chart::ChartModel;
use crate::dataset::{Dataset, LoadError};
use crate::filter::FilterState;
use crate::tooltip::{TooltipState, hit_test};

const MAX_LOG_LINES: usize = 200;

/// Lifecycle of the working dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed(LoadError),
}

/// Messages the loader thread sends back to the UI loop.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded(Dataset),
    Failed(LoadError),
    Log(String),
}

/// Everything the UI loop reads and mutates. Filter mutations funnel through
/// the methods below; each one performs exactly one chart recompute so a
/// single keypress never rebuilds the model twice.
pub struct AppState {
    pub phase: LoadPhase,
    pub dataset: Option<Dataset>,
    pub filter: Option<FilterState>,
    pub chart: Option<ChartModel>,
    pub tooltip: TooltipState,
    /// Plot area of the last draw; hit-testing maps pointer cells through it.
    pub plot: Option<Rect>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub source_label: String,
}

impl AppState {
    pub fn new(source_label: String) -> AppState {
        AppState {
            phase: LoadPhase::Loading,
            dataset: None,
            filter: None,
            chart: None,
            tooltip: TooltipState::Hidden,
            plot: None,
            logs: VecDeque::new(),
            help_overlay: false,
            source_label,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, LoadPhase::Ready)
    }

    pub fn push_log(&mut self, line: String) {
        if self.logs.len() == MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }

    pub fn apply_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Log(line) => self.push_log(line),
            LoadEvent::Loaded(dataset) => {
                let filter = FilterState::new(&dataset);
                let (min_year, max_year) = dataset.year_bounds();
                self.push_log(format!(
                    "[INFO] Dataset ready: seasons {}-{}",
                    min_year, max_year
                ));
                self.dataset = Some(dataset);
                self.filter = Some(filter);
                self.phase = LoadPhase::Ready;
                self.recompute_chart();
            }
            LoadEvent::Failed(err) => {
                self.push_log(format!("[WARN] Load failed: {}", err));
                self.phase = LoadPhase::Failed(err);
            }
        }
    }

    fn recompute_chart(&mut self) {
        if let (Some(dataset), Some(filter)) = (&self.dataset, &self.filter) {
            self.chart = Some(ChartModel::build(dataset, filter));
        }
        // Model changed under the pointer; the old hover target may be gone.
        self.tooltip = TooltipState::Hidden;
    }

    pub fn begin_retry(&mut self) {
        self.push_log("[INFO] Retrying load".to_string());
        self.phase = LoadPhase::Loading;
    }

    pub fn cycle_league(&mut self) {
        let (Some(dataset), Some(filter)) = (&self.dataset, &mut self.filter) else {
            return;
        };
        filter.cycle_league(dataset);
        let label = filter.league().label();
        self.push_log(format!("[INFO] League scope: {}", label));
        self.recompute_chart();
    }

    pub fn cycle_team(&mut self, step: i32) {
        let (Some(dataset), Some(filter)) = (&self.dataset, &mut self.filter) else {
            return;
        };
        filter.cycle_team(dataset, step);
        let label = filter.team().label().to_string();
        self.push_log(format!("[INFO] Team: {}", label));
        self.recompute_chart();
    }

    pub fn cycle_metric_mode(&mut self) {
        let Some(filter) = &mut self.filter else {
            return;
        };
        let next = filter.mode().next();
        filter.set_metric_mode(next);
        self.push_log(format!("[INFO] Metric: {}", next.label()));
        self.recompute_chart();
    }

    pub fn nudge_year_lo(&mut self, delta: i32) {
        let (Some(dataset), Some(filter)) = (&self.dataset, &mut self.filter) else {
            return;
        };
        filter.nudge_year_lo(dataset, delta);
        let (lo, hi) = filter.year_range();
        self.push_log(format!("[INFO] Years: {}-{}", lo, hi));
        self.recompute_chart();
    }

    pub fn nudge_year_hi(&mut self, delta: i32) {
        let (Some(dataset), Some(filter)) = (&self.dataset, &mut self.filter) else {
            return;
        };
        filter.nudge_year_hi(dataset, delta);
        let (lo, hi) = filter.year_range();
        self.push_log(format!("[INFO] Years: {}-{}", lo, hi));
        self.recompute_chart();
    }

    pub fn reset_filters(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.filter = Some(FilterState::new(dataset));
        self.push_log("[INFO] Filters reset".to_string());
        self.recompute_chart();
    }

    /// Pointer-move handler. Outside the plot, or before the first draw,
    /// the tooltip simply hides.
    pub fn on_pointer_moved(&mut self, col: u16, row: u16) {
        let hit = match (&self.chart, self.plot) {
            (Some(chart), Some(plot)) => {
                hit_test(&chart.series, &chart.domains, plot, (col, row))
            }
            _ => None,
        };
        self.tooltip.on_pointer(hit);
    }
}
