use crate::dataset::{Dataset, League, LeagueChoice};
use crate::metrics::{Metric, MetricMode};

/// Team scope of the current view: every team in scope, or one by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamChoice {
    All,
    Name(String),
}

impl TeamChoice {
    pub fn label(&self) -> &str {
        match self {
            TeamChoice::All => "All teams",
            TeamChoice::Name(name) => name,
        }
    }
}

/// The one mutable piece of view state. Every setter validates against the
/// dataset so downstream aggregation and rendering never see an illegal
/// combination; in particular the selected team always belongs to the
/// selected league scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    league: LeagueChoice,
    team: TeamChoice,
    mode: MetricMode,
    year_lo: i32,
    year_hi: i32,
}

impl FilterState {
    /// Defaults mirror the source analysis: AL, all teams, runs, full extent.
    pub fn new(dataset: &Dataset) -> FilterState {
        let league = if dataset
            .records()
            .iter()
            .any(|record| record.league == League::AL)
        {
            LeagueChoice::One(League::AL)
        } else {
            LeagueChoice::All
        };
        let (year_lo, year_hi) = dataset.year_bounds();
        FilterState {
            league,
            team: TeamChoice::All,
            mode: MetricMode::Single(Metric::Runs),
            year_lo,
            year_hi,
        }
    }

    pub fn league(&self) -> LeagueChoice {
        self.league
    }

    pub fn team(&self) -> &TeamChoice {
        &self.team
    }

    pub fn mode(&self) -> MetricMode {
        self.mode
    }

    pub fn year_range(&self) -> (i32, i32) {
        (self.year_lo, self.year_hi)
    }

    /// Switching league always resets the team to All; the old selection may
    /// not exist in the new league and the reset must land before anything
    /// downstream recomputes.
    pub fn set_league(&mut self, _dataset: &Dataset, choice: LeagueChoice) {
        self.league = choice;
        self.team = TeamChoice::All;
    }

    /// A name outside the current league scope falls back to All rather than
    /// erroring; the UI treats that as a no-op selection.
    pub fn set_team(&mut self, dataset: &Dataset, choice: TeamChoice) {
        self.team = match choice {
            TeamChoice::All => TeamChoice::All,
            TeamChoice::Name(name) => {
                if dataset.teams_for(self.league).iter().any(|t| *t == name) {
                    TeamChoice::Name(name)
                } else {
                    TeamChoice::All
                }
            }
        };
    }

    pub fn set_metric_mode(&mut self, mode: MetricMode) {
        self.mode = mode;
    }

    /// Inverted bounds are swapped, not rejected: a user can drag the low
    /// handle past the high one. Both ends clamp to the dataset extent.
    pub fn set_year_range(&mut self, dataset: &Dataset, lo: i32, hi: i32) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let (min_year, max_year) = dataset.year_bounds();
        self.year_lo = lo.clamp(min_year, max_year);
        self.year_hi = hi.clamp(min_year, max_year);
    }

    pub fn team_domain(&self, dataset: &Dataset) -> Vec<String> {
        dataset.teams_for(self.league)
    }

    // Keyboard-driven conveniences built on the validating setters.

    pub fn cycle_league(&mut self, dataset: &Dataset) {
        let next = match self.league {
            LeagueChoice::One(League::AL) => LeagueChoice::One(League::NL),
            LeagueChoice::One(League::NL) => LeagueChoice::All,
            LeagueChoice::All => LeagueChoice::One(League::AL),
        };
        self.set_league(dataset, next);
    }

    /// Step through All + the league's team list; `step` is +1 or -1.
    pub fn cycle_team(&mut self, dataset: &Dataset, step: i32) {
        let teams = self.team_domain(dataset);
        if teams.is_empty() {
            self.set_team(dataset, TeamChoice::All);
            return;
        }
        // Position 0 is All, then the sorted team names.
        let total = teams.len() as i32 + 1;
        let current = match &self.team {
            TeamChoice::All => 0,
            TeamChoice::Name(name) => teams
                .iter()
                .position(|t| t == name)
                .map(|idx| idx as i32 + 1)
                .unwrap_or(0),
        };
        let next = (current + step).rem_euclid(total);
        let choice = if next == 0 {
            TeamChoice::All
        } else {
            TeamChoice::Name(teams[(next - 1) as usize].clone())
        };
        self.set_team(dataset, choice);
    }

    pub fn nudge_year_lo(&mut self, dataset: &Dataset, delta: i32) {
        self.set_year_range(dataset, self.year_lo + delta, self.year_hi);
    }

    pub fn nudge_year_hi(&mut self, dataset: &Dataset, delta: i32) {
        self.set_year_range(dataset, self.year_lo, self.year_hi + delta);
    }
}
