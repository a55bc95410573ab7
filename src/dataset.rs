use std::collections::BTreeSet;
use std::env;

use serde::Deserialize;
use thiserror::Error;

use crate::metrics::Metric;

/// One row of the source table, Lahman `Teams.csv` column names.
/// Everything beyond the identity columns is optional; the normalizer decides
/// what a missing field means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamSeason {
    #[serde(rename = "yearID")]
    pub year: Option<i32>,
    #[serde(rename = "lgID")]
    pub league: Option<String>,
    #[serde(rename = "name")]
    pub team: Option<String>,
    #[serde(rename = "G")]
    pub games: Option<f64>,
    #[serde(rename = "R")]
    pub runs: Option<f64>,
    #[serde(rename = "H")]
    pub hits: Option<f64>,
    #[serde(rename = "SO")]
    pub strikeouts: Option<f64>,
    #[serde(rename = "RA")]
    pub runs_allowed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    AL,
    NL,
}

impl League {
    pub const ALL: [League; 2] = [League::AL, League::NL];

    pub fn from_code(code: &str) -> Option<League> {
        match code.trim() {
            "AL" => Some(League::AL),
            "NL" => Some(League::NL),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            League::AL => "AL",
            League::NL => "NL",
        }
    }
}

/// League scope of the current view: one league or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueChoice {
    All,
    One(League),
}

impl LeagueChoice {
    pub fn admits(self, league: League) -> bool {
        match self {
            LeagueChoice::All => true,
            LeagueChoice::One(choice) => choice == league,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeagueChoice::All => "MLB",
            LeagueChoice::One(league) => league.code(),
        }
    }
}

/// Valid year window for the working dataset. Defaults to the modern era the
/// original analysis covered; overridable per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraBounds {
    pub min_year: i32,
    pub max_year: i32,
}

pub const DEFAULT_ERA: EraBounds = EraBounds {
    min_year: 1960,
    max_year: 2015,
};

impl EraBounds {
    pub fn from_env() -> EraBounds {
        let min_year = parse_year_env("SEASON_YEAR_MIN", DEFAULT_ERA.min_year);
        let max_year = parse_year_env("SEASON_YEAR_MAX", DEFAULT_ERA.max_year);
        if min_year <= max_year {
            EraBounds { min_year, max_year }
        } else {
            EraBounds {
                min_year: max_year,
                max_year: min_year,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

fn parse_year_env(name: &str, default: i32) -> i32 {
    env::var(name)
        .ok()
        .and_then(|val| val.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

/// One normalized team-season. Immutable once built; metrics that could not
/// be derived for this row are `None` rather than NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRecord {
    pub league: League,
    pub team: String,
    pub year: i32,
    per_game: [Option<f64>; Metric::COUNT],
}

impl SeasonRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.per_game[metric.index()]
    }

    fn from_raw(raw: &RawTeamSeason, era: &EraBounds) -> Option<SeasonRecord> {
        let year = raw.year.filter(|year| era.contains(*year))?;
        let league = raw.league.as_deref().and_then(League::from_code)?;
        let team = raw
            .team
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())?
            .to_string();
        let games = raw.games.filter(|games| *games > 0.0)?;

        let mut per_game = [None; Metric::COUNT];
        for metric in Metric::ALL {
            per_game[metric.index()] = (metric.info().numerator)(raw).map(|n| n / games);
        }
        // A row with no computable metric can never plot; drop it outright.
        if per_game.iter().all(Option::is_none) {
            return None;
        }

        Some(SeasonRecord {
            league,
            team,
            year,
            per_game,
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to load season data: {0}")]
    Source(String),
    #[error("no season records survived normalization (league/era/games filters)")]
    EmptyDataset,
}

/// Process-wide read-only working set, built once at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SeasonRecord>,
    min_year: i32,
    max_year: i32,
}

impl Dataset {
    pub fn records(&self) -> &[SeasonRecord] {
        &self.records
    }

    pub fn year_bounds(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }

    /// Sorted distinct team names under a league choice; the legal domain of
    /// the team selector.
    pub fn teams_for(&self, choice: LeagueChoice) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|record| choice.admits(record.league))
            .map(|record| record.team.as_str())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

/// Validate and derive per-game metrics from raw rows.
///
/// Rows outside the era, with non-positive games, or with an unsupported
/// league code are dropped here, never propagated as NaN downstream. An
/// empty survivor set is an error so the caller can render a real failure
/// state instead of an empty chart.
pub fn normalize(rows: &[RawTeamSeason], era: &EraBounds) -> Result<Dataset, LoadError> {
    let records: Vec<SeasonRecord> = rows
        .iter()
        .filter_map(|raw| SeasonRecord::from_raw(raw, era))
        .collect();
    if records.is_empty() {
        return Err(LoadError::EmptyDataset);
    }

    let min_year = records.iter().map(|r| r.year).min().unwrap_or(era.min_year);
    let max_year = records.iter().map(|r| r.year).max().unwrap_or(era.max_year);
    Ok(Dataset {
        records,
        min_year,
        max_year,
    })
}
