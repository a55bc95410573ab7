use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::RawTeamSeason;

const SAMPLE_SEED: u64 = 0x5EA5_0175;

const AL_TEAMS: [&str; 6] = [
    "Boston Red Sox",
    "New York Yankees",
    "Detroit Tigers",
    "Chicago White Sox",
    "Baltimore Orioles",
    "Minnesota Twins",
];

const NL_TEAMS: [&str; 6] = [
    "Los Angeles Dodgers",
    "San Francisco Giants",
    "St. Louis Cardinals",
    "Cincinnati Reds",
    "Pittsburgh Pirates",
    "Chicago Cubs",
];

/// Deterministic offline dataset covering 1960-2015 for both leagues.
/// Rates random-walk within plausible per-game bands so charts look like
/// real season data rather than noise. Strikeout totals only exist from
/// 1963 on, which exercises the metric-unavailable path downstream.
pub fn sample_rows() -> Vec<RawTeamSeason> {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let mut rows = Vec::new();

    for (league, teams) in [("AL", AL_TEAMS), ("NL", NL_TEAMS)] {
        for team in teams {
            let mut runs_rate = rng.gen_range(3.6..5.0);
            let mut hits_rate = rng.gen_range(8.0..9.4);
            let mut so_rate = rng.gen_range(4.6..7.0);
            for year in 1960..=2015 {
                runs_rate = drift(&mut rng, runs_rate, 3.2, 5.6);
                hits_rate = drift(&mut rng, hits_rate, 7.6, 9.8);
                so_rate = drift(&mut rng, so_rate, 4.2, 8.6);
                let games = 162.0;
                rows.push(RawTeamSeason {
                    year: Some(year),
                    league: Some(league.to_string()),
                    team: Some(team.to_string()),
                    games: Some(games),
                    runs: Some((runs_rate * games).round()),
                    hits: Some((hits_rate * games).round()),
                    strikeouts: (year >= 1963).then(|| (so_rate * games).round()),
                    runs_allowed: Some((drift(&mut rng, runs_rate, 3.2, 5.6) * games).round()),
                });
            }
        }
    }

    rows
}

fn drift(rng: &mut StdRng, rate: f64, lo: f64, hi: f64) -> f64 {
    (rate + rng.gen_range(-0.15..0.15)).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_deterministic() {
        let a = sample_rows();
        let b = sample_rows();
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].runs, b[0].runs);
        assert_eq!(a[a.len() - 1].hits, b[b.len() - 1].hits);
    }

    #[test]
    fn early_seasons_omit_strikeouts() {
        let rows = sample_rows();
        assert!(rows
            .iter()
            .filter(|r| r.year.unwrap() < 1963)
            .all(|r| r.strikeouts.is_none()));
        assert!(rows
            .iter()
            .filter(|r| r.year.unwrap() >= 1963)
            .all(|r| r.strikeouts.is_some()));
    }
}
