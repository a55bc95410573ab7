use pennant_trends::aggregate::{SeriesRole, aggregate};
use pennant_trends::dataset::{Dataset, EraBounds, League, LeagueChoice, RawTeamSeason, normalize};
use pennant_trends::filter::{FilterState, TeamChoice};
use pennant_trends::metrics::{Metric, MetricMode};

fn row(year: i32, league: &str, team: &str, runs: f64, hits: f64) -> RawTeamSeason {
    RawTeamSeason {
        year: Some(year),
        league: Some(league.to_string()),
        team: Some(team.to_string()),
        games: Some(162.0),
        runs: Some(runs),
        hits: Some(hits),
        strikeouts: (year >= 1963).then_some(1000.0),
        runs_allowed: Some(runs),
    }
}

fn dataset() -> Dataset {
    let rows = vec![
        row(2010, "AL", "Boston Red Sox", 800.0, 1500.0),
        row(2010, "AL", "New York Yankees", 700.0, 1400.0),
        row(2011, "AL", "Boston Red Sox", 820.0, 1520.0),
        row(2011, "AL", "New York Yankees", 760.0, 1460.0),
        row(2010, "NL", "Chicago Cubs", 650.0, 1380.0),
    ];
    normalize(
        &rows,
        &EraBounds {
            min_year: 1960,
            max_year: 2015,
        },
    )
    .unwrap()
}

#[test]
fn league_mean_averages_per_game_values_across_teams() {
    let data = dataset();
    let filter = FilterState::new(&data);
    let agg = aggregate(&data, &filter);

    assert_eq!(agg.league.len(), 1);
    assert!(agg.team.is_empty());

    let league = &agg.league[0];
    assert_eq!(league.role, SeriesRole::LeagueAverage);
    assert_eq!(league.metric, Metric::Runs);
    // 2010 AL: mean of 800/162 and 700/162 = 750/162.
    let (year, value) = league.points[0];
    assert_eq!(year, 2010.0);
    assert!((value - 750.0 / 162.0).abs() < 1e-9);
}

#[test]
fn selected_team_series_tracks_its_own_seasons() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_team(&data, TeamChoice::Name("Boston Red Sox".into()));
    let agg = aggregate(&data, &filter);

    assert_eq!(agg.team.len(), 1);
    let team = &agg.team[0];
    assert_eq!(team.role, SeriesRole::SelectedTeam);
    assert_eq!(team.points.len(), 2);
    let (year, value) = team.points[0];
    assert_eq!(year, 2010.0);
    assert!((value - 800.0 / 162.0).abs() < 1e-9);
}

#[test]
fn years_are_strictly_increasing() {
    let data = dataset();
    let filter = FilterState::new(&data);
    for series in aggregate(&data, &filter).into_series() {
        for pair in series.points.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }
}

#[test]
fn aggregation_is_idempotent() {
    let data = dataset();
    let filter = FilterState::new(&data);
    let a = aggregate(&data, &filter);
    let b = aggregate(&data, &filter);
    assert_eq!(a, b);
}

#[test]
fn combined_mode_yields_runs_then_hits() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_metric_mode(MetricMode::Combined);
    let agg = aggregate(&data, &filter);

    assert_eq!(agg.league.len(), 2);
    assert_eq!(agg.league[0].metric, Metric::Runs);
    assert_eq!(agg.league[1].metric, Metric::Hits);
    assert!(agg.league[0].label.contains("Runs/Game"));
    assert!(agg.league[1].label.contains("Hits/Game"));
}

#[test]
fn league_scope_excludes_other_league() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_league(&data, LeagueChoice::One(League::NL));
    let agg = aggregate(&data, &filter);

    let league = &agg.league[0];
    assert_eq!(league.points.len(), 1);
    let (_, value) = league.points[0];
    assert!((value - 650.0 / 162.0).abs() < 1e-9);
}

#[test]
fn empty_year_range_gives_empty_series_not_error() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_team(&data, TeamChoice::Name("New York Yankees".into()));
    filter.set_year_range(&data, 2011, 2011);
    filter.set_league(&data, LeagueChoice::One(League::NL));
    // League switch reset the team; NL has no 2011 seasons at all.
    let agg = aggregate(&data, &filter);
    assert!(agg.team.is_empty());
    assert!(agg.league[0].is_empty());
}

#[test]
fn metric_unavailable_years_are_skipped() {
    let rows = vec![
        row(1960, "AL", "Boston Red Sox", 700.0, 1400.0),
        row(1963, "AL", "Boston Red Sox", 700.0, 1400.0),
    ];
    let data = normalize(
        &rows,
        &EraBounds {
            min_year: 1960,
            max_year: 2015,
        },
    )
    .unwrap();
    let mut filter = FilterState::new(&data);
    filter.set_metric_mode(MetricMode::Single(Metric::Strikeouts));
    let agg = aggregate(&data, &filter);

    // No strikeout totals before 1963, so 1960 contributes no point.
    let league = &agg.league[0];
    assert_eq!(league.points.len(), 1);
    assert_eq!(league.points[0].0, 1963.0);
}
