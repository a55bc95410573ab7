use pennant_trends::dataset::{Dataset, EraBounds, League, LeagueChoice, RawTeamSeason, normalize};
use pennant_trends::filter::{FilterState, TeamChoice};
use pennant_trends::metrics::{Metric, MetricMode};

fn row(year: i32, league: &str, team: &str) -> RawTeamSeason {
    RawTeamSeason {
        year: Some(year),
        league: Some(league.to_string()),
        team: Some(team.to_string()),
        games: Some(162.0),
        runs: Some(700.0),
        hits: Some(1400.0),
        strikeouts: Some(1000.0),
        runs_allowed: Some(700.0),
    }
}

fn dataset() -> Dataset {
    let rows = vec![
        row(2000, "AL", "Boston Red Sox"),
        row(2001, "AL", "Boston Red Sox"),
        row(2000, "AL", "New York Yankees"),
        row(2000, "NL", "Chicago Cubs"),
        row(2005, "NL", "Chicago Cubs"),
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
fn defaults_are_al_all_teams_runs_full_extent() {
    let filter = FilterState::new(&dataset());
    assert_eq!(filter.league(), LeagueChoice::One(League::AL));
    assert_eq!(*filter.team(), TeamChoice::All);
    assert_eq!(filter.mode(), MetricMode::Single(Metric::Runs));
    assert_eq!(filter.year_range(), (2000, 2005));
}

#[test]
fn league_change_resets_team_selection() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_team(&data, TeamChoice::Name("Boston Red Sox".into()));
    assert_eq!(*filter.team(), TeamChoice::Name("Boston Red Sox".into()));

    filter.set_league(&data, LeagueChoice::One(League::NL));
    assert_eq!(*filter.team(), TeamChoice::All);
}

#[test]
fn team_outside_league_scope_falls_back_to_all() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    // Cubs are NL; the filter is scoped to AL.
    filter.set_team(&data, TeamChoice::Name("Chicago Cubs".into()));
    assert_eq!(*filter.team(), TeamChoice::All);
}

#[test]
fn inverted_year_range_swaps_and_clamps() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.set_year_range(&data, 2004, 2001);
    assert_eq!(filter.year_range(), (2001, 2004));

    filter.set_year_range(&data, 1900, 2100);
    assert_eq!(filter.year_range(), (2000, 2005));
}

#[test]
fn cycle_team_wraps_through_all_and_back() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    // AL scope: All -> Boston -> New York -> All.
    filter.cycle_team(&data, 1);
    assert_eq!(*filter.team(), TeamChoice::Name("Boston Red Sox".into()));
    filter.cycle_team(&data, 1);
    assert_eq!(*filter.team(), TeamChoice::Name("New York Yankees".into()));
    filter.cycle_team(&data, 1);
    assert_eq!(*filter.team(), TeamChoice::All);
    filter.cycle_team(&data, -1);
    assert_eq!(*filter.team(), TeamChoice::Name("New York Yankees".into()));
}

#[test]
fn cycle_league_covers_all_three_scopes() {
    let data = dataset();
    let mut filter = FilterState::new(&data);
    filter.cycle_league(&data);
    assert_eq!(filter.league(), LeagueChoice::One(League::NL));
    filter.cycle_league(&data);
    assert_eq!(filter.league(), LeagueChoice::All);
    filter.cycle_league(&data);
    assert_eq!(filter.league(), LeagueChoice::One(League::AL));
}
