use football_etl::model::EnrichedMatch;
use football_etl::standings::compute_standings;
use football_etl::team_stats::compute_team_stats;

fn played(
    season: &str,
    league_id: i64,
    match_api_id: i64,
    home: i64,
    away: i64,
    home_goal: i64,
    away_goal: i64,
) -> EnrichedMatch {
    EnrichedMatch {
        match_api_id,
        league_id,
        season: season.to_string(),
        date: None,
        home_team_api_id: home,
        away_team_api_id: away,
        home_team_goal: home_goal,
        away_team_goal: away_goal,
        home_team_name: None,
        away_team_name: None,
    }
}

#[test]
fn two_match_season_produces_expected_table() {
    // Match A: Team1 beats Team2 at home 2-1. Match B: Team1 wins away 3-0.
    let matches = vec![
        played("2015", 1, 1, 1, 2, 2, 1),
        played("2015", 1, 2, 2, 1, 0, 3),
    ];

    let rows = compute_standings(&matches);
    assert_eq!(rows.len(), 2);

    let team_one = rows.iter().find(|row| row.team_api_id == 1).unwrap();
    assert_eq!(team_one.matches_played, 2);
    assert_eq!(team_one.wins, 2);
    assert_eq!(team_one.draws, 0);
    assert_eq!(team_one.losses, 0);
    assert_eq!(team_one.goals_for, 5);
    assert_eq!(team_one.goals_against, 1);
    assert_eq!(team_one.points, 6);

    let team_two = rows.iter().find(|row| row.team_api_id == 2).unwrap();
    assert_eq!(team_two.matches_played, 2);
    assert_eq!(team_two.wins, 0);
    assert_eq!(team_two.draws, 0);
    assert_eq!(team_two.losses, 2);
    assert_eq!(team_two.goals_for, 1);
    assert_eq!(team_two.goals_against, 5);
    assert_eq!(team_two.points, 0);
}

fn synthetic_league(count: usize) -> Vec<EnrichedMatch> {
    (0..count)
        .map(|index| {
            let home = (index % 6) as i64 + 1;
            let away = ((index + 3) % 6) as i64 + 1;
            played(
                "2015/2016",
                1,
                index as i64 + 1,
                home,
                away,
                (index % 4) as i64,
                ((index / 2) % 3) as i64,
            )
        })
        .collect()
}

#[test]
fn matches_played_and_points_invariants_hold() {
    let rows = compute_standings(&synthetic_league(120));
    assert!(!rows.is_empty());
    for row in &rows {
        assert_eq!(row.matches_played, row.wins + row.draws + row.losses);
        assert_eq!(row.points, row.wins * 3 + row.draws);
        assert!(row.goals_for >= 0);
        assert!(row.goals_against >= 0);
    }
}

#[test]
fn wins_and_draws_are_conserved_across_the_league() {
    let matches = synthetic_league(120);
    let decisive = matches
        .iter()
        .filter(|record| record.home_team_goal != record.away_team_goal)
        .count();
    let drawn = matches.len() - decisive;

    let rows = compute_standings(&matches);
    let total_wins: u32 = rows.iter().map(|row| row.wins).sum();
    let total_losses: u32 = rows.iter().map(|row| row.losses).sum();
    let total_draws: u32 = rows.iter().map(|row| row.draws).sum();

    assert_eq!(total_wins as usize, decisive);
    assert_eq!(total_losses as usize, decisive);
    // Each drawn match contributes one draw per side.
    assert_eq!(total_draws as usize, 2 * drawn);
}

#[test]
fn aggregates_are_stable_across_repeated_runs() {
    let matches = synthetic_league(500);
    let first = compute_standings(&matches);
    let second = compute_standings(&matches);
    assert_eq!(first, second);

    let stats_first = compute_team_stats(&matches);
    let stats_second = compute_team_stats(&matches);
    assert_eq!(stats_first, stats_second);
}

#[test]
fn team_stats_average_of_averages_reproduced() {
    // Team 1: home matches scoring 2 and 0 (home average 1.0), one away
    // match scoring 4 (away average 4.0). Two-stage result is 2.5, not the
    // weighted 2.0.
    let matches = vec![
        played("2015", 1, 1, 1, 2, 2, 0),
        played("2015", 1, 2, 1, 3, 0, 1),
        played("2015", 1, 3, 2, 1, 0, 4),
    ];

    let rows = compute_team_stats(&matches);
    let team_one = rows.iter().find(|row| row.team_api_id == 1).unwrap();
    assert!((team_one.avg_goals_scored - 2.5).abs() < 1e-9);

    // Conceded: home average (0 + 1) / 2 = 0.5, away average 0.0 -> 0.25.
    assert!((team_one.avg_goals_conceded - 0.25).abs() < 1e-9);
}
