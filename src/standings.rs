use std::collections::HashMap;

use rayon::prelude::*;

use crate::model::{EnrichedMatch, MatchOutcome, StandingsRow};

type Key = (String, i64, i64);

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    matches_played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: i64,
    goals_against: i64,
}

impl Tally {
    fn merge(&mut self, other: &Tally) {
        self.matches_played += other.matches_played;
        self.wins += other.wins;
        self.draws += other.draws;
        self.losses += other.losses;
        self.goals_for += other.goals_for;
        self.goals_against += other.goals_against;
    }
}

/// One row per (season, league, team) that played at least one match, sorted
/// on that key. Only integer sums cross the parallel reduce, so the result
/// is identical for every partitioning of the input.
pub fn compute_standings(matches: &[EnrichedMatch]) -> Vec<StandingsRow> {
    let merged = matches
        .par_iter()
        .fold(HashMap::<Key, Tally>::new, |mut acc, record| {
            fold_match(&mut acc, record);
            acc
        })
        .reduce(HashMap::new, merge_maps);

    let mut rows = merged
        .into_iter()
        .map(|((season, league_id, team_api_id), tally)| StandingsRow {
            season,
            league_id,
            team_api_id,
            matches_played: tally.matches_played,
            wins: tally.wins,
            draws: tally.draws,
            losses: tally.losses,
            goals_for: tally.goals_for,
            goals_against: tally.goals_against,
            points: tally.wins * 3 + tally.draws,
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        a.season
            .cmp(&b.season)
            .then(a.league_id.cmp(&b.league_id))
            .then(a.team_api_id.cmp(&b.team_api_id))
    });
    rows
}

fn fold_match(acc: &mut HashMap<Key, Tally>, record: &EnrichedMatch) {
    let outcome = record.outcome();

    let home = acc
        .entry((record.season.clone(), record.league_id, record.home_team_api_id))
        .or_default();
    home.matches_played += 1;
    home.goals_for += record.home_team_goal;
    home.goals_against += record.away_team_goal;
    match outcome {
        MatchOutcome::HomeWin => home.wins += 1,
        MatchOutcome::Draw => home.draws += 1,
        MatchOutcome::AwayWin => home.losses += 1,
    }

    let away = acc
        .entry((record.season.clone(), record.league_id, record.away_team_api_id))
        .or_default();
    away.matches_played += 1;
    away.goals_for += record.away_team_goal;
    away.goals_against += record.home_team_goal;
    match outcome {
        MatchOutcome::AwayWin => away.wins += 1,
        MatchOutcome::Draw => away.draws += 1,
        MatchOutcome::HomeWin => away.losses += 1,
    }
}

fn merge_maps(mut left: HashMap<Key, Tally>, right: HashMap<Key, Tally>) -> HashMap<Key, Tally> {
    for (key, tally) in right {
        left.entry(key).or_default().merge(&tally);
    }
    left
}

#[cfg(test)]
mod tests {
    use super::compute_standings;
    use crate::model::EnrichedMatch;

    fn played(season: &str, league_id: i64, home: i64, away: i64, hg: i64, ag: i64) -> EnrichedMatch {
        EnrichedMatch {
            match_api_id: home * 1000 + away,
            league_id,
            season: season.to_string(),
            date: None,
            home_team_api_id: home,
            away_team_api_id: away,
            home_team_goal: hg,
            away_team_goal: ag,
            home_team_name: None,
            away_team_name: None,
        }
    }

    #[test]
    fn a_draw_counts_once_per_side() {
        let rows = compute_standings(&[played("2015/2016", 1, 10, 20, 1, 1)]);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.matches_played, 1);
            assert_eq!(row.draws, 1);
            assert_eq!(row.wins, 0);
            assert_eq!(row.losses, 0);
            assert_eq!(row.points, 1);
        }
    }

    #[test]
    fn seasons_and_leagues_are_separate_rows() {
        let rows = compute_standings(&[
            played("2015/2016", 1, 10, 20, 2, 0),
            played("2016/2017", 1, 10, 20, 2, 0),
            played("2015/2016", 2, 10, 20, 2, 0),
        ]);
        let team_ten = rows
            .iter()
            .filter(|row| row.team_api_id == 10)
            .collect::<Vec<_>>();
        assert_eq!(team_ten.len(), 3);
        assert!(team_ten.iter().all(|row| row.matches_played == 1 && row.wins == 1));
    }

    #[test]
    fn output_is_sorted_by_season_league_team() {
        let rows = compute_standings(&[
            played("2016/2017", 2, 30, 40, 0, 0),
            played("2015/2016", 1, 20, 10, 0, 0),
        ]);
        let keys = rows
            .iter()
            .map(|row| (row.season.clone(), row.league_id, row.team_api_id))
            .collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
