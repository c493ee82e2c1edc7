use std::collections::HashMap;

use rayon::prelude::*;

use crate::model::{EnrichedMatch, TeamStatsRow};

type Key = (String, i64);

#[derive(Debug, Clone, Copy, Default)]
struct GoalSums {
    scored: i64,
    conceded: i64,
    matches: u32,
}

impl GoalSums {
    fn merge(&mut self, other: &GoalSums) {
        self.scored += other.scored;
        self.conceded += other.conceded;
        self.matches += other.matches;
    }

    fn averages(&self) -> (f64, f64) {
        let count = self.matches as f64;
        (self.scored as f64 / count, self.conceded as f64 / count)
    }
}

/// Average-of-averages, reproduced on purpose: the home-perspective and
/// away-perspective per-(season, team) means are computed independently and
/// then averaged together. With unequal home/away appearance counts this is
/// NOT the weighted mean over all matches.
pub fn compute_team_stats(matches: &[EnrichedMatch]) -> Vec<TeamStatsRow> {
    let (home, away) = matches
        .par_iter()
        .fold(
            || (HashMap::<Key, GoalSums>::new(), HashMap::<Key, GoalSums>::new()),
            |mut acc, record| {
                let home = acc
                    .0
                    .entry((record.season.clone(), record.home_team_api_id))
                    .or_default();
                home.scored += record.home_team_goal;
                home.conceded += record.away_team_goal;
                home.matches += 1;

                let away = acc
                    .1
                    .entry((record.season.clone(), record.away_team_api_id))
                    .or_default();
                away.scored += record.away_team_goal;
                away.conceded += record.home_team_goal;
                away.matches += 1;
                acc
            },
        )
        .reduce(
            || (HashMap::new(), HashMap::new()),
            |mut left, right| {
                merge_into(&mut left.0, right.0);
                merge_into(&mut left.1, right.1);
                left
            },
        );

    let mut keys = home.keys().chain(away.keys()).cloned().collect::<Vec<_>>();
    keys.sort();
    keys.dedup();

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let mut scored = 0.0;
        let mut conceded = 0.0;
        let mut sides = 0.0;
        for perspective in [home.get(&key), away.get(&key)].into_iter().flatten() {
            let (avg_scored, avg_conceded) = perspective.averages();
            scored += avg_scored;
            conceded += avg_conceded;
            sides += 1.0;
        }
        rows.push(TeamStatsRow {
            season: key.0,
            team_api_id: key.1,
            avg_goals_scored: scored / sides,
            avg_goals_conceded: conceded / sides,
        });
    }
    rows
}

fn merge_into(left: &mut HashMap<Key, GoalSums>, right: HashMap<Key, GoalSums>) {
    for (key, sums) in right {
        left.entry(key).or_default().merge(&sums);
    }
}
