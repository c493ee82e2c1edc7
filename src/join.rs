use std::collections::HashMap;

use crate::model::{EnrichedMatch, MatchRecord, TeamRecord};

/// Two independent lookups, one per side. Left-preserving: a match survives
/// even when one or both lookups miss; the missing side keeps a `None` name.
pub fn attach_team_names(matches: &[MatchRecord], teams: &[TeamRecord]) -> Vec<EnrichedMatch> {
    let names: HashMap<i64, &str> = teams
        .iter()
        .map(|team| (team.team_api_id, team.team_long_name.as_str()))
        .collect();

    matches
        .iter()
        .map(|record| EnrichedMatch {
            match_api_id: record.match_api_id,
            league_id: record.league_id,
            season: record.season.clone(),
            date: record.date,
            home_team_api_id: record.home_team_api_id,
            away_team_api_id: record.away_team_api_id,
            home_team_goal: record.home_team_goal,
            away_team_goal: record.away_team_goal,
            home_team_name: names.get(&record.home_team_api_id).map(|name| name.to_string()),
            away_team_name: names.get(&record.away_team_api_id).map(|name| name.to_string()),
        })
        .collect()
}
