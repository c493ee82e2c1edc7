use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use football_etl::model::EnrichedMatch;
use football_etl::standings::compute_standings;
use football_etl::team_stats::compute_team_stats;

fn synthetic_matches(count: usize) -> Vec<EnrichedMatch> {
    (0..count)
        .map(|index| {
            let season = if index % 2 == 0 { "2015/2016" } else { "2016/2017" };
            let home = (index % 20) as i64 + 1;
            let away = ((index + 7) % 20) as i64 + 1;
            EnrichedMatch {
                match_api_id: index as i64 + 1,
                league_id: (index % 4) as i64 + 1,
                season: season.to_string(),
                date: None,
                home_team_api_id: home,
                away_team_api_id: away,
                home_team_goal: (index % 5) as i64,
                away_team_goal: ((index / 3) % 4) as i64,
                home_team_name: Some(format!("Team {home}")),
                away_team_name: Some(format!("Team {away}")),
            }
        })
        .collect()
}

fn bench_standings(c: &mut Criterion) {
    let matches = synthetic_matches(10_000);
    c.bench_function("standings_10k", |b| {
        b.iter(|| {
            let rows = compute_standings(black_box(&matches));
            black_box(rows.len());
        })
    });
}

fn bench_team_stats(c: &mut Criterion) {
    let matches = synthetic_matches(10_000);
    c.bench_function("team_stats_10k", |b| {
        b.iter(|| {
            let rows = compute_team_stats(black_box(&matches));
            black_box(rows.len());
        })
    });
}

criterion_group!(perf, bench_standings, bench_team_stats);
criterion_main!(perf);
