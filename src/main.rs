use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use football_etl::config::EtlConfig;
use football_etl::extract::{self, ExtractSummary};
use football_etl::logging;
use football_etl::pg_load::{self, LoadSummary};
use football_etl::transform::{self, TransformSummary};

#[derive(Debug, Clone, Serialize)]
struct RunReport {
    extract: ExtractSummary,
    transform: TransformSummary,
    load: Option<LoadSummary>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let mut config = EtlConfig::from_env();
    let skip_load = apply_cli_overrides(&mut config);

    if let Err(err) = logging::init("pipeline", &config.log_dir) {
        eprintln!("failed to initialize logging: {err:#}");
        return ExitCode::FAILURE;
    }

    match run_pipeline(&config, skip_load) {
        Ok(report) => {
            println!("Pipeline complete");
            println!(
                "Extract: {} files, {} match rows, {} team rows",
                report.extract.files_extracted,
                report.extract.match_rows,
                report.extract.team_rows
            );
            println!(
                "Transform: {} enriched rows, {} standings rows, {} team stats rows",
                report.transform.enriched_rows,
                report.transform.standings_rows,
                report.transform.team_stats_rows
            );
            match &report.load {
                Some(load) => println!(
                    "Load: {} rows read, {} rows inserted",
                    load.rows_read, load.rows_inserted
                ),
                None => println!("Load: skipped"),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("pipeline failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_pipeline(config: &EtlConfig, skip_load: bool) -> Result<RunReport> {
    let started = Instant::now();

    let extract = extract::run(config)?;
    let transform = transform::run(config)?;
    let load = if skip_load {
        None
    } else {
        Some(pg_load::run(config)?)
    };

    let report = RunReport {
        extract,
        transform,
        load,
    };
    write_run_report(config, &report)?;

    info!(
        elapsed = %logging::format_elapsed(started.elapsed()),
        "pipeline finished"
    );
    Ok(report)
}

fn write_run_report(config: &EtlConfig, report: &RunReport) -> Result<()> {
    let path = config.run_report_path();
    let raw = serde_json::to_string_pretty(report).context("serialize run report")?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, raw).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn apply_cli_overrides(config: &mut EtlConfig) -> bool {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_load = false;
    let mut data_dir = None;
    let mut output_dir = None;
    let mut archive = None;

    let mut index = 0;
    while index < args.len() {
        if args[index] == "--skip-load" {
            skip_load = true;
        } else if let Some(value) = flag_value(&args, &mut index, "--data-dir") {
            data_dir = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(&args, &mut index, "--output-dir") {
            output_dir = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(&args, &mut index, "--archive") {
            archive = Some(PathBuf::from(value));
        }
        index += 1;
    }

    if let Some(dir) = data_dir {
        // Keep the archive default anchored to the data dir unless it was
        // pointed elsewhere explicitly.
        if config.archive_path == config.data_dir.join("soccer.zip") {
            config.archive_path = dir.join("soccer.zip");
        }
        config.data_dir = dir;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if let Some(path) = archive {
        config.archive_path = path;
    }
    skip_load
}

fn flag_value(args: &[String], index: &mut usize, flag: &str) -> Option<String> {
    let arg = &args[*index];
    if let Some(rest) = arg.strip_prefix(flag)
        && let Some(value) = rest.strip_prefix('=')
    {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    if arg == flag
        && let Some(next) = args.get(*index + 1)
        && !next.trim().is_empty()
    {
        *index += 1;
        return Some(next.trim().to_string());
    }
    None
}
