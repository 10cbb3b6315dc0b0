// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tilewerk — poster tiling from the command line.
//
// Entry point. Initialises logging, loads settings, and runs one JSON job
// file:
//
//     tilewerk <job.json> [--config <settings.json>]

mod job;

use std::path::PathBuf;
use std::process::ExitCode;

use tilewerk_core::config::TilerConfig;
use tilewerk_core::error::{Result, TilewerkError};

use job::JobFile;

const USAGE: &str = "usage: tilewerk <job.json> [--config <settings.json>]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Tilewerk starting");

    match run(std::env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "job failed");
            eprintln!("tilewerk: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<()> {
    let (job_path, config_path) = parse_args(&args)?;

    let settings = match config_path {
        Some(path) => TilerConfig::load(path)?,
        None => TilerConfig::default(),
    };

    let job = JobFile::load(&job_path)?;
    let report = job.run(&settings).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(PathBuf, Option<PathBuf>)> {
    let mut job = None;
    let mut config = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return Err(TilewerkError::validation(USAGE)),
            },
            "-h" | "--help" => return Err(TilewerkError::validation(USAGE)),
            _ if job.is_none() => job = Some(PathBuf::from(arg)),
            _ => return Err(TilewerkError::validation(USAGE)),
        }
    }
    job.map(|job| (job, config))
        .ok_or_else(|| TilewerkError::validation(USAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn job_path_with_optional_config() {
        let (job, config) = parse_args(&args(&["job.json"])).unwrap();
        assert_eq!(job, PathBuf::from("job.json"));
        assert!(config.is_none());

        let (job, config) = parse_args(&args(&["--config", "s.json", "job.json"])).unwrap();
        assert_eq!(job, PathBuf::from("job.json"));
        assert_eq!(config, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn bad_arguments_show_usage() {
        for bad in [&[][..], &["a.json", "b.json"][..], &["job.json", "--config"][..]] {
            let err = parse_args(&args(bad)).unwrap_err();
            assert_eq!(err.to_string(), USAGE);
        }
    }
}
