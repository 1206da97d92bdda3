/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint, value_parser};

use bufsink_export::ExporterConfig;

use crate::config::TeeConfig;

const ARGS_VERSION: &str = "version";
const ARGS_VERBOSE: &str = "verbose";
const ARGS_CONFIG_FILE: &str = "config-file";
const ARGS_DIR: &str = "dir";
const ARGS_PREFIX: &str = "prefix";
const ARGS_INTERVAL: &str = "interval";
const ARGS_CAPACITY: &str = "capacity";
const ARGS_ECHO: &str = "echo";

pub struct ProcArgs {
    pub verbose_level: u8,
    pub echo: bool,
    pub config: TeeConfig,
}

fn build_cli_args() -> Command {
    Command::new(crate::build::PKG_NAME)
        .disable_version_flag(true)
        .arg(
            Arg::new(ARGS_VERBOSE)
                .help("Show verbose output")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .long("verbose"),
        )
        .arg(
            Arg::new(ARGS_VERSION)
                .help("Show version")
                .action(ArgAction::SetTrue)
                .short('V')
                .long("version"),
        )
        .arg(
            Arg::new(ARGS_CONFIG_FILE)
                .help("Config file path")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_hint(ValueHint::FilePath)
                .value_parser(value_parser!(PathBuf))
                .short('c')
                .long("config-file"),
        )
        .arg(
            Arg::new(ARGS_DIR)
                .help("Export to files in this directory")
                .num_args(1)
                .value_name("DIR")
                .value_hint(ValueHint::DirPath)
                .value_parser(value_parser!(PathBuf))
                .short('d')
                .long("dir"),
        )
        .arg(
            Arg::new(ARGS_PREFIX)
                .help("File name prefix for exported files")
                .num_args(1)
                .value_name("PREFIX")
                .requires(ARGS_DIR)
                .short('p')
                .long("prefix"),
        )
        .arg(
            Arg::new(ARGS_INTERVAL)
                .help("Export interval, in humanize duration format")
                .num_args(1)
                .value_name("INTERVAL")
                .value_parser(parse_interval)
                .short('i')
                .long("interval"),
        )
        .arg(
            Arg::new(ARGS_CAPACITY)
                .help("Fixed buffer capacity in bytes, 0 for adaptive sizing")
                .num_args(1)
                .value_name("SIZE")
                .value_parser(value_parser!(usize))
                .short('s')
                .long("capacity"),
        )
        .arg(
            Arg::new(ARGS_ECHO)
                .help("Also copy input to stdout")
                .action(ArgAction::SetTrue)
                .short('e')
                .long("echo"),
        )
}

fn parse_interval(s: &str) -> anyhow::Result<Duration> {
    match humanize_rs::duration::parse(s) {
        Ok(d) => Ok(d),
        Err(humanize_rs::ParseError::MissingUnit) => {
            let secs = u64::from_str(s).map_err(|_| anyhow!("invalid duration string"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
    }
}

fn merge_args(args: &ArgMatches) -> anyhow::Result<ProcArgs> {
    let mut config = match args.get_one::<PathBuf>(ARGS_CONFIG_FILE) {
        Some(path) => TeeConfig::load(path)
            .context(format!("failed to load config file {}", path.display()))?,
        None => TeeConfig::default(),
    };

    if let Some(dir) = args.get_one::<PathBuf>(ARGS_DIR) {
        let prefix = args
            .get_one::<String>(ARGS_PREFIX)
            .cloned()
            .unwrap_or_else(|| crate::build::PKG_NAME.to_string());
        config.exporter = ExporterConfig::Disk {
            dir: dir.clone(),
            prefix,
        };
    }
    if let Some(interval) = args.get_one::<Duration>(ARGS_INTERVAL) {
        if interval.is_zero() {
            return Err(anyhow!("export interval should not be zero"));
        }
        config.export_interval = Some(*interval);
    }
    if let Some(capacity) = args.get_one::<usize>(ARGS_CAPACITY) {
        config.fixed_capacity = *capacity;
    }

    Ok(ProcArgs {
        verbose_level: args.get_count(ARGS_VERBOSE),
        echo: args.get_flag(ARGS_ECHO),
        config,
    })
}

pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let args = build_cli_args().get_matches();

    if args.get_flag(ARGS_VERSION) {
        crate::build::print_version(args.get_count(ARGS_VERBOSE));
        return Ok(None);
    }

    merge_args(&args).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<ProcArgs> {
        let args = build_cli_args().try_get_matches_from(argv)?;
        merge_args(&args)
    }

    #[test]
    fn defaults() {
        let args = parse(&["bufsink-tee"]).unwrap();
        assert_eq!(args.verbose_level, 0);
        assert!(!args.echo);
        assert_eq!(args.config, TeeConfig::default());
    }

    #[test]
    fn override_config() {
        let args = parse(&[
            "bufsink-tee",
            "-vv",
            "--echo",
            "-d",
            "/tmp/logs",
            "-p",
            "web",
            "-i",
            "30s",
            "-s",
            "1024",
        ])
        .unwrap();
        assert_eq!(args.verbose_level, 2);
        assert!(args.echo);
        assert_eq!(args.config.fixed_capacity, 1024);
        assert_eq!(args.config.export_interval, Some(Duration::from_secs(30)));
        assert_eq!(
            args.config.exporter,
            ExporterConfig::Disk {
                dir: PathBuf::from("/tmp/logs"),
                prefix: "web".to_string(),
            }
        );
    }

    #[test]
    fn interval() {
        assert_eq!(parse_interval("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_interval("500ms").unwrap(), Duration::from_millis(500));
        assert!(parse_interval("five").is_err());
    }

    #[test]
    fn invalid_args() {
        assert!(parse(&["bufsink-tee", "-p", "web"]).is_err());
        assert!(parse(&["bufsink-tee", "-i", "0s"]).is_err());
        assert!(parse(&["bufsink-tee", "-s", "-1"]).is_err());
    }
}
