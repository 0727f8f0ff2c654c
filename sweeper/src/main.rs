//! Two-phase sweeper for Cargo `target` directories.
//!
//! `sweeper stamp` before the build, `sweeper sweep` after it; or
//! `sweeper run -- <build command>` to do both around one command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use sweeper::exit_codes;
use sweeper::guarded::{CommandBuildRunner, GuardedOutcome, run_guarded};
use sweeper::io::config::{DEFAULT_CONFIG_PATH, SweepConfig, load_config};
use sweeper::io::fs::StdFilesystem;
use sweeper::io::locate::CargoLocator;
use sweeper::io::state::FileStateStore;
use sweeper::logging;
use sweeper::post::{PostOutcome, PostRequest, run_post};
use sweeper::stamp::{mark_failed, record_stamp};

#[derive(Parser)]
#[command(
    name = "sweeper",
    version,
    about = "Delete build artifacts the last build did not use"
)]
struct Cli {
    /// Config file (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// State file shared between phases (overrides `state_path` in config).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log every skip decision and access time.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record the reference timestamp (run before the build).
    Stamp,
    /// Record that an upstream step failed so the sweep is skipped.
    MarkFailed,
    /// Delete files in `target` not accessed since the timestamp (run after the build).
    Sweep {
        /// Path to the project's `Cargo.toml`.
        #[arg(long, default_value = "Cargo.toml")]
        manifest_path: PathBuf,
    },
    /// Stamp, run a build command, then sweep if it succeeded.
    Run {
        /// Path to the project's `Cargo.toml`.
        #[arg(long, default_value = "Cargo.toml")]
        manifest_path: PathBuf,

        /// Build command and its arguments.
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FATAL);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let cfg = load_config(&cli.config)?;
    let state_path = cli.state.unwrap_or_else(|| cfg.state_path.clone());
    let mut store = FileStateStore::new(state_path);

    match cli.command {
        Command::Stamp => {
            let timestamp = record_stamp(&mut store)?;
            println!("{timestamp}");
            Ok(exit_codes::OK)
        }
        Command::MarkFailed => {
            mark_failed(&mut store)?;
            Ok(exit_codes::OK)
        }
        Command::Sweep { manifest_path } => {
            let request = post_request(&cfg, &manifest_path);
            let outcome = run_post(
                &store,
                &CargoLocator::from_config(&cfg),
                &StdFilesystem,
                &request,
            )?;
            Ok(report_post(&outcome))
        }
        Command::Run {
            manifest_path,
            command,
        } => {
            let request = post_request(&cfg, &manifest_path);
            let builder = CommandBuildRunner {
                timeout: cfg.build_timeout(),
            };
            let outcome = run_guarded(
                &mut store,
                &builder,
                &command,
                &CargoLocator::from_config(&cfg),
                &StdFilesystem,
                &request,
            )?;
            match outcome {
                GuardedOutcome::BuildFailed(status) => {
                    eprintln!("build did not succeed ({status:?}), skipping sweep");
                    Ok(exit_codes::BUILD_FAILED)
                }
                GuardedOutcome::Post(post) => Ok(report_post(&post)),
            }
        }
    }
}

fn post_request(cfg: &SweepConfig, manifest_path: &Path) -> PostRequest {
    PostRequest {
        manifest_path: manifest_path.to_path_buf(),
        workers: cfg.workers,
    }
}

fn report_post(outcome: &PostOutcome) -> i32 {
    match outcome {
        PostOutcome::UpstreamFailed => {
            eprintln!("upstream step failed, skipping sweep");
            exit_codes::UPSTREAM_FAILED
        }
        PostOutcome::Swept { summary, .. } => {
            println!("{summary}");
            exit_codes::OK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sweep_defaults() {
        let cli = Cli::parse_from(["sweeper", "sweep"]);
        assert_eq!(cli.config, PathBuf::from("sweeper.toml"));
        assert!(cli.state.is_none());
        assert!(matches!(
            cli.command,
            Command::Sweep { ref manifest_path } if manifest_path == Path::new("Cargo.toml")
        ));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["sweeper", "stamp", "--state", "s.json", "-v"]);
        assert!(matches!(cli.command, Command::Stamp));
        assert_eq!(cli.state, Some(PathBuf::from("s.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_run_collects_build_command() {
        let cli = Cli::parse_from([
            "sweeper",
            "run",
            "--manifest-path",
            "app/Cargo.toml",
            "--",
            "cargo",
            "build",
            "--release",
        ]);
        match cli.command {
            Command::Run {
                manifest_path,
                command,
            } => {
                assert_eq!(manifest_path, PathBuf::from("app/Cargo.toml"));
                assert_eq!(command, vec!["cargo", "build", "--release"]);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_requires_a_command() {
        assert!(Cli::try_parse_from(["sweeper", "run"]).is_err());
    }
}
