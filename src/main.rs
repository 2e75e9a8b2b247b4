use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

use smb_vss_scenario::logging;
use smb_vss_scenario::report::RunReport;
use smb_vss_scenario::scenario::{ScenarioOptions, VssScenario};
use smb_vss_scenario::sequencer::{Selection, Sequencer};
use smb_vss_scenario::settings::load_settings;
use smb_vss_scenario::utils::unix_now;

const EXIT_CONFIG: u8 = 2;

//-----------------------------------------------------
// COMMAND LINE
//-----------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "smb-vss-scenario",
    version,
    about = "Check that ZFS snapshots show up as SMB shadow copies on a storage appliance."
)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only run steps whose id contains PATTERN (repeatable)
    #[arg(short = 'k', long = "select", value_name = "PATTERN")]
    select: Vec<String>,

    /// Print step ids and dependencies without running anything
    #[arg(long)]
    list: bool,

    /// Remove the share, user and datasets after validation
    #[arg(long)]
    cleanup: bool,

    /// Write the JSON run report to FILE
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    #[arg(long, value_name = "SECS")]
    settle_secs: Option<u64>,

    #[arg(long, value_name = "SECS")]
    poll_timeout_secs: Option<u64>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Warnings and errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

//-----------------------------------------------------
// MAIN FUNCTION
//-----------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(logging::level_for(cli.verbose, cli.quiet)) {
        eprintln!("{}", e);
        return ExitCode::from(EXIT_CONFIG);
    }

    let mut settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "could not load settings");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Some(secs) = cli.settle_secs {
        settings.settle_secs = secs;
    }
    if let Some(secs) = cli.poll_timeout_secs {
        settings.poll_timeout_secs = secs;
    }

    let options = ScenarioOptions::from_settings(&settings, cli.cleanup);
    let mut scenario = match VssScenario::new(&settings, options) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!(error = %e, "could not set up the management API client");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let selection = Selection::matching(cli.select);

    if cli.list {
        for (spec, _) in scenario.plan() {
            let marker = if selection.matches(&spec.id) { ' ' } else { '-' };
            println!(
                "{} {}  [{}] depends on: {}",
                marker,
                spec.id,
                spec.checkpoint,
                if spec.depends.is_empty() {
                    "-".to_string()
                } else {
                    spec.depends.join(", ")
                }
            );
        }
        return ExitCode::SUCCESS;
    }

    if let Err(e) = settings.validate() {
        tracing::error!(error = %e, "refusing to run");
        return ExitCode::from(EXIT_CONFIG);
    }

    let run_id = RunReport::new_run_id();
    let started_at = unix_now();
    tracing::info!(
        %run_id,
        target = %settings.ip,
        pool = %settings.pool_name,
        cleanup = cli.cleanup,
        "starting SMB VSS scenario"
    );

    let mut seq = Sequencer::with_selection(selection);
    scenario.run(&mut seq).await;

    let report = RunReport::from_sequencer(run_id, &settings.ip, started_at, seq);
    println!("{}", report.render());

    if let Some(path) = &cli.report {
        if let Err(e) = report.write_json(path) {
            tracing::error!(error = %e, path = %path.display(), "could not write run report");
            return ExitCode::FAILURE;
        }
        tracing::info!(path = %path.display(), "run report written");
    }

    if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
