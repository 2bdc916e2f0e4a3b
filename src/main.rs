//! autoprice: keeps one Betarigs rig priced against the cheapest competitor.
//!
//! Entry point. Parses flags, loads settings, initialises structured
//! logging, then races the repricing loop against the exit watcher and
//! Ctrl+C. Whichever finishes first ends the process.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use autoprice::config::{Cli, Settings};
use autoprice::display::{DisplayMode, LogReporter, Reporter, TerminalReporter};
use autoprice::engine::scheduler::Scheduler;
use autoprice::engine::watcher;
use autoprice::platforms::betarigs::BetarigsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    let pricing = match cli.validate() {
        Ok(p) => p,
        Err(errors) => {
            for e in &errors {
                println!("ERROR : {e}");
            }
            println!("\nUsage:\n");
            println!("{}", Cli::command().render_help());
            std::process::exit(1);
        }
    };

    let settings = Settings::load(cli.config.as_deref())?;

    init_logging(settings.display.mode);

    let policy = pricing.policy();
    let client = BetarigsClient::new(
        pricing.api_key,
        Some(settings.marketplace.base_url.clone()),
        settings.request_timeout(),
        &settings.marketplace.user_agent,
    )?;

    let reporter: Box<dyn Reporter> = match settings.display.mode {
        DisplayMode::Terminal => {
            let mut terminal =
                TerminalReporter::stdout(pricing.rig_id, pricing.floor, pricing.offset_pct);
            terminal.refresh();
            Box::new(terminal)
        }
        DisplayMode::Log => Box::new(LogReporter),
    };

    info!(
        rig = pricing.rig_id,
        floor = %pricing.floor,
        offset_pct = %pricing.offset_pct,
        interval_secs = settings.agent.cycle_interval_secs,
        display = ?settings.display.mode,
        "autoprice starting up"
    );

    let mut scheduler = Scheduler::new(client, reporter, pricing.rig_id, policy)
        .with_interval(settings.cycle_interval());

    tokio::select! {
        _ = scheduler.run() => {}
        _ = watcher::wait_for_enter() => {
            info!("Input received, exiting");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, exiting");
        }
    }

    // In-flight requests and the blocked stdin read are abandoned here.
    std::process::exit(0);
}

/// Initialise the `tracing` subscriber.
///
/// Logs go to stderr so they never interleave with the status screen.
fn init_logging(mode: DisplayMode) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = match mode {
        DisplayMode::Terminal => "autoprice=warn",
        DisplayMode::Log => "autoprice=info",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json_logging = std::env::var("AUTOPRICE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
