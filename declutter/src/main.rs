use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use declutter::analysis::create_client;
use declutter::capture::{CaptureError, capture_file};
use declutter::cli::{Cli, Command, OutputFormat, get_log_path};
use declutter::config::Config;
use declutter::domain::AnalysisResult;
use declutter::present::{BadgeTone, MAINTENANCE_TIPS, TaskCard, headline, present};
use declutter::session::{Driver, Session, SessionEvent, ViewState};
use declutter::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Can't log here yet; the subscriber isn't installed
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!(
        source = ?config.source,
        "Declutter loaded config: provider={}, model={}",
        config.analysis.provider,
        config.analysis.model()
    );

    match cli.command {
        Some(Command::Tui) | None => cmd_tui(&config).await,
        Some(Command::Scan { path, format }) => cmd_scan(&config, &path, format).await,
        Some(Command::Tips) => cmd_tips(),
    }
}

async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    // A missing key is shown in the UI on first capture, not fatal here
    let client = create_client(&config.analysis);
    tui::run(config, client).await
}

/// One headless capture -> analyze -> present cycle
async fn cmd_scan(config: &Config, path: &str, format: OutputFormat) -> Result<()> {
    debug!(%path, ?format, "cmd_scan: called");
    let client = create_client(&config.analysis).context("Failed to create analysis client")?;

    // The shell already unquoted and unescaped the argument
    let captured = if path.trim().is_empty() {
        Err(CaptureError::Cancelled)
    } else {
        capture_file(Path::new(path), &config.capture)
    };
    let payload = captured.map_err(|e| match e {
        CaptureError::Cancelled => eyre!("No image path given"),
        CaptureError::Rejected { .. } => eyre!("CaptureRejected: {}", e),
    })?;

    let mut session = Session::new();
    let mut driver = Driver::new(client);

    let file_name = payload.preview.file_name.clone();
    let size = payload.preview.size_label();
    let Some(request) = session.handle(SessionEvent::CaptureTriggered(payload)) else {
        return Err(eyre!("Analysis could not be started"));
    };

    eprintln!("{} {} ({})", "Analyzing".bright_cyan().bold(), file_name, size.dimmed());
    driver.dispatch(request);

    let outcome = driver
        .next()
        .await
        .ok_or_else(|| eyre!("Analysis task ended without a result"))?;
    session.handle(outcome.into_event());

    match session.view() {
        ViewState::Result(result) => {
            match format {
                OutputFormat::Text => print_result(result),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(result).context("Failed to serialize result")?);
                }
            }
            Ok(())
        }
        _ => match session.notice() {
            Some(notice) => Err(eyre!("{:?}: {}", notice.kind, notice.message)),
            None => Err(eyre!("Analysis did not complete")),
        },
    }
}

fn print_result(result: &AnalysisResult) {
    let head = headline(result);
    println!("{}", format!("Time: {}", head.estimated_time).bright_blue());
    println!();
    println!("{}", head.vibe_check.bold());
    println!("{}", head.summary);
    println!();
    println!("{}", format!("ACTION ITEMS ({})", head.task_count).dimmed().bold());

    for card in present(result) {
        println!();
        print_card(&card);
    }
}

fn print_card(card: &TaskCard) {
    let label = format!(" {} ", card.badge.label());
    let badge = match card.badge.tone {
        BadgeTone::Rose => label.black().on_red(),
        BadgeTone::Amber => label.black().on_yellow(),
        BadgeTone::Emerald => label.black().on_green(),
    };
    println!("{} {}  {}", card.number().dimmed(), card.item.bold(), badge.bold());
    println!("   {} {}", "Currently:".dimmed(), card.location);
    println!("   {} {}", "Observation:".dimmed(), card.problem);
    println!("   {} {}", "AI Recommendation:".bright_blue(), card.suggestion);
    if let Some(tip) = &card.shopping_tip {
        println!("   {} {}", "Pro Tip:".green(), tip);
    }
}

fn cmd_tips() -> Result<()> {
    debug!("cmd_tips: called");
    println!("{}", "Maintenance Hacks".bright_blue().bold());
    for tip in MAINTENANCE_TIPS {
        println!();
        println!("{}", tip.tag.bright_blue());
        println!("{}", tip.title.bold());
        println!("{}", tip.body.dimmed());
    }
    Ok(())
}
