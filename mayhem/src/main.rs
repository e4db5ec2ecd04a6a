//! Money Mayhem TUI application.
//!
//! A terminal quiz game where every answer costs or earns money.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for automated testing:
//!
//! ```bash
//! cargo run -p mayhem -- --headless --topic "deep sea creatures"
//! ```

mod app;
mod events;
mod feedback;
mod headless;
mod ui;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mayhem_core::{GameSession, QuestionMode};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::{App, PendingAction};
use events::{handle_event, EventResult};
use ui::render::render;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "MAYHEM_LOG";

/// Money Mayhem - answer AI-generated questions without going bankrupt
#[derive(Parser, Debug)]
#[command(name = "mayhem", version, about)]
struct Args {
    /// Run in headless mode (text-only, no TUI)
    #[arg(long)]
    headless: bool,

    /// Start a custom-topic game right away
    #[arg(long, conflicts_with = "would_you_rather")]
    topic: Option<String>,

    /// Start a Would You Rather game right away
    #[arg(long)]
    would_you_rather: bool,

    /// Log file for the TUI (headless mode logs to stderr)
    #[arg(long, default_value = "mayhem.log")]
    log_file: PathBuf,
}

impl Args {
    fn initial_game(&self) -> Option<(String, QuestionMode)> {
        if self.would_you_rather {
            Some((String::new(), QuestionMode::WouldYouRather))
        } else {
            self.topic
                .as_ref()
                .map(|topic| (topic.clone(), QuestionMode::Custom))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let _log_guard = init_logging(&args)?;

    let session = GameSession::from_env().context("failed to create game session")?;
    info!(headless = args.headless, "starting Money Mayhem");

    if args.headless {
        return headless::run_headless(session, args.initial_game()).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    if let Some((topic, mode)) = args.initial_game() {
        app.pending = Some(PendingAction::Start { topic, mode });
    }

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("TUI error")
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so its logs go to a file. The returned guard
/// flushes that file on drop.
fn init_logging(args: &Args) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(None);
    }

    let directory = args
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = args
        .log_file
        .file_name()
        .with_context(|| format!("invalid log file path: {}", args.log_file.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        // Run queued async work, showing the loading state first
        if let Some(action) = app.pending.take() {
            if matches!(action, PendingAction::Start { .. }) {
                app.loading = true;
                terminal.draw(|f| render(f, &app))?;
            }
            app.perform(action).await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["mayhem"]);
        assert!(!args.headless);
        assert_eq!(args.log_file, PathBuf::from("mayhem.log"));
        assert_eq!(args.initial_game(), None);
    }

    #[test]
    fn test_args_initial_game() {
        let args = Args::parse_from(["mayhem", "--headless", "--topic", "volcanoes"]);
        assert_eq!(
            args.initial_game(),
            Some(("volcanoes".to_string(), QuestionMode::Custom))
        );

        let args = Args::parse_from(["mayhem", "--would-you-rather"]);
        assert_eq!(
            args.initial_game(),
            Some((String::new(), QuestionMode::WouldYouRather))
        );
    }

    #[test]
    fn test_topic_conflicts_with_would_you_rather() {
        let result = Args::try_parse_from(["mayhem", "--topic", "x", "--would-you-rather"]);
        assert!(result.is_err());
    }
}
