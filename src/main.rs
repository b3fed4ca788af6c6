//! usermgmt-portal binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use usermgmt_portal::Result;
use usermgmt_portal::api::{ApiConfig, HttpApi};
use usermgmt_portal::app::worker::Worker;
use usermgmt_portal::app::{self, AppState, ConfigDir, PortalConfig, Theme};

/// Terminal client for the user-management portal.
#[derive(Debug, Parser)]
#[command(name = "usermgmt-portal", version, about)]
struct Cli {
    /// Base URL of the portal API, e.g. http://localhost:5000
    #[arg(long, env = "PORTAL_BASE_URL")]
    base_url: Option<String>,

    /// Rows per dashboard page (10, 25, 50 or 100)
    #[arg(long)]
    page_size: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory holding portal.conf, theme.conf, keybinds.conf, filter.conf and session.conf
    #[arg(long, env = "PORTAL_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log file; defaults to usermgmt-portal.log in the config directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Built-in colour theme (portal, basic) overriding theme.conf
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// Command-line values win over `portal.conf`.
    fn merge(&self, mut cfg: PortalConfig) -> PortalConfig {
        if let Some(url) = &self.base_url {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(n) = self.page_size.filter(|n| *n > 0) {
            cfg.page_size = n;
        }
        if let Some(t) = self.timeout_secs {
            cfg.timeout_secs = t;
        }
        cfg
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let dir = ConfigDir::resolve(cli.config_dir.as_deref());
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| dir.path().join("usermgmt-portal.log"));
    init_logging(&log_path)?;

    let cfg = cli.merge(PortalConfig::load_or_init(&dir.file("portal.conf")));

    let theme = match cli.theme.as_deref() {
        Some(name) => Some(
            Theme::named(name).with_context(|| format!("unknown theme '{name}' (portal, basic)"))?,
        ),
        None => None,
    };

    let api = HttpApi::new(&ApiConfig::new(cfg.base_url.clone()).with_timeout(cfg.timeout()))
        .context("build HTTP client")?;
    tracing::info!(base_url = api.base_url(), config_dir = %dir.path().display(), "starting");
    let worker = Worker::spawning(Arc::new(api));
    let mut state = AppState::new(&dir, &cfg, theme);

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut state, &worker);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
