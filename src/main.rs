use std::io;
use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use ragchat::api::HttpQueryClient;
use ragchat::app::App;
use ragchat::chat::{ConversationManager, ConversationStore};
use ragchat::config::{Config, BACKEND_URL_ENV};
use ragchat::event_loop::run_app;
use ragchat::logging;

fn main() -> Result<()> {
    // Check if we're in a proper terminal
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("ragchat must be run in an interactive terminal");
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init(&logging::default_log_dir()?)?;

    // Load configuration (use defaults if not found or invalid)
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %format!("{e:#}"), "invalid config, using defaults");
        Config::default()
    });
    config.apply_backend_override(std::env::var(BACKEND_URL_ENV).ok());
    config.validate();
    tracing::info!(backend = %config.backend_url, "starting ragchat");

    let client = HttpQueryClient::new(&config.backend_url, config.request_timeout())
        .context("Failed to create backend client")?;

    let mut startup_warning = None;
    let (conversations, store) = if config.persist_conversations {
        let store = ConversationStore::default_location()?;
        match store.load_or_recover() {
            Ok((conversations, backup)) => {
                if let Some(backup) = backup {
                    startup_warning = Some(format!(
                        "Saved conversations were unreadable, kept as {}",
                        backup.display()
                    ));
                }
                (conversations, Some(store))
            }
            Err(e) => {
                // Never save over a snapshot that could not be moved aside
                tracing::error!(error = %format!("{e:#}"), "conversation history disabled");
                startup_warning =
                    Some("Saved conversations are unreadable, history is not saved".to_string());
                (ConversationManager::new(), None)
            }
        }
    } else {
        (ConversationManager::new(), None)
    };

    let mut app = App::new(conversations, store, Arc::new(client), config);
    if let Some(message) = startup_warning {
        app.toast_error(message);
    }
    app.refresh_health();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode - are you in a terminal?")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal (always try to restore even on error)
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = terminal.show_cursor();

    if let Err(e) = app.save_now() {
        tracing::warn!(error = %format!("{e:#}"), "failed to save conversations on exit");
        eprintln!("Warning: failed to save conversations: {e:#}");
    }
    tracing::info!("ragchat stopped");

    result
}
