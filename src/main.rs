pub mod app;
pub mod config;
pub mod document;
pub mod notification;
pub mod search;
pub mod ui;

use anyhow::{Context, Result};
use app::lightrag_client::{DocumentService, LightRagClient};
use app::state_batch_delete::{BatchDeleteDialog, CONFIRMATION_PHRASE};
use app::{App, DialogEvent, PendingOperation};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode, KeyEvent,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use document::DocumentRef;
use notification::{Notification, NotificationLevel};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A terminal document manager for LightRAG servers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Server profile name from lazyrag.toml
    #[arg(long, value_name = "PROFILE")]
    profile: Option<String>,

    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write logs (the TUI owns the terminal)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the server's documents and exit
    #[arg(long)]
    list: bool,

    /// Delete the given document ids after typed confirmation, without the TUI
    #[arg(long, value_name = "DOC_ID", num_args = 1..)]
    delete: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let app_config = config::Config::load(args.config.as_deref());
    let profile = match app_config.select_profile(args.profile.as_deref()) {
        Some(p) => p,
        None => anyhow::bail!(
            "Profile '{}' not found in configuration.",
            args.profile.as_deref().unwrap_or("<first>")
        ),
    };
    let client = LightRagClient::from_profile(&profile, app_config.request_timeout())
        .with_context(|| format!("cannot use profile '{}'", profile.name))?;
    tracing::info!(profile = %profile.name, url = %client.base_url(), "starting");
    let service: Arc<dyn DocumentService> = Arc::new(client);

    if args.list {
        return print_documents(service.as_ref()).await;
    }
    if !args.delete.is_empty() {
        return delete_from_cli(service.as_ref(), &args.delete).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(service, &profile.name, &profile.url, app_config.notification_ttl());
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{:?}", err);
    }

    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.cache_dir().join("lazyrag").join("lazyrag.log"))
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_log_path().context("could not determine cache directory")?,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "lazyrag=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}

async fn print_documents(service: &dyn DocumentService) -> Result<()> {
    let documents = service.list_documents().await?;
    for doc in &documents {
        println!("{:<11} {:<40} {}", doc.status.label(), doc.display_name(), doc.id);
    }
    println!("{} documents.", documents.len());
    Ok(())
}

/// Runs the batch confirmer from the command line: preview, typed phrase, result.
async fn delete_from_cli(service: &dyn DocumentService, ids: &[String]) -> Result<()> {
    // Resolve file paths so the server gets the same payload the TUI would send.
    let known = match service.list_documents().await {
        Ok(documents) => documents,
        Err(e) => {
            tracing::warn!(error = %e, "could not list documents, deleting by id only");
            Vec::new()
        }
    };
    let documents: Vec<DocumentRef> = ids
        .iter()
        .map(|id| {
            known
                .iter()
                .find(|d| &d.id == id)
                .cloned()
                .unwrap_or_else(|| DocumentRef::new(id.as_str(), None, Default::default()))
        })
        .collect();

    let mut dialog = BatchDeleteDialog::default();
    dialog.open(documents);

    println!("Are you sure you want to delete {} documents?", dialog.documents.len());
    let (shown, more) = dialog.preview();
    for doc in shown {
        println!("  {}  ({})", doc.display_name(), doc.status.label());
    }
    if more > 0 {
        println!("  And {} more documents...", more);
    }
    println!(
        "This action will permanently delete all selected documents and their associated data \
         from the knowledge graph."
    );
    print!("Type \"{}\" to confirm this action: ", CONFIRMATION_PHRASE);
    io::stdout().flush()?;

    let mut confirmation = String::new();
    io::stdin().read_line(&mut confirmation)?;
    dialog.confirmation_text = confirmation.trim_end_matches(['\r', '\n']).to_string();

    let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
    for event in dialog.confirm(service).await {
        if let DialogEvent::Notify(n) = event {
            report_notification(&n, &mut stdout, &mut stderr)?;
        }
    }
    Ok(())
}

/// Successes go to `out`; warnings and errors go to `err`.
fn report_notification(
    notification: &Notification,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match notification.level {
        NotificationLevel::Success => writeln!(out, "[ok] {}", notification.message),
        NotificationLevel::Warning => writeln!(err, "[warning] {}", notification.message),
        NotificationLevel::Error => writeln!(err, "[error] {}", notification.message),
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    app.trigger_fetch_documents();

    loop {
        app.tick();
        // Drawn while the operation is still pending so dialogs show their in-flight state.
        terminal.draw(|f| ui::ui(f, &app))?;

        if let Some(operation) = app.pending_operation {
            app.pending_operation = None;
            match operation {
                PendingOperation::FetchDocuments => app.fetch_documents().await,
                PendingOperation::ConfirmSingleDelete => app.confirm_single_delete().await,
                PendingOperation::ConfirmBatchDelete => app.confirm_batch_delete().await,
                PendingOperation::CopyDocumentId => {
                    app::app_clipboard::copy_selected_document_id(&mut app).await
                }
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns true when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.single_delete.is_open {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.trigger_single_delete(),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.cancel_single_delete(),
            _ => {}
        }
    } else if app.batch_delete.is_open {
        match key.code {
            KeyCode::Enter => app.trigger_batch_delete(),
            KeyCode::Esc => app.cancel_batch_delete(),
            KeyCode::Backspace => app.batch_delete.pop_char(),
            KeyCode::Char(c) => app.batch_delete.push_char(c),
            _ => {}
        }
    } else if app.search_state.is_active {
        match key.code {
            KeyCode::Char(c) => {
                app.search_state.query.push(c);
                app.update_search_matches();
            }
            KeyCode::Backspace => {
                app.search_state.query.pop();
                app.update_search_matches();
            }
            KeyCode::Esc => app.exit_search_mode(),
            KeyCode::Enter => app.finish_search_input(),
            KeyCode::Down => app.next_document(),
            KeyCode::Up => app.previous_document(),
            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => app.next_document(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_document(),
            KeyCode::Char(' ') => app.toggle_mark_selected(),
            KeyCode::Char('a') => app.toggle_mark_all_visible(),
            KeyCode::Char('d') => app.initiate_single_delete(),
            KeyCode::Char('D') => app.initiate_batch_delete(),
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Char('r') => app.trigger_fetch_documents(),
            KeyCode::Char('y') => app.pending_operation = Some(PendingOperation::CopyDocumentId),
            KeyCode::Esc => {
                if app.search_state.is_filtering() {
                    app.exit_search_mode();
                }
            }
            _ => {}
        }
    }
    false
}
