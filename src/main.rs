use cloudinv::adapters::{CognitoIdentityProvider, FileSessionStore, ReqwestHttpClient};
use cloudinv::api::ApiClient;
use cloudinv::app::{App, AppMessage};
use cloudinv::cli::{parse_args, run_cli_command, CliCommand};
use cloudinv::config::{configure, AppConfiguration};
use cloudinv::session::SessionManager;
use cloudinv::terminal::{setup_panic_hook, TerminalManager};
use cloudinv::traits::{HttpClient, IdentityProvider, SessionStore};
use cloudinv::{logging, ui};

use color_eyre::eyre::{eyre, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::Terminal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());

    // Single-threaded runtime: one cooperative event loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Some(result) = runtime.block_on(run_cli_command(&command)) {
        return result;
    }
    let CliCommand::Run { path, config } = command else {
        return Ok(());
    };

    logging::init();

    let config = AppConfiguration::load(config.as_deref())?;
    config.validate()?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let store: Arc<dyn SessionStore> = Arc::new(
        FileSessionStore::new().ok_or_else(|| eyre!("cannot locate home directory"))?,
    );
    let identity: Arc<dyn IdentityProvider> = Arc::new(CognitoIdentityProvider::new(
        Arc::clone(&http),
        store,
        &config.auth,
    ));
    let sessions = Arc::new(SessionManager::new(Arc::clone(&identity)));
    let config = Arc::new(config.with_header_augmenter(sessions));
    configure(Arc::clone(&config));

    let api = ApiClient::new(http, config);
    let mut app = App::new(identity, api, path.as_deref().unwrap_or("/"));

    setup_panic_hook();
    let mut term = TerminalManager::new()?;

    let result = runtime.block_on(async {
        app.start();
        run_app(term.terminal(), &mut app).await
    });

    term.restore()?;
    if let Err(ref e) = result {
        error!(error = %e, "Exited with error");
    }
    info!("cloudinv exiting");
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx: mpsc::UnboundedReceiver<AppMessage> = app
        .message_rx
        .take()
        .ok_or_else(|| eyre!("event loop already running"))?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_redraw = false;
        }

        // 16ms tick drives the spinner
        let timeout = tokio::time::sleep(std::time::Duration::from_millis(16));

        tokio::select! {
            _ = timeout => {
                app.tick();
            }

            event_result = event_stream.next() => {
                match event_result {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key);
                    }
                    Some(Ok(Event::Paste(text))) => app.handle_paste(&text),
                    Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            Some(msg) = message_rx.recv() => {
                app.handle_message(msg);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
