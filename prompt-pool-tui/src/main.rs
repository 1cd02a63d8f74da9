//! Prompt Pool TUI entry point.

use crossterm::{
    cursor::Show,
    event::{Event as CrosstermEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use prompt_pool_tui::api_client::{ApiClient, RemoteClient};
use prompt_pool_tui::config::TuiConfig;
use prompt_pool_tui::error::TuiError;
use prompt_pool_tui::events::Event;
use prompt_pool_tui::logging;
use prompt_pool_tui::realtime::{PushError, PushListener};
use prompt_pool_tui::reconciler::{EventSink, Reconciler, ReconcilerHandle, ReconcilerSettings};
use prompt_pool_tui::state::ViewModel;
use prompt_pool_tui::theme::Palette;
use prompt_pool_tui::views::{render_frame, ListFrame};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

type Term = Terminal<CrosstermBackend<Stdout>>;

enum Exit {
    Quit,
    PushEnded(Result<Result<(), PushError>, JoinError>),
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = TuiConfig::load()?;
    let _log_guard = logging::init(&config)?;
    info!(
        api = %config.api_base_url,
        ws = %config.ws_endpoint,
        "Starting prompt pool client"
    );

    // Subscribe before fetching so no push can fall between the two.
    let api = ApiClient::new(&config)?;
    let first_stream = api.ws().connect().await.map_err(TuiError::PushConnect)?;
    let remote: Arc<dyn RemoteClient> = Arc::new(api.rest().clone());
    let records = remote
        .fetch_records()
        .await
        .map_err(TuiError::InitialFetch)?;

    let (mut reconciler, handle, snapshots) = Reconciler::new(
        Arc::clone(&remote),
        Arc::new(ListFrame::default()),
        ReconcilerSettings::from_config(&config),
    );
    reconciler.seed(records);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = PushListener::new(
        handle.clone(),
        remote,
        api.ws().clone(),
        config.reconnect.clone(),
        shutdown_rx.clone(),
    );
    let mut push_task = tokio::spawn(listener.run(first_stream));

    let mut terminal = setup_terminal()?;
    let guard = TerminalGuard;
    let size = terminal.size()?;
    let _ = handle.submit(Event::ResizeRequested {
        width: size.width,
        height: size.height,
    });

    let reconciler_task = tokio::spawn(reconciler.run());
    let input_task = spawn_input_reader(handle.clone(), shutdown_rx.clone());
    let ticker_task = spawn_ticker(handle.clone(), config.tick_rate(), shutdown_rx);

    let exit = render_loop(&mut terminal, snapshots, &mut push_task).await;

    let _ = shutdown_tx.send(true);
    let _ = handle.submit(Event::Quit);
    let exit = match exit {
        Ok(Exit::Quit) => Ok(push_task.await),
        Ok(Exit::PushEnded(result)) => Ok(result),
        Err(err) => Err(err),
    };
    let finished = reconciler_task.await;
    input_task.abort();
    ticker_task.abort();

    drop(terminal);
    drop(guard);

    let model = finished.map_err(TuiError::Task)?;
    info!(records = model.view.records().len(), "Prompt pool client exited");
    match exit?.map_err(TuiError::Task)? {
        Ok(()) => Ok(()),
        Err(err) => {
            error!(error = %err, "Push channel lost for good");
            Err(TuiError::Push(err).into())
        }
    }
}

async fn render_loop(
    terminal: &mut Term,
    mut snapshots: watch::Receiver<Arc<ViewModel>>,
    push_task: &mut JoinHandle<Result<(), PushError>>,
) -> Result<Exit, TuiError> {
    let palette = Palette::default();
    loop {
        let model = Arc::clone(&snapshots.borrow_and_update());
        terminal.draw(|f| render_frame(f, &model, &palette))?;

        tokio::select! {
            changed = snapshots.changed() => {
                // The sender lives in the reconciler; it is gone once the loop quits.
                if changed.is_err() {
                    return Ok(Exit::Quit);
                }
            }
            pushed = &mut *push_task => return Ok(Exit::PushEnded(pushed)),
        }
    }
}

fn setup_terminal() -> Result<Term, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, Show);
    }
}

fn spawn_input_reader(sink: ReconcilerHandle, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            let next = tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                next = events.next() => next,
            };
            let event = match next {
                Some(Ok(CrosstermEvent::Key(key))) => Event::Input(key),
                Some(Ok(CrosstermEvent::Resize(width, height))) => {
                    Event::ResizeRequested { width, height }
                }
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    warn!(error = %err, "Terminal input failed");
                    Event::Quit
                }
                None => Event::Quit,
            };
            let quit = event == Event::Quit;
            if sink.submit(event).is_err() || quit {
                break;
            }
        }
    })
}

fn spawn_ticker(
    sink: ReconcilerHandle,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = interval.tick() => {
                    if sink.submit(Event::Tick).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
