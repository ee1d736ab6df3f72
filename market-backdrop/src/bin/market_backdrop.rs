/// Market Backdrop - full-screen spotlight terminal
///
/// Move the mouse to reveal the simulated market terminal underneath:
/// - `f` toggles the effect (persisted between runs)
/// - `q`, `Esc` or `Ctrl-C` quits
///
/// Configuration comes from `BACKDROP_*` environment variables. Logs go to
/// `BACKDROP_LOG_FILE` (default: `market-backdrop.log` in the temp dir).
use std::{error::Error, fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use crossterm::event::EventStream;
use futures::StreamExt;
use market_backdrop::{
    host::{install_panic_hook, translate, HostCommand, HostSink, TerminalGuard},
    mount, BackdropConfig, FxStore, InputEvent,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

const ENV_LOG_FILE: &str = "BACKDROP_LOG_FILE";
const ENV_LOG_JSON: &str = "BACKDROP_LOG_JSON";
const DEFAULT_LOG_FILE: &str = "market-backdrop.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Config errors surface before the terminal is touched
    let config = BackdropConfig::from_env()?;
    init_logging()?;

    let store = FxStore::from_env();
    let mut fx = store.load();
    let metrics = config.cell;

    install_panic_hook();
    let guard = TerminalGuard::enter()?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let size = terminal.size()?;

    let handle = mount(config, HostSink::new(terminal), size.width, size.height)?;
    let input = handle.input();
    input.send(InputEvent::SetFx(fx)).await?;

    let mut events = EventStream::new();
    let mut watchdog = tokio::time::interval(Duration::from_millis(250));

    let result: Result<(), Box<dyn Error>> = loop {
        tokio::select! {
            maybe_event = events.next() => {
                let event = match maybe_event {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                };
                match translate(&event, &metrics) {
                    Some(HostCommand::Forward(ev)) => {
                        if input.send(ev).await.is_err() {
                            break Ok(());
                        }
                    }
                    Some(HostCommand::ToggleFx) => {
                        fx = match store.toggle() {
                            Ok(next) => next,
                            Err(e) => {
                                warn!(error = %e, "failed to persist fx state");
                                fx.toggled()
                            }
                        };
                        if input.send(InputEvent::SetFx(fx)).await.is_err() {
                            break Ok(());
                        }
                    }
                    Some(HostCommand::Quit) => break Ok(()),
                    None => {}
                }
            }
            _ = watchdog.tick() => {
                if !handle.is_running() {
                    warn!("frame loop exited on its own");
                    break Ok(());
                }
            }
        }
    };

    let stats = handle.unmount().await;
    drop(guard);

    let stats = stats?;
    info!(frames = stats.frames, events = stats.events, "market backdrop exited");
    result
}

// Initialise an INFO `Subscriber` writing to the log file, never to stdout
fn init_logging() -> io::Result<()> {
    let filter = tracing_subscriber::filter::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();

    let path = std::env::var_os(ENV_LOG_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE));
    let writer = Mutex::new(File::create(path)?);

    if std::env::var(ENV_LOG_JSON).is_ok_and(|v| v == "1") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .init();
    }
    Ok(())
}
