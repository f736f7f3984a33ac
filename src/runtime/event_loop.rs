use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalogue::ItemBuilder;
use crate::config;
use crate::library::{Locator, SourceUnavailable, TrackRecord, download, file_name_hint};
use crate::player::HandleFactory;
use crate::ui;

pub type CatalogueResult = Result<Vec<TrackRecord>, SourceUnavailable>;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// The catalogue fetch; dropped once its result is in.
    catalogue_rx: Option<Receiver<CatalogueResult>>,
    download_tx: Sender<String>,
    download_rx: Receiver<String>,
}

impl EventLoopState {
    pub fn new(catalogue_rx: Receiver<CatalogueResult>) -> Self {
        let (download_tx, download_rx) = mpsc::channel();
        Self {
            pending_gg: false,
            catalogue_rx: Some(catalogue_rx),
            download_tx,
            download_rx,
        }
    }
}

/// Main terminal event loop: absorbs background results, draws, and handles
/// input. Returns `Ok(())` when the user quits.
pub fn run<F>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<F::Handle>,
    builder: &ItemBuilder<'_, F>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: HandleFactory,
{
    loop {
        absorb_catalogue(settings, app, builder, state);
        app.poll_loads();
        app.sync_playback();
        while let Ok(message) = state.download_rx.try_recv() {
            app.set_status(message);
        }

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui, settings.waveform.height))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, builder, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn absorb_catalogue<F: HandleFactory>(
    settings: &config::Settings,
    app: &mut App<F::Handle>,
    builder: &ItemBuilder<'_, F>,
    state: &mut EventLoopState,
) {
    let Some(rx) = state.catalogue_rx.as_ref() else {
        return;
    };
    let result = match rx.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => Err(SourceUnavailable::Interrupted),
    };
    state.catalogue_rx = None;
    app.on_catalogue_loaded(result, builder, &settings.view.category_filters);
}

/// Save the selected track's audio on a worker thread; the outcome is reported
/// through `tx`.
fn start_download(locator: Locator, dest: PathBuf, file_name: String, tx: Sender<String>) {
    let spawned = thread::Builder::new()
        .name("zensync-download".to_string())
        .spawn(move || {
            let message = match download(&locator, &dest, &file_name) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(err) => {
                    tracing::warn!("Download failed: {err}");
                    format!("Download failed: {err}")
                }
            };
            let _ = tx.send(message);
        });
    if let Err(err) = spawned {
        tracing::error!("Could not start download: {err}");
    }
}

fn handle_key_event<F: HandleFactory>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<F::Handle>,
    builder: &ItemBuilder<'_, F>,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    // Until the catalogue arrives there is nothing to act on.
    if app.is_loading() {
        return key.code == KeyCode::Char('q');
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
            app.toggle_selected();
        }
        KeyCode::Char('s') => {
            app.cycle_sort_key(true);
        }
        KeyCode::Char('S') => {
            app.cycle_sort_key(false);
        }
        KeyCode::Char('o') => {
            app.toggle_sort_order();
        }
        KeyCode::Char('f') => {
            app.cycle_filter(true);
        }
        KeyCode::Char('F') => {
            app.cycle_filter(false);
        }
        KeyCode::Char('a') => {
            app.show_all();
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Char('d') => {
            if let Some(item) = app.selected_item() {
                let record = item.record();
                let locator = builder.locate(record);
                let file_name = file_name_hint(record);
                app.set_status(format!("Downloading {file_name}..."));
                start_download(
                    locator,
                    settings.downloads.dir.clone(),
                    file_name,
                    state.download_tx.clone(),
                );
            }
        }
        _ => {}
    }

    false
}
