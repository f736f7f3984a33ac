use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalogue::{ItemBuilder, ViewState};
use crate::library::open_source;
use crate::logging;
use crate::player::{RodioFactory, WaveformStyle, open_output};

mod event_loop;
mod settings;
mod startup;

use startup::Command;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let location = match startup::parse_args(env::args().skip(1)) {
        Ok(Command::Browse(location)) => location.unwrap_or_else(|| settings.source.location.clone()),
        Ok(Command::Export(dir)) => {
            println!("{}", startup::export(&dir, &settings.discovery)?);
            return Ok(());
        }
        Ok(Command::PrintConfig) => {
            print!("{}", startup::print_config(&settings)?);
            return Ok(());
        }
        Ok(Command::Help) => {
            println!("{}", startup::USAGE);
            return Ok(());
        }
        Err(msg) => {
            eprintln!("zensync: {msg}\n\n{}", startup::USAGE);
            std::process::exit(2);
        }
    };

    // Logging is optional; the session runs without it.
    if let Err(err) = logging::init(&settings.logging) {
        eprintln!("zensync: logging disabled: {err}");
    }
    if let Some(warning) = &settings_warning {
        tracing::warn!("{warning}");
    }

    let source = open_source(&location, &settings);
    let source_label = source.describe();
    let base = source.base();
    let catalogue_rx = startup::spawn_fetch(source)?;

    // The stream must outlive every sink; it stops playback when dropped.
    let output = open_output();
    let factory = RodioFactory::new(
        output.as_ref().map(|stream| stream.mixer().clone()),
        settings.waveform.resolution,
    );
    let builder = ItemBuilder::new(&factory, WaveformStyle::from_settings(&settings.waveform), base);

    let mut app = App::new(ViewState::from_settings(&settings.view), source_label);
    if let Some(warning) = settings_warning {
        app.set_status(warning);
    } else if output.is_none() {
        app.set_status("No audio output device; playback disabled");
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(catalogue_rx);
        event_loop::run(&mut terminal, &settings, &mut app, &builder, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Session ended");
    run_result
}
