use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::config::{DiscoverySettings, Settings};
use crate::library::{CatalogueSource, SourceUnavailable, TrackRecord, discover};

pub const USAGE: &str = "\
usage: zensync [SOURCE]
       zensync --export <DIR>
       zensync --print-config

SOURCE is a catalogue URL, a catalogue JSON file or a music directory.
Without it, source.location from the config file is used.

  --export <DIR>   print the catalogue discovered in DIR as JSON
  --print-config   print the effective configuration as TOML
  -h, --help       show this help";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Browse(Option<String>),
    Export(PathBuf),
    PrintConfig,
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut source = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--print-config" => return Ok(Command::PrintConfig),
            "--export" => {
                let dir = args.next().ok_or("--export needs a directory")?;
                return Ok(Command::Export(PathBuf::from(dir)));
            }
            _ => {}
        }
        if arg.starts_with('-') && arg.len() > 1 {
            return Err(format!("unknown option {arg}"));
        }
        if source.is_some() {
            return Err(format!("unexpected argument {arg}"));
        }
        source = Some(arg);
    }
    Ok(Command::Browse(source))
}

/// Fetch the catalogue off the event-loop thread. The single result arrives
/// on the returned channel.
pub fn spawn_fetch(
    source: Box<dyn CatalogueSource>,
) -> io::Result<Receiver<Result<Vec<TrackRecord>, SourceUnavailable>>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("zensync-catalogue".to_string())
        .spawn(move || {
            let _ = tx.send(source.fetch_tracks());
        })?;
    Ok(rx)
}

/// The catalogue JSON a directory of descriptor pairs would serve.
pub fn export(dir: &Path, settings: &DiscoverySettings) -> Result<String, Box<dyn std::error::Error>> {
    let records = discover(dir, settings)?;
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn print_config(settings: &Settings) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(settings)
}
