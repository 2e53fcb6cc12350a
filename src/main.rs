// SPDX-License-Identifier: MPL-2.0
//! Thin interactive shell around the navigation engine. Reads single-letter
//! commands from stdin and prints the photo that should currently be
//! displayed; decoding and rendering are left to a display collaborator.

use chrono::Local;
use lens_hop::config::{self, defaults, Config};
use lens_hop::error::{Error, Result};
use lens_hop::history_log::ViewingHistory;
use lens_hop::index::PhotoIndex;
use lens_hop::navigation::Navigator;
use lens_hop::selector::{PhotoSelector, SelectedPhoto};
use std::io::{self, BufRead};
use std::path::PathBuf;

struct Flags {
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
    exclude: Vec<String>,
    history: Option<PathBuf>,
    no_history: bool,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("lens_hop: {}", err);
        std::process::exit(1);
    }
}

fn parse_flags() -> Result<Flags> {
    let mut args = pico_args::Arguments::from_env();
    let config_path = args
        .opt_value_from_str("--config")
        .map_err(|e| Error::Config(e.to_string()))?;
    let exclude = args
        .values_from_str("--exclude")
        .map_err(|e| Error::Config(e.to_string()))?;
    let history = args
        .opt_value_from_str("--history")
        .map_err(|e| Error::Config(e.to_string()))?;
    let no_history = args.contains("--no-history");
    let root = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok())
        .map(PathBuf::from);
    Ok(Flags {
        config_path,
        root,
        exclude,
        history,
        no_history,
    })
}

fn resolve_config(flags: Flags) -> Result<Config> {
    let mut config = match &flags.config_path {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    if let Some(root) = flags.root {
        config.photo_root = root;
    }
    if !flags.exclude.is_empty() {
        config.exclude = flags.exclude;
    }
    if flags.no_history {
        config.history_path = None;
    } else if let Some(history) = flags.history {
        config.history_path = Some(history);
    }
    if config.photo_root.as_os_str().is_empty() {
        return Err(Error::Config(
            "no photo collection root configured; pass one as the first argument".to_string(),
        ));
    }
    Ok(config)
}

fn run() -> Result<()> {
    let config = resolve_config(parse_flags()?)?;

    let index = PhotoIndex::scan(&config.photo_root, &config.exclude)?;
    let selector = PhotoSelector::new(index);
    let mut log = ViewingHistory::open(config.history_path.clone())?;
    let session_name = Local::now()
        .format(defaults::SESSION_TIME_FORMAT)
        .to_string();
    log.new_session(&session_name)?;
    let mut navigator = Navigator::new(selector, log);

    println!(
        "browsing {} (n: next, p: previous, r: random, d: queue directory, q: quit)",
        config.photo_root.display()
    );
    print_photo(navigator.next()?);

    for line in io::stdin().lock().lines() {
        let line = line?;
        let result = match line.trim() {
            "" | "n" => navigator.next().map(|photo| Some(photo.clone())),
            "p" => Ok(navigator.previous().cloned()),
            "r" => navigator.jump_random().map(|photo| Some(photo.clone())),
            "d" => navigator.queue_current_directory().map(|photo| photo.cloned()),
            "q" => break,
            other => {
                println!("unknown command '{}' (n/p/r/d/q)", other);
                continue;
            }
        };
        match result {
            Ok(Some(photo)) => print_photo(&photo),
            Ok(None) => {}
            // A failed draw or log write is reported but does not end the
            // browsing session.
            Err(err) => {
                log::warn!("navigation failed: {}", err);
                // A failed log write still advances the display; show
                // where we landed.
                if matches!(err, Error::Io(_)) {
                    if let Some(photo) = navigator.current() {
                        print_photo(photo);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_photo(photo: &SelectedPhoto) {
    match photo.captured_at() {
        Some(timestamp) => println!(
            "{}  [{}]  {}",
            photo.display_name(),
            timestamp.format("%d/%m/%Y"),
            photo.abs_path().display()
        ),
        None => println!("{}  {}", photo.display_name(), photo.abs_path().display()),
    }
}
