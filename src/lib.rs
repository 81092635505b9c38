// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::application::Clipboard;
use crate::cli::args::{Args, Command};
use crate::domain::{project, sort_notes, NoteFilter};
use crate::infrastructure::{Config, ExportDocument, LocalCache, SystemClipboard};
use crate::ports::ListingPresenter;

/// Offline CLI entry point. Only the local cache is touched here; remote
/// reconciliation happens in the host application through
/// [`application::SyncCoordinator`].
pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting phrasesnap with arguments");

    let (data_dir, config) = resolve_storage(args.data_dir, default_data_dir()?)?;
    debug!(?data_dir, "Resolved storage directory");
    let cache = LocalCache::new(&data_dir)?;

    match args.command {
        Command::List {
            group,
            search,
            sort,
        } => {
            let filter = NoteFilter {
                subgroup_id: group,
                query: search.unwrap_or_default(),
            };
            let mut notes = project(&cache.all_notes(), &filter);
            sort_notes(&mut notes, sort.unwrap_or_else(|| config.sort_key()));

            let presenter = ListingPresenter::new();
            print!("{}", presenter.render(&notes, &cache.all_subgroups()));
        }
        Command::Groups => {
            for subgroup in cache.all_subgroups() {
                println!("{}  {} ({})", subgroup.id, subgroup.name, subgroup.color);
            }
        }
        Command::Copy { id } => {
            let note = cache
                .note_by_id(&id)
                .with_context(|| format!("No cached note with id {id}"))?;

            let mut clipboard = SystemClipboard::new();
            clipboard.write_text(&format!("{}\n\n{}", note.title, note.content))?;
            // Offline surface: only the local count moves; the remote count
            // is owned by the host application's sync coordinator.
            cache.increment_copy_count(&id)?;
            info!(note_id = %id, "Copied note to clipboard");
        }
        Command::Export { path } => {
            let document = cache.export_data();
            let json = serde_json::to_string_pretty(&document)
                .context("Failed to serialize export document")?;
            match path {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| {
                        format!("Failed to write export to {}", path.display())
                    })?;
                    info!(path = %path.display(), "Exported cache snapshot");
                }
                None => println!("{json}"),
            }
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            let document: ExportDocument =
                serde_json::from_str(&raw).context("Failed to parse snapshot")?;
            cache.import_data(&document)?;
            info!(
                notes = document.notes.len(),
                subgroups = document.subgroups.len(),
                "Imported cache snapshot"
            );
        }
        Command::Clear => {
            cache.clear_all()?;
            info!("Cleared local cache");
        }
    }

    Ok(())
}

/// Platform data directory for the cache blobs and config file.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not find platform data directory")?;
    Ok(base.join("phrasesnap"))
}

/// Resolve the cache directory together with the configuration governing it.
///
/// The config file is read from the command-line directory when one is given,
/// otherwise from `base`. Without a command-line override, a non-empty
/// `storage.data_dir` in the config redirects the cache blobs.
fn resolve_storage(cli_dir: Option<PathBuf>, base: PathBuf) -> Result<(PathBuf, Config)> {
    match cli_dir {
        Some(dir) => {
            let config = load_config(&dir)?;
            Ok((dir, config))
        }
        None => {
            let config = load_config(&base)?;
            let dir = config.data_dir().unwrap_or(base);
            Ok((dir, config))
        }
    }
}

fn load_config(data_dir: &Path) -> Result<Config> {
    let path = data_dir.join(constants::CONFIG_FILE);
    if path.exists() {
        Config::load(&path)
    } else {
        Ok(Config::default())
    }
}
