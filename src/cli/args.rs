// src/cli/args.rs
use crate::domain::SortKey;
use clap::builder::PossibleValue;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Directory holding the cached collections (optional)
    #[arg(short, long, value_name = "DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List cached notes
    List {
        /// Only notes in this subgroup id
        #[arg(short, long, value_name = "SUBGROUP_ID")]
        group: Option<String>,

        /// Case-insensitive search over title and content
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
    },

    /// List cached subgroups
    Groups,

    /// Copy a cached note to the clipboard and bump its local copy count
    Copy {
        /// Note id to copy
        #[arg(value_name = "NOTE_ID")]
        id: String,
    },

    /// Write a JSON snapshot of both cached collections
    Export {
        /// Output file (stdout when omitted)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Replace the cached collections with a previously exported snapshot
    Import {
        /// Snapshot file to read
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Remove both cached collections
    Clear,
}

// Keeps the domain type free of CLI concerns.
impl ValueEnum for SortKey {
    fn value_variants<'a>() -> &'a [Self] {
        &[SortKey::Updated, SortKey::Created, SortKey::Title]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self {
            SortKey::Updated => PossibleValue::new("updated").help("Most recently updated first"),
            SortKey::Created => PossibleValue::new("created").help("Most recently created first"),
            SortKey::Title => PossibleValue::new("title").help("Title, ascending"),
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_sort_flag_when_parsing_then_sort_key_is_selected() {
        let args = Args::try_parse_from(["phrasesnap", "list", "--sort", "title"]).unwrap();

        match args.command {
            Command::List { sort, .. } => assert_eq!(sort, Some(SortKey::Title)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn given_unknown_sort_value_when_parsing_then_it_is_rejected() {
        let result = Args::try_parse_from(["phrasesnap", "list", "--sort", "frobnicate"]);

        assert!(result.is_err());
    }
}
