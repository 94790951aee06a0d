//! Command-line client for the journal store.
//!
//! # Responsibility
//! - Expose list/get/create/update/delete/kind over a journal database file.
//! - Print results as JSON so output stays scriptable.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use journal_core::{
    default_log_level, display_date, init_logging, EntryId, EntryService, EntryValues, Field,
    JournalEntry, JournalProvider, JournalStore, Locator, NewEntry, StoreLocation,
};
use log::info;
use serde_json::json;
use std::path::PathBuf;

/// Keep a local journal of dated entries.
#[derive(Parser, Debug)]
#[command(name = "journal", version, about, long_about = None)]
struct Cli {
    /// Journal database file
    #[arg(long, default_value = "journals.db")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "JOURNAL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every entry
    List,
    /// Show one entry
    Get {
        #[arg(value_parser = entry_id_parser())]
        id: i64,
    },
    /// Create an entry
    Create {
        /// Entry day as yyyy-MM-dd
        #[arg(long)]
        date: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Change some fields of an entry
    Update {
        #[arg(value_parser = entry_id_parser())]
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long, conflicts_with = "clear_message")]
        message: Option<String>,
        /// Set the message to null
        #[arg(long)]
        clear_message: bool,
    },
    /// Delete one entry
    Delete {
        #[arg(value_parser = entry_id_parser())]
        id: i64,
    },
    /// Delete every entry
    DeleteAll,
    /// Print the resource type of a locator
    Kind { locator: String },
}

/// Row ids are never negative.
fn entry_id_parser() -> clap::builder::RangedI64ValueParser<i64> {
    clap::value_parser!(i64).range(0..)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let provider = JournalProvider::new(JournalStore::new(StoreLocation::File(cli.db.clone())));
    let service = EntryService::new(&provider);
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::List => {
            let entries = service.list_entries()?;
            let rendered: Vec<_> = entries.iter().map(render_entry).collect();
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        Command::Get { id } => {
            let Some(entry) = service.get_entry(EntryId::new(id))? else {
                bail!("entry {id} not found");
            };
            println!("{}", serde_json::to_string_pretty(&render_entry(&entry))?);
        }
        Command::Create {
            date,
            title,
            summary,
            message,
        } => {
            let mut entry = NewEntry::new(date, title, summary);
            entry.message = message;
            let locator = service.create_entry(&entry)?;
            println!("{}", json!({ "locator": locator, "id": locator.last_id() }));
        }
        Command::Update {
            id,
            date,
            title,
            summary,
            message,
            clear_message,
        } => {
            let mut values = EntryValues::new();
            for (field, value) in [
                (Field::Date, date),
                (Field::Title, title),
                (Field::Summary, summary),
                (Field::Message, message),
            ] {
                if let Some(value) = value {
                    values.put(field, value);
                }
            }
            if clear_message {
                values.put_null(Field::Message);
            }
            let rows = service.update_entry(EntryId::new(id), &values)?;
            println!("{}", json!({ "rows_affected": rows }));
        }
        Command::Delete { id } => {
            let rows = service.delete_entry(EntryId::new(id))?;
            println!("{}", json!({ "rows_deleted": rows }));
        }
        Command::DeleteAll => {
            let rows = service.delete_all_entries()?;
            println!("{}", json!({ "rows_deleted": rows }));
        }
        Command::Kind { locator } => {
            let kind = service.resource_kind(&Locator::new(locator))?;
            println!(
                "{}",
                json!({ "kind": kind.as_str(), "mime_type": kind.mime_type() })
            );
        }
    }

    Ok(())
}

fn render_entry(entry: &JournalEntry) -> serde_json::Value {
    json!({
        "id": entry.id,
        "date": entry.date,
        "display_date": display_date(&entry.date),
        "title": entry.title,
        "summary": entry.summary,
        "message": entry.message,
    })
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Get { .. } => "get",
        Command::Create { .. } => "create",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
        Command::DeleteAll => "delete_all",
        Command::Kind { .. } => "kind",
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn entry_ids_must_be_non_negative() {
        let cli = Cli::try_parse_from(["journal", "get", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Get { id: 3 }));

        let err = Cli::try_parse_from(["journal", "delete", "--", "-1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(Cli::try_parse_from(["journal", "update", "--", "-7"]).is_err());
    }
}
