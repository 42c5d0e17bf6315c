use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use libro_diario::boundary::{TrialBalanceView, ledger_views};
use libro_diario::core::{
    JournalEntry, JournalLine, JournalStore, NewEntry, query::Query, aggregate, reduce,
};
use libro_diario::import;

#[derive(Serialize, Deserialize)]
struct Config {
    owner: String,
    journal_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "student".into(),
            journal_path: PathBuf::from("journal.json"),
        }
    }
}

#[derive(Parser)]
#[command(name = "libro-diario", about = "Author journal entries and derive ledgers")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "libro.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a journal entry; lines are CODE:NAME:DEBIT:CREDIT
    Add {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        description: String,
        #[arg(long)]
        exercise: Option<Uuid>,
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
    },
    /// Delete a journal entry by id
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Print the per-account ledger as JSON
    Ledger {
        #[arg(long)]
        exercise: Option<Uuid>,
        /// Token filter, e.g. "account:572 date:2024-01-01..2024-01-31"
        #[arg(long)]
        query: Option<String>,
    },
    /// Print the trial balance as JSON
    TrialBalance {
        #[arg(long)]
        exercise: Option<Uuid>,
    },
    /// Import candidate entries from a CSV or JSON file
    Import {
        #[arg(long, conflicts_with = "json")]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(toml::from_str(&fs::read_to_string(path)?)?)
    } else {
        Ok(Config::default())
    }
}

fn load_store(path: &PathBuf) -> Result<JournalStore, Box<dyn std::error::Error>> {
    if path.exists() {
        let entries: Vec<JournalEntry> = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(JournalStore::from_entries(entries))
    } else {
        Ok(JournalStore::default())
    }
}

fn save_store(path: &PathBuf, store: &JournalStore) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<&JournalEntry> = store.entries().collect();
    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}

fn parse_line(raw: &str) -> Result<JournalLine, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(format!("expected CODE:NAME:DEBIT:CREDIT, got: {raw}"));
    }
    let debit =
        Decimal::from_str(parts[2]).map_err(|_| format!("invalid debit amount: {}", parts[2]))?;
    let credit =
        Decimal::from_str(parts[3]).map_err(|_| format!("invalid credit amount: {}", parts[3]))?;
    Ok(JournalLine {
        account_code: parts[0].to_string(),
        account_name: parts[1].to_string(),
        debit,
        credit,
    })
}

fn owned_entries(store: &JournalStore, owner: &str, exercise: Option<Uuid>) -> Vec<JournalEntry> {
    store
        .entries_for(owner, exercise)
        .into_iter()
        .cloned()
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let mut store = load_store(&config.journal_path)?;

    match cli.command {
        Commands::Add {
            date,
            description,
            exercise,
            lines,
        } => {
            let lines = lines
                .iter()
                .map(|l| parse_line(l))
                .collect::<Result<Vec<_>, _>>()?;
            let entry = store.create(
                &config.owner,
                NewEntry {
                    date,
                    description,
                    exercise_id: exercise,
                    lines,
                },
            )?;
            println!("{} (asiento {})", entry.id, entry.number);
            save_store(&config.journal_path, &store)?;
        }
        Commands::Delete { id } => {
            store.remove(&config.owner, id)?;
            save_store(&config.journal_path, &store)?;
        }
        Commands::Ledger { exercise, query } => {
            let entries = owned_entries(&store, &config.owner, exercise);
            let entries = match query {
                Some(q) => {
                    let query = Query::from_str(&q)?;
                    let refs: Vec<&JournalEntry> = entries.iter().collect();
                    query.filter(&refs).into_iter().cloned().collect()
                }
                None => entries,
            };
            let views = ledger_views(&aggregate(&entries));
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        Commands::TrialBalance { exercise } => {
            let entries = owned_entries(&store, &config.owner, exercise);
            let view = TrialBalanceView::from(&reduce(&aggregate(&entries)));
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Import { csv, json } => {
            let candidates = match (csv, json) {
                (Some(path), _) => import::csv::parse(&path)?,
                (None, Some(path)) => import::json::parse(&path)?,
                (None, None) => return Err("pass --csv or --json".into()),
            };
            let mut posted = 0usize;
            for candidate in candidates {
                let entry = store.create(&config.owner, candidate)?;
                info!(entry = %entry.id, number = entry.number, "Imported entry");
                posted += 1;
            }
            println!("imported {posted} entries");
            save_store(&config.journal_path, &store)?;
        }
    }

    Ok(())
}
