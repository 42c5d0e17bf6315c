use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{EntryImporter, ImportError};
use crate::core::{JournalLine, NewEntry};

/// One CSV row is one journal line; consecutive rows sharing the `entry` key
/// form one candidate entry. Amounts and dates arrive as text and are parsed
/// strictly.
#[derive(Deserialize)]
struct CsvRow {
    entry: String,
    date: String,
    description: String,
    account_code: String,
    account_name: String,
    debit: String,
    credit: String,
    #[serde(default)]
    exercise_id: Option<Uuid>,
}

fn parse_amount(field: &str, value: &str) -> Result<Decimal, ImportError> {
    if value.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ImportError::Parse(format!("invalid {field} amount: {value}")))
}

fn parse_date(value: &str) -> Result<NaiveDate, ImportError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ImportError::Parse(format!("invalid date: {value}")))
}

pub struct CsvImporter;

impl CsvImporter {
    fn parse_internal(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
        let mut rdr = Reader::from_path(path).map_err(|e| ImportError::Parse(e.to_string()))?;
        let mut entries: Vec<NewEntry> = Vec::new();
        let mut current_key: Option<String> = None;

        for result in rdr.deserialize() {
            let row: CsvRow = result.map_err(|e| ImportError::Parse(e.to_string()))?;
            let line = JournalLine {
                account_code: row.account_code,
                account_name: row.account_name,
                debit: parse_amount("debit", &row.debit)?,
                credit: parse_amount("credit", &row.credit)?,
            };

            if current_key.as_deref() == Some(row.entry.as_str()) {
                entries
                    .last_mut()
                    .expect("group key implies an open entry")
                    .lines
                    .push(line);
            } else {
                current_key = Some(row.entry);
                entries.push(NewEntry {
                    date: parse_date(&row.date)?,
                    description: row.description,
                    exercise_id: row.exercise_id,
                    lines: vec![line],
                });
            }
        }
        Ok(entries)
    }
}

impl EntryImporter for CsvImporter {
    fn parse(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
        Self::parse_internal(path)
    }
}

pub fn parse(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
    CsvImporter::parse(path)
}
