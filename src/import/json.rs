use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{EntryImporter, ImportError};
use crate::core::{JournalLine, NewEntry};

/// JSON wire shape for a candidate entry. Amounts are decimal strings so the
/// file never carries binary-float values; absent sides default to zero.
#[derive(Deserialize)]
struct JsonEntry {
    date: NaiveDate,
    description: String,
    #[serde(default)]
    exercise_id: Option<Uuid>,
    lines: Vec<JsonLine>,
}

#[derive(Deserialize)]
struct JsonLine {
    account_code: String,
    account_name: String,
    #[serde(default)]
    debit: Option<String>,
    #[serde(default)]
    credit: Option<String>,
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<Decimal, ImportError> {
    match value {
        None => Ok(Decimal::ZERO),
        Some(v) if v.trim().is_empty() => Ok(Decimal::ZERO),
        Some(v) => v
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ImportError::Parse(format!("invalid {field} amount: {v}"))),
    }
}

pub struct JsonImporter;

impl JsonImporter {
    fn parse_internal(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    pub fn parse_str(input: &str) -> Result<Vec<NewEntry>, ImportError> {
        let raw: Vec<JsonEntry> =
            serde_json::from_str(input).map_err(|e| ImportError::Parse(e.to_string()))?;
        raw.into_iter()
            .map(|entry| {
                let lines = entry
                    .lines
                    .into_iter()
                    .map(|line| {
                        Ok(JournalLine {
                            account_code: line.account_code,
                            account_name: line.account_name,
                            debit: parse_amount("debit", line.debit.as_deref())?,
                            credit: parse_amount("credit", line.credit.as_deref())?,
                        })
                    })
                    .collect::<Result<Vec<_>, ImportError>>()?;
                Ok(NewEntry {
                    date: entry.date,
                    description: entry.description,
                    exercise_id: entry.exercise_id,
                    lines,
                })
            })
            .collect()
    }
}

impl EntryImporter for JsonImporter {
    fn parse(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
        Self::parse_internal(path)
    }
}

pub fn parse(path: &Path) -> Result<Vec<NewEntry>, ImportError> {
    JsonImporter::parse(path)
}

pub fn parse_str(input: &str) -> Result<Vec<NewEntry>, ImportError> {
    JsonImporter::parse_str(input)
}
