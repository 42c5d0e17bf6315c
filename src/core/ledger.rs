use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::JournalEntry;

/// One contribution to a ledger account, copied from an entry line together
/// with the entry's header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub date: NaiveDate,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Derived per-account view (libro mayor). Recomputed on every read; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    pub code: String,
    pub name: String,
    /// Contributing postings, in the order the entries were supplied.
    pub postings: Vec<Posting>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

impl LedgerAccount {
    fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            postings: Vec::new(),
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
        }
    }

    /// Signed balance: debit total minus credit total.
    pub fn balance(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Groups the lines of `entries` by account code.
///
/// Per-account totals are commutative over entry order; the posting list
/// preserves the order entries were supplied in (callers pass entries ordered
/// by entry number for the chronological Libro Mayor convention). The map is
/// keyed by account code, so iteration yields ascending lexicographic order.
///
/// When the same code appears with different display names, the last line
/// encountered wins.
pub fn aggregate(entries: &[JournalEntry]) -> BTreeMap<String, LedgerAccount> {
    let mut ledger: BTreeMap<String, LedgerAccount> = BTreeMap::new();
    for entry in entries {
        for line in &entry.lines {
            let account = ledger
                .entry(line.account_code.clone())
                .or_insert_with(|| LedgerAccount::new(&line.account_code, &line.account_name));
            account.name = line.account_name.clone();
            account.postings.push(Posting {
                date: entry.date,
                description: entry.description.clone(),
                debit: line.debit,
                credit: line.credit,
            });
            account.total_debit += line.debit;
            account.total_credit += line.credit;
        }
    }
    ledger
}
