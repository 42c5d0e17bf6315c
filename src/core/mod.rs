//! Core journal model and the derivation logic built on top of it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod ledger;
pub mod query;
mod store;
mod trial_balance;
mod validation;

pub use ledger::{LedgerAccount, Posting, aggregate};
pub use store::{JournalStore, NewEntry, StoreError};
pub use trial_balance::{TrialBalance, TrialBalanceRow, TrialBalanceTotals, reduce};
pub use validation::{ValidationError, validate};

/// A single account posting within a journal entry.
///
/// Carries the account code together with a denormalized display name; the
/// code is the grouping key, the name is presentation data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Account code, e.g. `"572"`.
    pub account_code: String,
    /// Account display name, e.g. `"Bancos"`.
    pub account_name: String,
    /// Amount on the debit (Debe) side. Non-negative.
    pub debit: Decimal,
    /// Amount on the credit (Haber) side. Non-negative.
    pub credit: Decimal,
}

impl JournalLine {
    /// Creates a line posting `amount` to the debit side.
    pub fn debit(code: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: code.into(),
            account_name: name.into(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a line posting `amount` to the credit side.
    pub fn credit(code: impl Into<String>, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: code.into(),
            account_name: name.into(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// A line with zero on both sides carries no posting and is discarded by
    /// the validator rather than rejected.
    pub fn is_inert(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }
}

/// One double-entry transaction (asiento) with two or more lines.
///
/// Immutable once persisted, except for deletion. The entry exclusively owns
/// its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub id: Uuid,
    /// Sequence number, starting at 1, scoped per owner and exercise context.
    pub number: u32,
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// The student whose journal this entry belongs to.
    pub owner: String,
    /// Exercise context, when the entry was authored inside an exercise.
    pub exercise_id: Option<Uuid>,
    /// The entry's postings.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sum of the debit side across all lines.
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of the credit side across all lines.
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}
