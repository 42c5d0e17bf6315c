//! Presentation-facing views of the derived ledger and trial balance.
//!
//! Monetary fields cross the boundary as decimal strings with exactly two
//! fraction digits, so no consumer ever sees a binary-float rendering of a
//! currency amount. Rounding happens here, at formatting time, and nowhere
//! else.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{LedgerAccount, Posting, TrialBalance};

mod service;

pub use service::{JournalService, Role, ServiceError, SubmissionStatus};

/// Serde helper: `Decimal` as a string with two fraction digits.
mod decimal2 {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as DeError};

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", value.round_dp(2)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Decimal>().map_err(DeError::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingView {
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "decimal2")]
    pub debit: Decimal,
    #[serde(with = "decimal2")]
    pub credit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccountView {
    pub account_code: String,
    pub account_name: String,
    pub entries: Vec<PostingView>,
    #[serde(with = "decimal2")]
    pub total_debit: Decimal,
    #[serde(with = "decimal2")]
    pub total_credit: Decimal,
    #[serde(with = "decimal2")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRowView {
    pub account_code: String,
    pub account_name: String,
    #[serde(with = "decimal2")]
    pub debit_sum: Decimal,
    #[serde(with = "decimal2")]
    pub credit_sum: Decimal,
    #[serde(with = "decimal2")]
    pub debit_balance: Decimal,
    #[serde(with = "decimal2")]
    pub credit_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceTotalsView {
    #[serde(with = "decimal2")]
    pub debit_sum: Decimal,
    #[serde(with = "decimal2")]
    pub credit_sum: Decimal,
    #[serde(with = "decimal2")]
    pub debit_balance: Decimal,
    #[serde(with = "decimal2")]
    pub credit_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceView {
    pub rows: Vec<TrialBalanceRowView>,
    pub totals: TrialBalanceTotalsView,
}

impl From<&Posting> for PostingView {
    fn from(p: &Posting) -> Self {
        Self {
            date: p.date,
            description: p.description.clone(),
            debit: p.debit,
            credit: p.credit,
        }
    }
}

impl From<&LedgerAccount> for LedgerAccountView {
    fn from(account: &LedgerAccount) -> Self {
        Self {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            entries: account.postings.iter().map(PostingView::from).collect(),
            total_debit: account.total_debit,
            total_credit: account.total_credit,
            balance: account.balance(),
        }
    }
}

impl From<&TrialBalance> for TrialBalanceView {
    fn from(tb: &TrialBalance) -> Self {
        Self {
            rows: tb
                .rows
                .iter()
                .map(|row| TrialBalanceRowView {
                    account_code: row.account_code.clone(),
                    account_name: row.account_name.clone(),
                    debit_sum: row.debit_sum,
                    credit_sum: row.credit_sum,
                    debit_balance: row.debit_balance,
                    credit_balance: row.credit_balance,
                })
                .collect(),
            totals: TrialBalanceTotalsView {
                debit_sum: tb.totals.debit_sum,
                credit_sum: tb.totals.credit_sum,
                debit_balance: tb.totals.debit_balance,
                credit_balance: tb.totals.credit_balance,
            },
        }
    }
}

/// Converts an aggregated ledger into views, preserving the map's ascending
/// account-code order.
pub fn ledger_views(ledger: &BTreeMap<String, LedgerAccount>) -> Vec<LedgerAccountView> {
    ledger.values().map(LedgerAccountView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_serialize_with_two_fraction_digits() {
        let view = PostingView {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "venta".into(),
            debit: Decimal::new(1210, 0),
            credit: Decimal::ZERO,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["debit"], "1210.00");
        assert_eq!(json["credit"], "0.00");
    }

    #[test]
    fn amounts_round_trip_through_strings() {
        let view = PostingView {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "venta".into(),
            debit: Decimal::new(121000, 2),
            credit: Decimal::ZERO,
        };
        let json = serde_json::to_string(&view).unwrap();
        let parsed: PostingView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.debit, view.debit);
    }
}
