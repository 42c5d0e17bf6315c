use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LedgerAccount;

/// One account's row in the balance de comprobación: raw sums plus the net
/// balance split by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_code: String,
    pub account_name: String,
    pub debit_sum: Decimal,
    pub credit_sum: Decimal,
    pub debit_balance: Decimal,
    pub credit_balance: Decimal,
}

/// Element-wise column totals across all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    pub debit_sum: Decimal,
    pub credit_sum: Decimal,
    pub debit_balance: Decimal,
    pub credit_balance: Decimal,
}

/// Derived trial balance. Recomputed on every read; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub totals: TrialBalanceTotals,
}

impl TrialBalance {
    /// Whether the closure invariant holds. For any ledger built exclusively
    /// from validator-accepted entries this must be true; a `false` here means
    /// either a validator bypass or an aggregation bug.
    pub fn is_balanced(&self) -> bool {
        self.totals.debit_sum == self.totals.credit_sum
            && self.totals.debit_balance == self.totals.credit_balance
    }
}

/// Reduces a ledger to trial-balance rows, one per account in ascending
/// account-code order, plus the totals row.
pub fn reduce(ledger: &BTreeMap<String, LedgerAccount>) -> TrialBalance {
    let mut rows = Vec::with_capacity(ledger.len());
    let mut totals = TrialBalanceTotals::default();

    for account in ledger.values() {
        let balance = account.balance();
        let row = TrialBalanceRow {
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit_sum: account.total_debit,
            credit_sum: account.total_credit,
            debit_balance: balance.max(Decimal::ZERO),
            credit_balance: (-balance).max(Decimal::ZERO),
        };
        totals.debit_sum += row.debit_sum;
        totals.credit_sum += row.credit_sum;
        totals.debit_balance += row.debit_balance;
        totals.credit_balance += row.credit_balance;
        rows.push(row);
    }

    TrialBalance { rows, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JournalEntry, JournalLine, aggregate};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn entry(lines: Vec<JournalLine>) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            number: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: "asiento".into(),
            owner: "ana".into(),
            exercise_id: None,
            lines,
        }
    }

    #[test]
    fn balance_splits_by_side() {
        let entries = vec![entry(vec![
            JournalLine::debit("430", "Clientes", dec(10000)),
            JournalLine::credit("700", "Ventas", dec(10000)),
        ])];
        let tb = reduce(&aggregate(&entries));

        assert_eq!(tb.rows.len(), 2);
        let clientes = &tb.rows[0];
        assert_eq!(clientes.account_code, "430");
        assert_eq!(clientes.debit_balance, dec(10000));
        assert_eq!(clientes.credit_balance, Decimal::ZERO);
        let ventas = &tb.rows[1];
        assert_eq!(ventas.credit_balance, dec(10000));
        assert_eq!(ventas.debit_balance, Decimal::ZERO);
        assert!(tb.is_balanced());
    }

    #[test]
    fn empty_ledger_reduces_to_zero_totals() {
        let tb = reduce(&BTreeMap::new());
        assert!(tb.rows.is_empty());
        assert_eq!(tb.totals, TrialBalanceTotals::default());
        assert!(tb.is_balanced());
    }
}
