use rust_decimal::Decimal;

use super::JournalLine;

/// Errors produced when a candidate entry fails double-entry validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Fewer than two lines carry a nonzero amount.
    InsufficientLines {
        /// How many non-inert lines were submitted.
        found: usize,
    },
    /// Debit and credit totals differ by more than the rounding tolerance.
    Unbalanced {
        /// Total of the debit side.
        debits: Decimal,
        /// Total of the credit side.
        credits: Decimal,
    },
}

impl ValidationError {
    /// Absolute difference between the two sides, for UI guidance.
    pub fn delta(&self) -> Decimal {
        match self {
            ValidationError::InsufficientLines { .. } => Decimal::ZERO,
            ValidationError::Unbalanced { debits, credits } => (*debits - *credits).abs(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InsufficientLines { found } => {
                write!(f, "an entry needs at least two nonzero lines, got {found}")
            }
            ValidationError::Unbalanced { debits, credits } => write!(
                f,
                "entry is unbalanced: debits {debits} != credits {credits} (delta {})",
                self.delta()
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks the double-entry constraint on a candidate entry's lines.
///
/// Lines with zero on both sides are discarded, not rejected. After
/// filtering, at least two lines must remain and the debit and credit totals
/// must agree within a tolerance of 0.01 (user input arrives rounded to
/// cents, so the tolerance absorbs a single rounding step and nothing more).
///
/// This is the sole gate protecting the ledger invariant; every write path
/// must call it before persisting.
pub fn validate(lines: &[JournalLine]) -> Result<(), ValidationError> {
    let active: Vec<&JournalLine> = lines.iter().filter(|l| !l.is_inert()).collect();
    if active.len() < 2 {
        return Err(ValidationError::InsufficientLines {
            found: active.len(),
        });
    }

    let debits: Decimal = active.iter().map(|l| l.debit).sum();
    let credits: Decimal = active.iter().map(|l| l.credit).sum();
    if (debits - credits).abs() > Decimal::new(1, 2) {
        return Err(ValidationError::Unbalanced { debits, credits });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn balanced_entry_passes() {
        let lines = vec![
            JournalLine::debit("600", "Compras", dec(200000)),
            JournalLine::debit("472", "IVA soportado", dec(42000)),
            JournalLine::credit("572", "Bancos", dec(121000)),
            JournalLine::credit("400", "Proveedores", dec(121000)),
        ];
        assert!(validate(&lines).is_ok());
    }

    #[test]
    fn single_line_is_insufficient() {
        let lines = vec![JournalLine::debit("430", "Clientes", dec(10000))];
        assert_eq!(
            validate(&lines),
            Err(ValidationError::InsufficientLines { found: 1 })
        );
    }

    #[test]
    fn inert_lines_do_not_count() {
        let lines = vec![
            JournalLine::debit("430", "Clientes", dec(10000)),
            JournalLine::debit("431", "Efectos", Decimal::ZERO),
        ];
        assert_eq!(
            validate(&lines),
            Err(ValidationError::InsufficientLines { found: 1 })
        );
    }

    #[test]
    fn unbalanced_entry_reports_delta() {
        let lines = vec![
            JournalLine::debit("430", "Clientes", dec(10000)),
            JournalLine::credit("700", "Ventas", dec(9000)),
        ];
        let err = validate(&lines).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Unbalanced {
                debits: dec(10000),
                credits: dec(9000),
            }
        );
        assert_eq!(err.delta(), dec(1000));
    }

    #[test]
    fn one_cent_difference_is_tolerated() {
        let lines = vec![
            JournalLine::debit("430", "Clientes", dec(10001)),
            JournalLine::credit("700", "Ventas", dec(10000)),
        ];
        assert!(validate(&lines).is_ok());

        let lines = vec![
            JournalLine::debit("430", "Clientes", dec(10002)),
            JournalLine::credit("700", "Ventas", dec(10000)),
        ];
        assert!(validate(&lines).is_err());
    }
}
