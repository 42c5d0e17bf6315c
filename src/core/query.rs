use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use super::JournalEntry;

/// Token query over journal entries, e.g.
/// `account:572 start:2024-01-01 end:2024-01-31`.
#[derive(Debug, Default, Clone)]
pub struct Query {
    pub accounts: Vec<String>,
    pub exercises: Vec<Uuid>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidToken(String),
    InvalidDate(String),
    InvalidExercise(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidToken(t) => write!(f, "invalid token: {t}"),
            ParseError::InvalidDate(d) => write!(f, "invalid date: {d}"),
            ParseError::InvalidExercise(e) => write!(f, "invalid exercise id: {e}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut q = Query::default();
        for token in s.split_whitespace() {
            if let Some(rest) = token.strip_prefix("account:") {
                q.accounts.push(rest.to_string());
            } else if let Some(rest) = token.strip_prefix("exercise:") {
                let id = Uuid::parse_str(rest)
                    .map_err(|_| ParseError::InvalidExercise(rest.into()))?;
                q.exercises.push(id);
            } else if let Some(rest) = token.strip_prefix("start:") {
                q.start = Some(parse_date(rest)?);
            } else if let Some(rest) = token.strip_prefix("end:") {
                q.end = Some(parse_date(rest)?);
            } else if let Some(rest) = token.strip_prefix("date:") {
                let parts: Vec<&str> = rest.split("..").collect();
                if parts.len() != 2 {
                    return Err(ParseError::InvalidToken(token.into()));
                }
                if !parts[0].is_empty() {
                    q.start = Some(parse_date(parts[0])?);
                }
                if !parts[1].is_empty() {
                    q.end = Some(parse_date(parts[1])?);
                }
            } else {
                return Err(ParseError::InvalidToken(token.into()));
            }
        }
        Ok(q)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ParseError::InvalidDate(s.into()))
}

impl Query {
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(start) = self.start {
            if entry.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if entry.date > end {
                return false;
            }
        }
        if !self.accounts.is_empty()
            && !entry
                .lines
                .iter()
                .any(|l| self.accounts.contains(&l.account_code))
        {
            return false;
        }
        if !self.exercises.is_empty()
            && !entry
                .exercise_id
                .is_some_and(|id| self.exercises.contains(&id))
        {
            return false;
        }
        true
    }

    pub fn filter<'a>(&self, entries: &[&'a JournalEntry]) -> Vec<&'a JournalEntry> {
        entries
            .iter()
            .copied()
            .filter(|e| self.matches(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JournalLine;
    use rust_decimal::Decimal;

    fn entry(date: NaiveDate, code: &str, exercise_id: Option<Uuid>) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            number: 1,
            date,
            description: "asiento".into(),
            owner: "ana".into(),
            exercise_id,
            lines: vec![
                JournalLine::debit(code, "Cuenta", Decimal::new(10000, 2)),
                JournalLine::credit("700", "Ventas", Decimal::new(10000, 2)),
            ],
        }
    }

    #[test]
    fn parse_simple_tokens() {
        let q = Query::from_str("account:572 start:2024-01-01 end:2024-01-31").unwrap();
        assert_eq!(q.accounts, vec!["572"]);
        assert_eq!(q.start, Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert_eq!(q.end, Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(
            Query::from_str("cuenta:572").unwrap_err(),
            ParseError::InvalidToken("cuenta:572".into())
        );
    }

    #[test]
    fn filters_by_account_and_date() {
        let jan = entry(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "572", None);
        let feb = entry(NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(), "430", None);
        let entries = vec![&jan, &feb];

        let q = Query::from_str("account:572 date:2024-01-01..2024-01-31").unwrap();
        let res = q.filter(&entries);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, jan.id);
    }

    #[test]
    fn filters_by_exercise() {
        let exercise = Uuid::new_v4();
        let inside = entry(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "572",
            Some(exercise),
        );
        let outside = entry(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "572", None);
        let entries = vec![&inside, &outside];

        let q: Query = format!("exercise:{exercise}").parse().unwrap();
        let res = q.filter(&entries);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].id, inside.id);
    }
}
