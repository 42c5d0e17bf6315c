//! Libro Diario
//!
//! This crate provides the double-entry bookkeeping core of a classroom
//! accounting simulator: journal entries with debit/credit lines, the balance
//! validator that gates every write, and the derived ledger (libro mayor) and
//! trial balance (balance de comprobación) views.

pub mod boundary;
pub mod core;
pub mod import;
