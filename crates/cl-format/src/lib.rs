//! CL Format - Chilean value formatting
//!
//! This crate provides:
//! - Chilean peso formatting (`$12.345`, `$12.345 CLP`)
//! - Parsing of typed peso amounts
//! - IVA (19%) decomposition of tax-inclusive totals
//! - `dd/mm/yyyy` date and date-time formatting
//!
//! # Example
//!
//! ```ignore
//! use cl_format::{format_clp, format_date_time_str, TaxBreakdown};
//!
//! let text = format_clp(12345.0, false);       // "$12.345"
//! let split = TaxBreakdown::from_gross(119.0);  // subtotal 100, tax 19
//! let when = format_date_time_str("2024-03-05T14:30:00Z", None)?; // "05/03/2024 14:30"
//! ```

mod currency;
mod date;
mod tax;

pub use currency::{format_clp, parse_clp, CURRENCY_LABEL};
pub use date::{
    format_date, format_date_str, format_date_time, format_date_time_str, parse_timestamp,
};
pub use tax::{TaxBreakdown, IVA_RATE};

use thiserror::Error;

/// Errors that can occur while parsing values for formatting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type for formatting operations
pub type Result<T> = std::result::Result<T, FormatError>;
