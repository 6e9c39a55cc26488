//! Custom Askama template filters.
//!
//! Route modules bring this into scope with `use crate::filters;` so the
//! template derive can resolve the filter names.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// The current year, for the footer copyright line.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as US dollars.
///
/// Usage in templates: `{{ meal.price|usd }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn usd(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${amount:.2}"))
}
