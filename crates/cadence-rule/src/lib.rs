//! Recurring-appointment rule engine.
//!
//! Converts between the structured recurrence settings edited in the
//! scheduling dialogs and the compact `RRULE`-style string stored on an
//! appointment series.

pub mod error;
pub mod form;
pub mod rule;
