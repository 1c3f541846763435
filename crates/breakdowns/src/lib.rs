//! Breakdowns domain module (user-owned documents).
//!
//! Pure domain logic plus the store port; no IO, no HTTP.

pub mod breakdown;

pub use breakdown::{Breakdown, BreakdownDraft, BreakdownStore};
