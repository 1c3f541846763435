//! `flow-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Owned};
pub use error::{DomainError, DomainResult, StoreError, StoreResult};
pub use id::{BreakdownId, UserId};
