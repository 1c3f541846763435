//! Document store adapters.

pub mod accounts;
pub mod breakdowns;
pub mod document_store;

pub use accounts::InMemoryAccountStore;
pub use breakdowns::InMemoryBreakdownStore;
pub use document_store::InMemoryDocumentStore;
