//! Infrastructure layer: store adapters behind the domain ports.

pub mod store;
