//! Modules layer - Infrastructure components behind the feature services
//!
//! Contains the persistence backends the API runs against.

pub mod store;
