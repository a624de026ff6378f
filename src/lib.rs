//! Team bug tracker: REST API service plus a typed client.

pub mod app;
pub mod client;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
