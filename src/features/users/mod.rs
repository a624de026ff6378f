//! Team members.
//!
//! Owns the user record, the summary shape other resources expand references
//! into, and the team listing used to pick assignees.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/auth/users` | List user summaries |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
