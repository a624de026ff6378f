//! Client side of the API: a typed HTTP client, the signed-in session, and
//! the locally cached report lists the dashboard renders from.

mod api;
mod cache;
mod error;
mod session;

pub use api::ApiClient;
pub use cache::{ReportListCache, ReportView};
pub use error::{ClientError, Result};
pub use session::{token_expiry, Session};
