/// Header the web client uses to carry its session token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Token type reported with issued credentials
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// RESPONSE MESSAGES
// =============================================================================

pub const MSG_REPORT_NOT_FOUND: &str = "Bug report not found";
pub const MSG_REPORT_REMOVED: &str = "Bug report removed";
pub const MSG_COMMENT_NOT_FOUND: &str = "Comment not found";
pub const MSG_COMMENT_REMOVED: &str = "Comment removed";
pub const MSG_USER_NOT_AUTHORIZED: &str = "User not authorized";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_ASSIGNED_USER_NOT_FOUND: &str = "Assigned user not found";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_USER_EXISTS: &str = "User already exists";
