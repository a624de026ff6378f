pub mod user_handler;

pub use user_handler::{__path_list_users, list_users};
