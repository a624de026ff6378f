pub mod auth_handler;

pub use auth_handler::{
    __path_get_current_user, __path_login, __path_register, get_current_user, login, register,
};
