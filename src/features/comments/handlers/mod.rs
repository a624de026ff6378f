pub mod comment_handler;

pub use comment_handler::{
    __path_create_comment, __path_delete_comment, __path_list_report_comments, create_comment,
    delete_comment, list_report_comments,
};
