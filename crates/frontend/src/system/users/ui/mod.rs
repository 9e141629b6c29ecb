pub mod delete;
pub mod details;
pub mod form;
pub mod list;
pub mod password;
