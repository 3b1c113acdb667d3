pub mod auth;
pub mod category;
pub mod image;
pub mod sub_category;
