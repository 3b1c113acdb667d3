pub mod auth;
pub mod category;
pub mod shared;
pub mod sub_category;
