pub mod category;
pub mod role;
pub mod role_permission;
pub mod sub_category;
pub mod user;
