pub mod admin;
pub mod base;
pub mod sign_up;
