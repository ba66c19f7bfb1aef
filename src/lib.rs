pub mod account;
pub mod config;
pub mod cryptography;
pub mod error;
pub mod flows;
pub mod invite_manager;
pub mod invite_server;
pub mod response;
pub mod routes;
pub mod serde_implementations;
pub mod smtp_manager;
pub mod token;
pub mod r#trait;
