pub mod client;
pub mod config;
pub mod fallback;
pub mod models;
pub mod pagination;
pub mod savings;
pub mod session;
pub mod transcript;
