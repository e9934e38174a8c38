pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod push;
pub mod state;
pub mod store;
