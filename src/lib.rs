pub mod agent;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
