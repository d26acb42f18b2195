// Common library for shared code across the API server and tests

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod session;
pub mod telemetry;
pub mod validate;
