pub mod account_requests;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod schema;
pub mod services;
