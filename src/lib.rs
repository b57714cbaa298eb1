pub mod client;
pub mod config;
pub mod console;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod portal;
pub mod services;
pub mod state;
