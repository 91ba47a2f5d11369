pub mod assets;
pub mod config;
pub mod database;
pub mod http;
pub mod models;
pub mod render;
pub mod repositories;
