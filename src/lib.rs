pub mod analysis;
pub mod backend;
pub mod config;
pub mod database;
