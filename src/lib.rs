pub mod batch;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod response_file;
