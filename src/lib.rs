pub mod api;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod paths;
pub mod process;
pub mod repository;
pub mod services;
