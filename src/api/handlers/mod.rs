pub mod auth;
pub mod execution;
pub mod filesystem;
pub mod health;
pub mod job;
pub mod permission;
pub mod repository;
pub mod system;
pub mod ui;
pub mod user;
