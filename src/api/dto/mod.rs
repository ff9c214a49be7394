pub mod execution;
pub mod filesystem;
pub mod job;
pub mod permission;
pub mod repository;
pub mod user;
