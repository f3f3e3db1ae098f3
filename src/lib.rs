// ABOUTME: Library root for nvcf - cloud function lifecycle management.
// ABOUTME: The main binary is in main.rs.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod provider;
pub mod reconcile;
pub mod state_file;
pub mod types;
