//! # KinFind Common Library
//!
//! Shared code for the KinFind service:
//! - Database schema and queries for missing / found reports
//! - Record models
//! - Image storage and content hashing
//! - Configuration loading and root folder resolution

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
pub use storage::{content_hash, ImageKind, ImageStore};
