//! Shared types and configuration for Koruna.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts paired with open currency codes
//! - Typed IDs for type-safe entity references
//! - Fixed-format bank account numbers
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
