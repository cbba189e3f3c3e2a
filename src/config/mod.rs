//! Configuration module for Jayloy
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution and collection keys
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::JayloyPaths;
pub use settings::Settings;
