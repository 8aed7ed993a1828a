//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Reading file content (filesystem or in-memory)
//! - Durable key-value storage for preferences
//! - Platform colour-scheme detection
//! - Error types

pub mod error;
pub mod platform;
pub mod reader;
pub mod storage;
