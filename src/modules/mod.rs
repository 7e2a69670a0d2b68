//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for durable storage used by the features layer.

pub mod storage;
