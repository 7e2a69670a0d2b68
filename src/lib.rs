//! Image upload and gallery service.
//!
//! The binary in `main.rs` serves the HTTP API; `features::images::client`
//! is the HTTP client used by front ends to derive filenames, upload and list.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
