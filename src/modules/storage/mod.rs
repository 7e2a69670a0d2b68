//! Storage module for processed images
//!
//! Provides the local image directory that uploads are written to and
//! that is served as static files.

mod image_directory;

pub use image_directory::ImageDirectory;
