//! HTTP client side of the gallery: filename derivation, upload and listing.

mod filename;
mod gallery_client;

pub use filename::{
    check_selected_file, computed_filename, extension_for, format_timestamp, slugify_name,
    SelectionError,
};
pub use gallery_client::{ClientError, GalleryClient, SelectedFile};
