use chrono::{DateTime, TimeZone};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::shared::constants::MAX_FILE_SIZE;

/// Content types the upload form accepts
const ACCEPTED_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Slug used when the display name reduces to nothing
const DEFAULT_NAME_SLUG: &str = "image";

/// Maximum slug length in a stored filename
const MAX_NAME_SLUG_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Only PNG and JPEG files are allowed.")]
    UnsupportedType,
    #[error("Max file size is 10MB.")]
    TooLarge,
    #[error("Image name is required.")]
    MissingName,
}

/// Reduce free text to a filename slug
///
/// Strips diacritics, lowercases, turns whitespace runs into single hyphens,
/// drops anything outside `[a-z0-9-]`, collapses and trims hyphens, then
/// keeps the first 10 characters. Falls back to `image` when nothing is left.
pub fn slugify_name(name: &str) -> String {
    let deburred: String = name
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(deburred.len());
    let mut pending_hyphen = false;
    for c in deburred.chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        match c {
            '-' => pending_hyphen = true,
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            }
            _ => {}
        }
    }

    let sliced: String = slug.chars().take(MAX_NAME_SLUG_LEN).collect();
    if sliced.is_empty() {
        DEFAULT_NAME_SLUG.to_string()
    } else {
        sliced
    }
}

/// `YYYYMMDDHHMMSS` in the timestamp's own timezone
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y%m%d%H%M%S").to_string()
}

/// Extension the form uses for a content type
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpeg",
        _ => "png",
    }
}

/// `<slug>_<timestamp>.<ext>` as sent in the `name` field
pub fn computed_filename<Tz: TimeZone>(
    display_name: &str,
    content_type: &str,
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        slugify_name(display_name),
        format_timestamp(at),
        extension_for(content_type)
    )
}

/// Client-side checks run before anything is sent
pub fn check_selected_file(
    display_name: &str,
    content_type: &str,
    size: usize,
) -> Result<(), SelectionError> {
    if !ACCEPTED_TYPES.contains(&content_type) {
        return Err(SelectionError::UnsupportedType);
    }
    if size > MAX_FILE_SIZE {
        return Err(SelectionError::TooLarge);
    }
    if display_name.is_empty() {
        return Err(SelectionError::MissingName);
    }
    Ok(())
}
