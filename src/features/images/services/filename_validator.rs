use thiserror::Error;

use crate::core::error::AppError;
use crate::shared::validation::IMAGE_FILENAME_REGEX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error(
        "Invalid name. Must match <10 letters/numbers/dashes>_<14-digit timestamp>.(png|jpg|jpeg)"
    )]
    InvalidName,
    #[error("No file uploaded")]
    NoFile,
    #[error("File extension does not match uploaded file type")]
    ExtensionMismatch,
}

impl From<FilenameError> for AppError {
    fn from(err: FilenameError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// A filename that passed validation, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFilename {
    pub filename: String,
    pub slug: String,
    pub timestamp: String,
    /// Lowercased extension token: `png`, `jpg` or `jpeg`
    pub extension: String,
}

/// Validate a requested filename against the declared type of the uploaded file
///
/// `content_type` is `None` when the request carried no file. The file's MIME
/// subtype must equal the extension token literally, so `image/jpeg` pairs with
/// `.jpeg` and `image/jpg` with `.jpg`.
pub fn validate_filename(
    candidate: &str,
    content_type: Option<&str>,
) -> Result<ValidatedFilename, FilenameError> {
    let caps = IMAGE_FILENAME_REGEX
        .captures(candidate)
        .ok_or(FilenameError::InvalidName)?;

    let extension = caps[3].to_ascii_lowercase();

    let content_type = content_type.ok_or(FilenameError::NoFile)?;
    let subtype = content_type.split('/').nth(1);
    if subtype != Some(extension.as_str()) {
        return Err(FilenameError::ExtensionMismatch);
    }

    Ok(ValidatedFilename {
        filename: candidate.to_string(),
        slug: caps[1].to_string(),
        timestamp: caps[2].to_string(),
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{ACCEPTED_FILENAMES, REJECTED_FILENAMES};

    fn content_type_for(name: &str) -> String {
        let ext = name.rsplit('.').next().unwrap().to_ascii_lowercase();
        format!("image/{}", ext)
    }

    #[test]
    fn test_accepts_fixture_names_with_matching_subtype() {
        for name in ACCEPTED_FILENAMES {
            let content_type = content_type_for(name);
            let result = validate_filename(name, Some(&content_type));
            assert!(result.is_ok(), "expected accept: {name}");
        }
    }

    #[test]
    fn test_rejects_fixture_names() {
        for name in REJECTED_FILENAMES {
            assert_eq!(
                validate_filename(name, Some("image/png")),
                Err(FilenameError::InvalidName),
                "expected reject: {name}"
            );
        }
    }

    #[test]
    fn test_extracts_parts() {
        let validated = validate_filename("vacation_20240101120000.PNG", Some("image/png")).unwrap();
        assert_eq!(validated.slug, "vacation");
        assert_eq!(validated.timestamp, "20240101120000");
        assert_eq!(validated.extension, "png");
        assert_eq!(validated.filename, "vacation_20240101120000.PNG");
    }

    #[test]
    fn test_bad_name_message() {
        let err = validate_filename("Bad Name.png", Some("image/png")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid name."));
    }

    #[test]
    fn test_pattern_checked_before_missing_file() {
        assert_eq!(
            validate_filename("Bad Name.png", None),
            Err(FilenameError::InvalidName)
        );
        assert_eq!(
            validate_filename("abc_20240101120000.png", None),
            Err(FilenameError::NoFile)
        );
    }

    #[test]
    fn test_subtype_mismatch() {
        assert_eq!(
            validate_filename("abc_20240101120000.jpg", Some("image/png")),
            Err(FilenameError::ExtensionMismatch)
        );
        assert_eq!(
            FilenameError::ExtensionMismatch.to_string(),
            "File extension does not match uploaded file type"
        );
    }

    #[test]
    fn test_jpg_and_jpeg_are_not_interchangeable() {
        assert_eq!(
            validate_filename("abc_20240101120000.jpg", Some("image/jpeg")),
            Err(FilenameError::ExtensionMismatch)
        );
        assert!(validate_filename("abc_20240101120000.jpeg", Some("image/jpeg")).is_ok());
        assert!(validate_filename("abc_20240101120000.jpg", Some("image/jpg")).is_ok());
    }

    #[test]
    fn test_content_type_without_subtype_mismatches() {
        assert_eq!(
            validate_filename("abc_20240101120000.png", Some("png")),
            Err(FilenameError::ExtensionMismatch)
        );
    }
}
