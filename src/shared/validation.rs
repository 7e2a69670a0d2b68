use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for stored image filenames: `<slug>_<timestamp>.<ext>`
    /// - slug: 1 to 10 of `[a-z0-9-]`
    /// - timestamp: 14 digits, `YYYYMMDDHHMMSS`
    /// - ext: png, jpg or jpeg
    ///
    /// Case-insensitive as a whole, so `ABC_20240101120000.PNG` matches.
    /// ASCII only: unicode case folding and unicode digits are disabled.
    /// - Valid: "vacation_20240101120000.png", "a-b_20240101120000.JPEG"
    /// - Invalid: "Bad Name.png", "abcdefghijk_20240101120000.png", "abc_2024.png"
    pub static ref IMAGE_FILENAME_REGEX: Regex =
        Regex::new(r"(?i-u)^([a-z0-9-]{1,10})_([0-9]{14})\.(png|jpe?g)$").unwrap();
}
