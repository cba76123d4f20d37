//! Errors specific to reading, writing or modifying icon and version resources.

use alloc::string::String;

#[cfg(feature = "images")]
use image::ImageError;

/// Error that can occur when reading and parsing bytes.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[cfg_attr(feature = "std", error("{0}"))]
pub struct ReadError(pub String);

/// Errors that can occur when reading or modifying icon and cursor resources.
#[derive(Debug)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum IconError {
    #[cfg_attr(feature = "std", error("invalid directory: {0}"))]
    InvalidDirectory(String),
    #[cfg_attr(feature = "std", error("image {0} points outside data: {1} > {2}"))]
    InvalidRange(usize, u64, u64),
    #[cfg_attr(feature = "std", error("invalid entry index: {0}"))]
    InvalidIndex(usize),
    #[cfg_attr(feature = "std", error("image {0} has no resource id"))]
    MissingId(usize),
    #[cfg_attr(feature = "std", error("image {0} with resource id {1} not found"))]
    MissingImage(usize, u16),
    #[cfg_attr(feature = "std", error("{0} exceeds the directory format: {1}"))]
    TooLarge(String, usize),
    #[cfg_attr(feature = "std", error("invalid bytes: {0}"))]
    InvalidBytes(ReadError),
    #[cfg(feature = "images")]
    #[error("invalid image: {0}")]
    InvalidImage(ImageError),
}
impl From<ReadError> for IconError {
    fn from(error: ReadError) -> Self { IconError::InvalidBytes(error) }
}
#[cfg(feature = "images")]
impl From<ImageError> for IconError {
    fn from(error: ImageError) -> Self { IconError::InvalidImage(error) }
}

/// Errors that can occur when reading, writing or modifying version information.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum VersionError {
    #[cfg_attr(feature = "std", error("invalid bytes: {0}"))]
    InvalidBytes(ReadError),
    #[cfg_attr(feature = "std", error("invalid fixed file info signature: {0:#x}"))]
    InvalidSignature(u32),
    #[cfg_attr(feature = "std", error("invalid length of {0}: declared {1}, found {2}"))]
    InvalidLength(String, usize, usize),
    #[cfg_attr(feature = "std", error("version info does not span data: {0} of {1} bytes read"))]
    LengthMismatch(usize, usize),
    #[cfg_attr(feature = "std", error("missing section: {0}"))]
    MissingSection(String),
    #[cfg_attr(feature = "std", error("missing string table: {0}"))]
    MissingTable(String),
    #[cfg_attr(feature = "std", error("string table already exists: {0}"))]
    TableExists(String),
    #[cfg_attr(feature = "std", error("missing translation: {0}"))]
    MissingTranslation(String),
    #[cfg_attr(feature = "std", error("translation already exists: {0}"))]
    TranslationExists(String),
    #[cfg_attr(feature = "std", error("neither source nor target language given"))]
    InvalidArguments,
    #[cfg_attr(feature = "std", error("unknown fixed file info field: {0}"))]
    UnknownField(String),
    #[cfg_attr(feature = "std", error("node {0} is too large: {1} bytes"))]
    TooLarge(String, usize),
}
impl From<ReadError> for VersionError {
    fn from(error: ReadError) -> Self { VersionError::InvalidBytes(error) }
}
