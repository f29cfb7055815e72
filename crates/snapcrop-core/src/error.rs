//! Error types for the cropping widget.
//!
//! Every error here is recovered locally: callers observe failure as "no
//! visible change" or an empty crop result, never as a fatal condition.

use thiserror::Error;

/// Error types for widget operations.
#[derive(Debug, Error)]
pub enum CropError {
    /// The transform's determinant is numerically zero; the offending
    /// update is discarded and the prior transform kept.
    #[error("Transform is not invertible")]
    NonInvertibleTransform,

    /// A crop or gesture was requested before an image was loaded.
    #[error("No source image loaded")]
    NoSourceImage,

    /// The pixel buffer handed to `load_image` is zero-area or does not
    /// match its declared dimensions. Loading aborts, prior state retained.
    #[error("Invalid source image: {0}")]
    InvalidImage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropError::InvalidImage("buffer size mismatch".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid source image: buffer size mismatch"
        );

        let err = CropError::NoSourceImage;
        assert_eq!(err.to_string(), "No source image loaded");
    }
}
