use thiserror::Error;

/// Which of the two input images an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The image the facial region is taken from.
    Source,
    /// The image the facial region is composited onto.
    Destination,
}

impl std::fmt::Display for ImageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageRole::Source => write!(f, "source"),
            ImageRole::Destination => write!(f, "destination"),
        }
    }
}

/// Error type returned by faceswap operations.
#[derive(Debug, Error)]
pub enum FaceSwapError {
    /// The raw input bytes could not be decoded as an image.
    #[error("failed to decode {role} image: {reason}")]
    DecodeError {
        /// Which input failed to decode.
        role: ImageRole,
        /// Decoder error message.
        reason: String,
    },

    /// An input image is below the 2x2 pixel minimum.
    #[error("{role} image is too small: {width}x{height}")]
    ImageTooSmall {
        /// Which input was too small.
        role: ImageRole,
        /// Width of the offending image.
        width: u32,
        /// Height of the offending image.
        height: u32,
    },

    /// The landmark detector found no face in one of the inputs.
    #[error("no face detected in {0} image")]
    NoFaceDetected(ImageRole),

    /// Encoding the composited image failed.
    #[error("failed to encode output image: {0}")]
    EncodeError(String),

    /// Writing the composited image to disk failed.
    #[error("failed to write output image: {0}")]
    WriteError(String),

    /// The detection model could not be loaded.
    #[error("failed to load detection model: {0}")]
    ModelError(String),

    /// The landmark limit was set to zero.
    #[error("max landmarks must be > 0")]
    InvalidMaxLandmarks,
}
