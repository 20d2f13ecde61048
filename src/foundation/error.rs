/// Convenience result type used across the crate.
pub type TitlerResult<T> = Result<T, TitlerError>;

/// Top-level error taxonomy for the composition pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TitlerError {
    /// The title contains no whitespace to split on.
    #[error("unsplittable title: {0}")]
    UnsplittableTitle(String),

    /// Neither an explicit title nor a file-name-derived title is available.
    #[error("missing title: {0}")]
    MissingTitle(String),

    /// A source or logo image could not be read or decoded.
    #[error("unreadable image: {0}")]
    UnreadableImage(String),

    /// The destination is missing, unwritable, or encoding failed.
    #[error("write failure: {0}")]
    WriteFailure(String),

    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TitlerError {
    /// Build a [`TitlerError::UnsplittableTitle`] value.
    pub fn unsplittable_title(msg: impl Into<String>) -> Self {
        Self::UnsplittableTitle(msg.into())
    }

    /// Build a [`TitlerError::MissingTitle`] value.
    pub fn missing_title(msg: impl Into<String>) -> Self {
        Self::MissingTitle(msg.into())
    }

    /// Build a [`TitlerError::UnreadableImage`] value.
    pub fn unreadable_image(msg: impl Into<String>) -> Self {
        Self::UnreadableImage(msg.into())
    }

    /// Build a [`TitlerError::WriteFailure`] value.
    pub fn write_failure(msg: impl Into<String>) -> Self {
        Self::WriteFailure(msg.into())
    }

    /// Build a [`TitlerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            TitlerError::unsplittable_title("x")
                .to_string()
                .contains("unsplittable title:")
        );
        assert!(
            TitlerError::missing_title("x")
                .to_string()
                .contains("missing title:")
        );
        assert!(
            TitlerError::unreadable_image("x")
                .to_string()
                .contains("unreadable image:")
        );
        assert!(
            TitlerError::write_failure("x")
                .to_string()
                .contains("write failure:")
        );
        assert!(
            TitlerError::validation("x")
                .to_string()
                .contains("validation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = TitlerError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
