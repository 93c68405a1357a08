/// Convenience result type used across imgstack.
pub type StackResult<T> = Result<T, StackError>;

/// Top-level error taxonomy used by construction, configuration and rendering APIs.
///
/// Image loading failures never surface here: they are absorbed by the slot cache
/// (see [`LoadFailure`](crate::LoadFailure)).
#[derive(thiserror::Error, Debug)]
pub enum StackError {
    /// Invalid caller-provided data (buffer sizes, geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while decoding or rasterizing image resources.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors raised by a drawing surface.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StackError {
    /// Build a [`StackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StackError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StackError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`StackError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
