/// Errors raised while building scene geometry
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A builder received a parameter it cannot construct geometry from
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A color literal was not of the form `#rrggbb`
    #[error("invalid color `{input}`: {reason}")]
    Color { input: String, reason: String },
}

impl GeometryError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;
