use thiserror::Error;

use pricebook_core::DomainError;

/// Failures of the pure pricing functions.
///
/// Both are caller errors: they are raised before any output is produced and
/// are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Malformed input: mismatched product ids, negative percentage, overflow.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bulk adjustment was requested over zero items.
    #[error("no items to adjust")]
    EmptyInput,
}

impl PricingError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<PricingError> for DomainError {
    fn from(value: PricingError) -> Self {
        match value {
            PricingError::InvalidArgument(msg) => DomainError::validation(msg),
            PricingError::EmptyInput => DomainError::empty_input(PricingError::EmptyInput.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_keeps_the_error_kind() {
        assert!(matches!(
            DomainError::from(PricingError::invalid_argument("bad")),
            DomainError::Validation(msg) if msg == "bad"
        ));
        assert!(matches!(
            DomainError::from(PricingError::EmptyInput),
            DomainError::EmptyInput(_)
        ));
    }
}
