use crate::error::ValidationError;
use crate::snippet::Snippet;

/// Validator for snippets about to be written to or removed from a store.
pub struct Validator;

impl Validator {
    /// Validate a snippet that may be absent.
    pub fn validate_snippet(snippet: Option<&Snippet>) -> Result<(), ValidationError> {
        let snippet = match snippet {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ValidationError::EmptyEntity),
        };
        Self::validate_name(&snippet.name)?;
        if snippet.id.is_blank() {
            return Err(ValidationError::EmptyId);
        }
        Ok(())
    }

    /// Validate a snippet.
    pub fn validate(snippet: &Snippet) -> Result<(), ValidationError> {
        Self::validate_snippet(Some(snippet))
    }

    /// Name must contain something other than whitespace.
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}
