use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty name")]
    Empty,

    #[error("name too long ({0} characters)")]
    TooLong(usize),

    #[error("illegal character {0:?}")]
    IllegalCharacter(char),

    #[error("path traversal attempt")]
    Traversal,
}

/// Validates a client-supplied session identifier.
///
/// Sessions come from the browser (`crypto.randomUUID()`) but are untrusted:
/// the identifier becomes a filename prefix inside the artifact directory, so
/// anything that could escape it or collide with an extension is rejected.
pub fn validate_session_id(raw: &str) -> Result<&str, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }
    if raw.len() > 128 {
        return Err(ValidationError::TooLong(raw.len()));
    }
    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ValidationError::IllegalCharacter(c));
    }
    Ok(raw)
}

/// Validates a filename requested from the artifact directory.
///
/// Same character set as session identifiers plus the dot, which also rules
/// out separators and `..` components.
pub fn validate_artifact_name(raw: &str) -> Result<&str, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Empty);
    }
    if raw.len() > 255 {
        return Err(ValidationError::TooLong(raw.len()));
    }
    if raw.contains('/') || raw.contains('\\') || raw.split('.').any(|part| part.is_empty()) {
        // empty dot-separated parts cover "..", leading and trailing dots
        return Err(ValidationError::Traversal);
    }
    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ValidationError::IllegalCharacter(c));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uuid_session_ids() {
        assert!(validate_session_id("1b4e28ba-2fa1-11d2-883f-0016d3cca427").is_ok());
        assert!(validate_session_id("abc123_XYZ").is_ok());
    }

    #[test]
    fn rejects_hostile_session_ids() {
        assert_eq!(validate_session_id(""), Err(ValidationError::Empty));
        assert_eq!(
            validate_session_id("../etc/passwd"),
            Err(ValidationError::IllegalCharacter('.'))
        );
        assert_eq!(
            validate_session_id("a/b"),
            Err(ValidationError::IllegalCharacter('/'))
        );
        assert!(validate_session_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn accepts_artifact_names() {
        assert!(validate_artifact_name("session-1.webm").is_ok());
        assert!(validate_artifact_name("session-1.webm.partial").is_ok());
        assert!(validate_artifact_name("clip.mp4").is_ok());
    }

    #[test]
    fn rejects_traversal_artifact_names() {
        assert_eq!(
            validate_artifact_name("../secret"),
            Err(ValidationError::Traversal)
        );
        assert_eq!(
            validate_artifact_name("a/../b.webm"),
            Err(ValidationError::Traversal)
        );
        assert_eq!(
            validate_artifact_name(".hidden"),
            Err(ValidationError::Traversal)
        );
        assert_eq!(
            validate_artifact_name("name with space.mp4"),
            Err(ValidationError::IllegalCharacter(' '))
        );
    }
}
