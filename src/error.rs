use thiserror::Error;

/// Policy lookup error types
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A keyed store could not be opened or read (missing, unreadable or corrupt)
    #[error("Store unavailable: {name}: {message}")]
    StoreUnavailable { name: String, message: String },

    /// A client address contains neither `.` nor `:`
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PolicyError {
    pub(crate) fn store_unavailable(name: impl Into<String>, message: impl ToString) -> Self {
        PolicyError::StoreUnavailable {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_is_matchable() {
        let err = PolicyError::store_unavailable("smtpaccess.dat", "No such file or directory");
        match &err {
            PolicyError::StoreUnavailable { name, .. } => assert_eq!(name, "smtpaccess.dat"),
            _ => panic!("expected StoreUnavailable"),
        }
    }

    #[test]
    fn test_store_unavailable_display_includes_name_and_message() {
        let err = PolicyError::store_unavailable("aliases.dat", "corrupt");
        let display = format!("{}", err);
        assert!(display.contains("aliases.dat"), "got: {}", display);
        assert!(display.contains("corrupt"), "got: {}", display);
    }

    #[test]
    fn test_invalid_address_display() {
        let err = PolicyError::InvalidAddress("localhost".into());
        assert_eq!(format!("{}", err), "Invalid address: localhost");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PolicyError = io.into();
        assert!(matches!(err, PolicyError::IoError(_)));
    }
}
