use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("INPUT_INVALID: {0}")]
    Input(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) | Self::Config(_) => 2,
            Self::Io(_) | Self::Internal(_) => 1,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn messages_carry_category_prefix() {
        let error = AppError::Input("unknown field 'foo'".to_string());
        assert_eq!(error.to_string(), "INPUT_INVALID: unknown field 'foo'");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn io_errors_map_to_io_failure() {
        let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(error.to_string().starts_with("IO_FAILURE"));
        assert_eq!(error.exit_code(), 1);
    }
}
