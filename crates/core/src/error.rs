use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown churn level: {0}")]
    UnknownChurnLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CoreError::UnknownChurnLevel("CRITICO".to_string());
        assert!(error.to_string().contains("CRITICO"));
    }
}
