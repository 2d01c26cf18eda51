use thiserror::Error;

/// Result of one capability invocation.
pub type Outcome<T> = Result<T, CapabilityError>;

/// Why a capability call produced no usable payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{capability} did not answer within {timeout_secs}s")]
    Timeout {
        capability: &'static str,
        timeout_secs: u64,
    },

    #[error("{capability} unreachable: {detail}")]
    Unreachable {
        capability: &'static str,
        detail: String,
    },

    #[error("{capability} returned an invalid response: {detail}")]
    InvalidResponse {
        capability: &'static str,
        detail: String,
    },
}

impl CapabilityError {
    pub fn capability(&self) -> &'static str {
        match self {
            Self::Timeout { capability, .. }
            | Self::Unreachable { capability, .. }
            | Self::InvalidResponse { capability, .. } => capability,
        }
    }

    pub(crate) fn from_reqwest(capability: &'static str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                capability,
                timeout_secs,
            }
        } else if err.is_decode() {
            Self::InvalidResponse {
                capability,
                detail: err.to_string(),
            }
        } else {
            Self::Unreachable {
                capability,
                detail: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_capability() {
        let error = CapabilityError::Timeout {
            capability: "churn",
            timeout_secs: 10,
        };
        assert!(error.to_string().contains("churn"));
        assert_eq!(error.capability(), "churn");
    }
}
