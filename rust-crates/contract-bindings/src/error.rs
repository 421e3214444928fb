use std::fmt;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Failure of a contract call, classified by where it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    /// Rejected locally before anything was sent.
    Validation(String),
    /// The network simulated the call and the contract rejected it.
    Simulation(String),
    /// The signed transaction was refused or failed on-chain.
    Submission(String),
    /// The endpoint could not be reached or answered garbage.
    Transport { message: String, transient: bool },
    /// No signer, a signer for another account, or the wallet refused.
    Signing(String),
    /// A value came back in a shape the binding did not expect.
    Decode(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            transient: true,
        }
    }

    pub fn permanent_transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            transient: false,
        }
    }

    /// Only transport failures that may succeed on a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                transient: true,
                ..
            }
        )
    }

    /// The text shown to the user, without the classification prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Simulation(m)
            | Self::Submission(m)
            | Self::Signing(m)
            | Self::Decode(m) => m,
            Self::Transport { message, .. } => message,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<stellar_xdr::curr::Error> for ClientError {
    fn from(err: stellar_xdr::curr::Error) -> Self {
        Self::Decode(format!("xdr: {err}"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn is_transient__only_for_transient_transport_errors() {
        assert!(ClientError::transient("timeout").is_transient());
        assert!(!ClientError::permanent_transport("bad url").is_transient());
        assert!(!ClientError::Simulation("already claimed".into()).is_transient());
        assert!(!ClientError::Submission("txFAILED".into()).is_transient());
    }

    #[test]
    fn display__surfaces_remote_message_verbatim() {
        let err = ClientError::Simulation("HostError: already claimed".into());
        assert_eq!(err.to_string(), "HostError: already claimed");
    }
}
