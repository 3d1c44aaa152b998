use thiserror::Error;

/// Failure of one step of the build → sign → submit pipeline.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("invalid payment: {0}")]
    InvalidPayment(String),
    #[error("duplicate signer: {0}")]
    DuplicateSigner(String),
    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

impl DeployError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        DeployError::Encoding(msg.into())
    }

    pub fn invalid_target(msg: impl Into<String>) -> Self {
        DeployError::InvalidTarget(msg.into())
    }
}

/// Remote rejection or transport fault. The cause is kept as reported.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("node rejected deploy (code {code}): {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("invalid response from node: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported or malformed PEM key: {0}")]
    Pem(String),
    #[error("invalid public key: {0}")]
    PublicKey(String),
    #[error("invalid signature: {0}")]
    Signature(String),
    #[error("no key available: {0}")]
    Unavailable(String),
    #[error("unknown key algorithm: {0}")]
    UnknownAlgorithm(String),
}
