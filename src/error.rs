use thiserror::Error;

pub type Result<T> = std::result::Result<T, IvrError>;

#[derive(Debug, Error)]
pub enum IvrError {
    #[error("flow `{0}` not found")]
    FlowNotFound(String),
    #[error("failed to parse flow `{flow}`: {reason}")]
    FlowParse { flow: String, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
