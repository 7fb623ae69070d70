use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypedGraphError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("schema error: {0}")]
    SchemaError(String),
    #[error("query error: {0}")]
    QueryError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("entity not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("non closed transactions: {0} transaction(s) still own open collections")]
    LeakedTransactions(usize),
}

impl TypedGraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::SchemaError(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::QueryError(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::ConfigError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::InvalidInput(msg.into())
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::InvalidState(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::AlreadyExists(msg.into())
    }

    pub fn unsupported<T: Into<String>>(msg: T) -> Self {
        TypedGraphError::Unsupported(msg.into())
    }
}
