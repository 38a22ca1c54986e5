#[derive(Debug)]
pub enum DocumentRepositoryError {
    AlreadyExists,
    InvalidUpdate(String),
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::AlreadyExists => write!(f, "Document already exists"),
            DocumentRepositoryError::InvalidUpdate(msg) => write!(f, "Invalid update: {}", msg),
            DocumentRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            DocumentRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}
