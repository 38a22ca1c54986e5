use std::fmt;

use crate::repositories::errors::document_repository_errors::DocumentRepositoryError;

#[derive(Debug)]
pub enum RecordServiceError {
    InvalidIdentifier(String),
    RepositoryError(String),
}

impl From<DocumentRepositoryError> for RecordServiceError {
    fn from(error: DocumentRepositoryError) -> Self {
        RecordServiceError::RepositoryError(error.to_string())
    }
}

impl fmt::Display for RecordServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordServiceError::InvalidIdentifier(id) => write!(f, "Invalid identifier: {}", id),
            RecordServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RecordServiceError {}
