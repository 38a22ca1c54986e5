pub mod document_repository_errors;
