pub mod document_repository;
pub mod errors;
