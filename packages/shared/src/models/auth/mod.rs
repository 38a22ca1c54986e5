pub mod claims;
pub mod responses;
