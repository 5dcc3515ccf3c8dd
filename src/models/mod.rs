pub mod upload;
pub mod verification;
