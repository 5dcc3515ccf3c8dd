pub mod storage;
pub mod verifier;
