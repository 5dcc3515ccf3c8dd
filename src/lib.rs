//! Face verification relay
//!
//! Accepts an identity document photo and a live face photo over multipart
//! HTTP, saves both to a local upload directory, and relays them to a
//! DeepFace-compatible verification service. The service's JSON verdict is
//! passed back to the caller unchanged.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
