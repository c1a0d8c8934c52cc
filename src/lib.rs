//! Warden - Admission Control and Session Token Management
//!
//! This crate implements the authentication core of a request-serving
//! application: a sliding-window rate limiter that bounds how often a keyed
//! actor may attempt an operation, and a token manager that issues,
//! verifies, and revokes signed session credentials backed by a TTL
//! key-value store. The surrounding request layer (routing, credential
//! lookup) consumes these components as explicitly constructed instances.

pub mod config;
pub mod error;
pub mod ratelimit;
pub mod store;
pub mod token;
