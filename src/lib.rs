//! Provisions a local Magnet admin server for the Android test suite.
//!
//! The binary entrypoint lives in `main.rs`; modules are exposed here so
//! integration tests can drive the sequence against a stand-in server.

pub mod admin;
pub mod config;
pub mod provision;
pub mod storage;
