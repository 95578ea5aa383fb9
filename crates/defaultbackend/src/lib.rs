//! defaultbackend library entry.
//!
//! This crate wires the fallback handler, operational endpoints, metrics
//! registry, and server lifecycle into a small default-backend stack. It is
//! intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod fallback;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
