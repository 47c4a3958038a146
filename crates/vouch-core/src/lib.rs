//! Core types and engine logic for the Vouch phone-auth service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod codes;
pub mod error;
pub mod referral;
pub mod signin;
pub mod store;
pub mod token;
pub mod verification;

pub use error::{Error, Result};
