//! Client for the fizzbot challenge API.
//!
//! The crate fetches FizzBuzz-style questions, answers them with the rule
//! engine, submits the answers and checkpoints progress so a session can be
//! resumed. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (rule evaluation, reference
//!   parsing, outcome classification). No I/O.
//! - **[`io`]**: Side-effecting operations (HTTP, checkpoint and stage files,
//!   configuration). The remote API sits behind a trait for tests.
//!
//! [`session`] drives the loop and [`report`] renders CLI output.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::FizzbotError;
