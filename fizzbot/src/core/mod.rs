//! Deterministic, pure logic shared by the fizzbot session.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod next_ref;
pub mod rules;
pub mod transition;
pub mod types;
