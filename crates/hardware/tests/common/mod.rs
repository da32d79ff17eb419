//! Shared helpers for the cache model tests.

pub mod mocks;
