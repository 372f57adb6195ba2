//! Integration tests for the material system
//!
//! Tests interning and variant properties over a broad range of patterns,
//! concurrent resolution, and building a cache from configuration.

#[cfg(test)]
mod config_tests;
