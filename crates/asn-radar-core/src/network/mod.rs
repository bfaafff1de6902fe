//! Network utilities for upstream HTTP operations.

mod client;

pub use client::{extract_domain, HttpClient};
