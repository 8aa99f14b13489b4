/// Remote processing module
///
/// This module handles:
/// - Submitting images to the remove.bg background-removal API
/// - Validating that the service replied with actual image content
/// - Translating network and HTTP failures into typed errors

pub mod client;

pub use client::{ProcessError, RemovalClient};
