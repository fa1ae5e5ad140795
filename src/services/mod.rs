// src/services/mod.rs
//
// Outbound clients used by the route handlers

pub mod linkedin;

// Re-export commonly used types for convenience
pub use linkedin::LinkedInService;
