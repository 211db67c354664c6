//! gemserve - minimal Gemini server
//!
//! Core library: TLS accept loop, request parsing, document resolution and
//! response writing.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod gemini;
pub mod server;
