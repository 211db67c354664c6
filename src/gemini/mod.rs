//! Gemini protocol implementation.
//!
//! A Gemini exchange is one request line from the client, one status line
//! (plus a body on success) from the server, then the connection closes.
//!
//! # Architecture
//!
//! - **`connection`**: drives one session from request to close
//! - **`parser`**: reads and decodes the request line
//! - **`request`**: request representation and resource-name extraction
//! - **`resolver`**: finds documents under the content root
//! - **`response`**: status codes and the response value
//! - **`writer`**: serializes and writes responses
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read one request line
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Look up docs/<resource>
//!        └──────┬───────────┘
//!               │ 20 or 51
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Write status line and body
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! A failure in any state skips straight to closing the stream.

pub mod connection;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
