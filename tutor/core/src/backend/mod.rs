//! Model Backend Integration
//!
//! This module provides abstracted access to hosted generative models through
//! a common trait interface.
//!
//! # Available Backends
//!
//! - **Gemini**: Google's generative-language REST API (default)
//!
//! # Usage
//!
//! ```ignore
//! use tutor_core::backend::{GeminiBackend, LlmBackend, LlmRequest};
//!
//! let backend = GeminiBackend::new(api_key, DEFAULT_GEMINI_BASE_URL, timeout)?;
//! let request = LlmRequest::new("Hello!", "gemini-2.5-flash").with_temperature(0.3);
//! let response = backend.send(&request).await?;
//! ```

mod gemini;
mod traits;

pub use gemini::GeminiBackend;
pub use traits::{BackendConfig, LlmBackend, LlmRequest, LlmResponse, DEFAULT_GEMINI_BASE_URL};
