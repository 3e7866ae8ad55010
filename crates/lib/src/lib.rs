//! # RFP Navigator Pipeline
//!
//! This crate implements the document-to-answer pipeline behind the RFP
//! Navigator assistant: extract text from an uploaded RFP PDF, bound it to a
//! prompt budget, assemble a prompt from a fixed template catalog, call a
//! hosted completion API, and record the interaction in an append-only log
//! sink. The interactive shell (HTTP server, browser UI) lives in
//! `rfpnav-server`; everything here is side-effect free except the completion
//! providers and the loggers.

pub mod chunk;
pub mod errors;
pub mod extract;
pub mod logger;
pub mod prompts;
pub mod providers;
pub mod session;

pub use errors::NavigatorError;
pub use extract::{extract_text, ExtractOptions, Extraction};
pub use providers::completion::{ChatMessage, CompletionProvider, SamplingConfig};
pub use session::{Document, Message, Phase, Role, Session, Verdict};
