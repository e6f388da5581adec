//! apexlog-core: tokenizer and shared types for Apex debug logs.
//!
//! # Architecture
//!
//! ```text
//! raw line ──► tokenizer (fast ─► regex fallback) ──► Token
//!                  │                                    │
//!                  └─ registry (EventType)              ├─► driver  (batch, full diagnostics)
//!                                                       ├─► stream  (lazy, sync + async)
//!                                                       └─► events  (flat LogEvent list)
//!
//! header line ──► header (API version, debug levels per category)
//! ```
//!
//! Nothing in this crate performs I/O on its own; inputs are already
//! materialised strings or caller-supplied line sources.

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod header;
pub mod registry;
pub mod stream;
pub mod tokenizer;
pub mod types;

pub use config::{Config, TokenizerConfig, TruncationConfig};
pub use driver::{tokenize_content, TokenizedLog};
pub use error::{ErrorCode, LineError, TokenizeFailure};
pub use events::{assemble_events, events_from_tokenized};
pub use header::{DebugLevel, LogCategory, LogHeader};
pub use registry::EventType;
pub use stream::{stream_tokens, TokenStream};
pub use tokenizer::{tokenize_line, tokenize_line_fast, tokenize_line_regex};
pub use types::{EventKind, ExceptionDetails, LogEvent, Token};
