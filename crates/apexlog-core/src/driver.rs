//! Batch driver: eager whole-content tokenization with full diagnostics.
//!
//! Every line goes through the [`tokenize_line`] dispatcher. Tokens and line
//! errors are collected side by side, and the call only fails when nothing
//! at all was recoverable.

use crate::config::TokenizerConfig;
use crate::error::{LineError, TokenizeFailure};
use crate::tokenizer::tokenize_line;
use crate::types::Token;

/// Result of a batch tokenization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLog {
    pub tokens: Vec<Token>,
    pub errors: Vec<LineError>,
    /// Number of raw lines read, events or not.
    pub lines_read: usize,
}

impl TokenizedLog {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize a whole log. Splits on both LF and CRLF.
///
/// Returns [`TokenizeFailure::NoTokens`] only when zero tokens were produced
/// *and* at least one line error occurred. Content with no event lines and no
/// errors (an empty file, a header only) is a successful, empty result.
pub fn tokenize_content(
    content: &str,
    config: &TokenizerConfig,
) -> Result<TokenizedLog, TokenizeFailure> {
    let mut log = TokenizedLog::default();

    for (idx, line) in content.lines().enumerate() {
        log.lines_read += 1;
        match tokenize_line(line, line_number(idx), config) {
            Ok(Some(token)) => log.tokens.push(token),
            Ok(None) => {}
            Err(err) => log.errors.push(err),
        }
    }

    tracing::debug!(
        lines = log.lines_read,
        tokens = log.tokens.len(),
        errors = log.errors.len(),
        "batch tokenization complete"
    );

    if log.tokens.is_empty() && !log.errors.is_empty() {
        tracing::warn!(errors = log.errors.len(), "no event lines could be tokenized");
        return Err(TokenizeFailure::NoTokens { errors: log.errors });
    }
    Ok(log)
}

/// 1-based line number for a 0-based line index, saturating at `u32::MAX`.
pub(crate) fn line_number(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}
