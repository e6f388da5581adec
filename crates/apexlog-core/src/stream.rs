//! Streaming drivers: lazy, pull-based tokenization over any line source.
//!
//! One line is tokenized per pull and nothing is buffered beyond it, so memory
//! stays flat regardless of log size. Consumers may stop pulling at any point;
//! the stream owns nothing but the caller's line source.
//!
//! Line errors are swallowed by default to keep the sequence live. Callers
//! that want diagnostics without switching to the batch driver can attach an
//! error sink: a closure for [`TokenStream`], an unbounded channel for the
//! async variants.

use crate::config::TokenizerConfig;
use crate::driver::line_number;
use crate::error::LineError;
use crate::tokenizer::tokenize_line;
use crate::types::Token;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

// ---------------------------------------------------------------------------
// Synchronous
// ---------------------------------------------------------------------------

/// Lazy iterator of tokens over a synchronous line source.
///
/// Restartable per invocation (build a new one over the same source), not
/// resumable mid-stream.
pub struct TokenStream<'a, I> {
    lines: I,
    next_index: usize,
    config: &'a TokenizerConfig,
    error_sink: Option<Box<dyn FnMut(LineError) + 'a>>,
}

impl<'a, I, S> TokenStream<'a, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new<L>(lines: L, config: &'a TokenizerConfig) -> Self
    where
        L: IntoIterator<IntoIter = I, Item = S>,
    {
        Self {
            lines: lines.into_iter(),
            next_index: 0,
            config,
            error_sink: None,
        }
    }

    /// Route line errors to `sink` instead of dropping them.
    pub fn with_error_sink(mut self, sink: impl FnMut(LineError) + 'a) -> Self {
        self.error_sink = Some(Box::new(sink));
        self
    }
}

impl<I, S> Iterator for TokenStream<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let line = self.lines.next()?;
            let number = line_number(self.next_index);
            self.next_index += 1;

            match tokenize_line(line.as_ref(), number, self.config) {
                Ok(Some(token)) => return Some(token),
                Ok(None) => continue,
                Err(err) => {
                    tracing::debug!(line_number = number, code = %err.code, "suppressed line error");
                    if let Some(sink) = self.error_sink.as_mut() {
                        sink(err);
                    }
                }
            }
        }
    }
}

/// Stream tokens from already-materialised content.
pub fn stream_tokens<'a>(
    content: &'a str,
    config: &'a TokenizerConfig,
) -> TokenStream<'a, std::str::Lines<'a>> {
    TokenStream::new(content.lines(), config)
}

// ---------------------------------------------------------------------------
// Asynchronous
// ---------------------------------------------------------------------------

/// Async counterpart of [`TokenStream`] over any [`Stream`] of lines.
pub fn token_stream<L>(lines: L, config: TokenizerConfig) -> impl Stream<Item = Token>
where
    L: Stream,
    L::Item: AsRef<str>,
{
    tokens_with_optional_sink(lines, config, None)
}

/// Like [`token_stream`], sending each line error to `sink`. A closed
/// receiver is ignored.
pub fn token_stream_with_sink<L>(
    lines: L,
    config: TokenizerConfig,
    sink: UnboundedSender<LineError>,
) -> impl Stream<Item = Token>
where
    L: Stream,
    L::Item: AsRef<str>,
{
    tokens_with_optional_sink(lines, config, Some(sink))
}

/// Tokenize lines read from an async reader.
///
/// A read error (including invalid UTF-8) ends the stream.
pub fn token_stream_from_reader<R>(reader: R, config: TokenizerConfig) -> impl Stream<Item = Token>
where
    R: AsyncBufRead + Unpin,
{
    let lines = futures::stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(error = %err, "line source failed; ending token stream");
                None
            }
        }
    });
    token_stream(lines, config)
}

fn tokens_with_optional_sink<L>(
    lines: L,
    config: TokenizerConfig,
    sink: Option<UnboundedSender<LineError>>,
) -> impl Stream<Item = Token>
where
    L: Stream,
    L::Item: AsRef<str>,
{
    lines.enumerate().filter_map(move |(idx, line)| {
        let number = line_number(idx);
        let token = match tokenize_line(line.as_ref(), number, &config) {
            Ok(token) => token,
            Err(err) => {
                tracing::debug!(line_number = number, code = %err.code, "suppressed line error");
                if let Some(sink) = &sink {
                    let _ = sink.send(err);
                }
                None
            }
        };
        futures::future::ready(token)
    })
}
