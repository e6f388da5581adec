//! Configuration types for apexlog.
//!
//! [`Config::load`] layers `~/.config/apexlog/config.toml` and `APEXLOG__*`
//! environment variables over the built-in defaults. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in tests).
//!
//! Every scoring constant used by the truncation layer lives here under a
//! name, so deployments can tune them; the defaults reproduce the reference
//! behaviour exactly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[tokenizer]
max_line_length        = 1048576
timestamp_search_window = 15
header_prefix_max_len  = 8

[truncation]
max_log_size_bytes       = 20971520
size_warning_ratio       = 0.95
size_critical_ratio      = 0.99
unclosed_event_threshold = 5
min_stacktrace_length    = 20
stacktrace_tail_events   = 3

[confidence]
complete                 = 0.95
explicit_marker          = 0.99
size_with_corroboration  = 0.95
three_or_more            = 0.9
two_indicators           = 0.8
single_indicator         = 0.6
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub truncation: TruncationConfig,
}

/// `[tokenizer]` section.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenizerConfig {
    /// Lines longer than this many bytes are cut before classification.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// The `(` opening the nanosecond timestamp must start within this many
    /// characters for the fast path to accept the line.
    #[serde(default = "default_timestamp_search_window")]
    pub timestamp_search_window: usize,
    /// Longest leading numeric token treated as a header version (`48.0`).
    #[serde(default = "default_header_prefix_max_len")]
    pub header_prefix_max_len: usize,
}

fn default_max_line_length() -> usize { 1_048_576 }
fn default_timestamp_search_window() -> usize { 15 }
fn default_header_prefix_max_len() -> usize { 8 }

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            timestamp_search_window: default_timestamp_search_window(),
            header_prefix_max_len: default_header_prefix_max_len(),
        }
    }
}

/// `[truncation]` and `[confidence]` sections, flattened for the detectors.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TruncationConfig {
    /// Platform cap on debug log size.
    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: usize,
    /// Fraction of the cap at which the size indicator fires.
    #[serde(default = "default_size_warning_ratio")]
    pub size_warning_ratio: f64,
    /// Fraction of the cap treated as "at the limit".
    #[serde(default = "default_size_critical_ratio")]
    pub size_critical_ratio: f64,
    /// More than this many scopes left open flags the log.
    #[serde(default = "default_unclosed_event_threshold")]
    pub unclosed_event_threshold: usize,
    /// Stack traces shorter than this (in characters) count as cut.
    #[serde(default = "default_min_stacktrace_length")]
    pub min_stacktrace_length: usize,
    /// An exception within this many events of the end counts as "near the end".
    #[serde(default = "default_stacktrace_tail_events")]
    pub stacktrace_tail_events: usize,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
}

fn default_max_log_size_bytes() -> usize { 20 * 1024 * 1024 }
fn default_size_warning_ratio() -> f64 { 0.95 }
fn default_size_critical_ratio() -> f64 { 0.99 }
fn default_unclosed_event_threshold() -> usize { 5 }
fn default_min_stacktrace_length() -> usize { 20 }
fn default_stacktrace_tail_events() -> usize { 3 }

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_log_size_bytes: default_max_log_size_bytes(),
            size_warning_ratio: default_size_warning_ratio(),
            size_critical_ratio: default_size_critical_ratio(),
            unclosed_event_threshold: default_unclosed_event_threshold(),
            min_stacktrace_length: default_min_stacktrace_length(),
            stacktrace_tail_events: default_stacktrace_tail_events(),
            confidence: ConfidenceConfig::default(),
        }
    }
}

/// `[confidence]` section: truncation confidence scores.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ConfidenceConfig {
    /// No indicator fired.
    #[serde(default = "default_complete")]
    pub complete: f64,
    #[serde(default = "default_explicit_marker")]
    pub explicit_marker: f64,
    /// Size indicator plus at least one other.
    #[serde(default = "default_size_with_corroboration")]
    pub size_with_corroboration: f64,
    #[serde(default = "default_three_or_more")]
    pub three_or_more: f64,
    #[serde(default = "default_two_indicators")]
    pub two_indicators: f64,
    #[serde(default = "default_single_indicator")]
    pub single_indicator: f64,
}

fn default_complete() -> f64 { 0.95 }
fn default_explicit_marker() -> f64 { 0.99 }
fn default_size_with_corroboration() -> f64 { 0.95 }
fn default_three_or_more() -> f64 { 0.9 }
fn default_two_indicators() -> f64 { 0.8 }
fn default_single_indicator() -> f64 { 0.6 }

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            complete: default_complete(),
            explicit_marker: default_explicit_marker(),
            size_with_corroboration: default_size_with_corroboration(),
            three_or_more: default_three_or_more(),
            two_indicators: default_two_indicators(),
            single_indicator: default_single_indicator(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

/// On-disk shape: `[confidence]` is a top-level table in the file but lives
/// under [`TruncationConfig`] in memory.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    tokenizer: TokenizerConfig,
    #[serde(default)]
    truncation: TruncationConfig,
    #[serde(default)]
    confidence: ConfidenceConfig,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let mut truncation = raw.truncation;
        truncation.confidence = raw.confidence;
        Config {
            tokenizer: raw.tokenizer,
            truncation,
        }
    }
}

impl Config {
    /// Load from `~/.config/apexlog/config.toml` (if present), layered on top
    /// of the built-in defaults, then `APEXLOG__SECTION__KEY` variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Same layering as [`Config::load`] with an explicit file path. A missing
    /// file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("APEXLOG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(raw.into())
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            truncation: TruncationConfig::default(),
        }
    }

    /// Parse a TOML document layered over the built-in defaults.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(raw.into())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("apexlog")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
