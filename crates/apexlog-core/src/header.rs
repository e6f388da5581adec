//! Log header: the API version and per-category debug levels a capture
//! was taken with.
//!
//! ```text
//! 48.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;CALLOUT,INFO;DB,INFO;SYSTEM,DEBUG
//! ```
//!
//! The tokenizer treats this line as a non-event; it is parsed separately so
//! recovery advice can be compared against the levels actually in effect.

use serde::Serialize;
use std::collections::BTreeMap;

/// A debug log category as named in the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LogCategory {
    #[serde(rename = "APEX_CODE")]
    ApexCode,
    #[serde(rename = "APEX_PROFILING")]
    ApexProfiling,
    #[serde(rename = "CALLOUT")]
    Callout,
    #[serde(rename = "DB")]
    Database,
    #[serde(rename = "NBA")]
    Nba,
    #[serde(rename = "SYSTEM")]
    System,
    #[serde(rename = "VALIDATION")]
    Validation,
    #[serde(rename = "VISUALFORCE")]
    Visualforce,
    #[serde(rename = "WAVE")]
    Wave,
    #[serde(rename = "WORKFLOW")]
    Workflow,
}

impl LogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::ApexCode => "APEX_CODE",
            LogCategory::ApexProfiling => "APEX_PROFILING",
            LogCategory::Callout => "CALLOUT",
            LogCategory::Database => "DB",
            LogCategory::Nba => "NBA",
            LogCategory::System => "SYSTEM",
            LogCategory::Validation => "VALIDATION",
            LogCategory::Visualforce => "VISUALFORCE",
            LogCategory::Wave => "WAVE",
            LogCategory::Workflow => "WORKFLOW",
        }
    }

    pub fn parse(text: &str) -> Option<LogCategory> {
        Some(match text.trim() {
            "APEX_CODE" => LogCategory::ApexCode,
            "APEX_PROFILING" => LogCategory::ApexProfiling,
            "CALLOUT" => LogCategory::Callout,
            "DB" => LogCategory::Database,
            "NBA" => LogCategory::Nba,
            "SYSTEM" => LogCategory::System,
            "VALIDATION" => LogCategory::Validation,
            "VISUALFORCE" => LogCategory::Visualforce,
            "WAVE" => LogCategory::Wave,
            "WORKFLOW" => LogCategory::Workflow,
            _ => return None,
        })
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Debug level, ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebugLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Fine,
    Finer,
    Finest,
}

impl DebugLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DebugLevel::None => "NONE",
            DebugLevel::Error => "ERROR",
            DebugLevel::Warn => "WARN",
            DebugLevel::Info => "INFO",
            DebugLevel::Debug => "DEBUG",
            DebugLevel::Fine => "FINE",
            DebugLevel::Finer => "FINER",
            DebugLevel::Finest => "FINEST",
        }
    }

    pub fn parse(text: &str) -> Option<DebugLevel> {
        Some(match text.trim() {
            "NONE" => DebugLevel::None,
            "ERROR" => DebugLevel::Error,
            "WARN" => DebugLevel::Warn,
            "INFO" => DebugLevel::Info,
            "DEBUG" => DebugLevel::Debug,
            "FINE" => DebugLevel::Fine,
            "FINER" => DebugLevel::Finer,
            "FINEST" => DebugLevel::Finest,
            _ => return None,
        })
    }
}

impl std::fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parsed header line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogHeader {
    pub api_version: String,
    pub levels: BTreeMap<LogCategory, DebugLevel>,
}

impl LogHeader {
    /// Parse a single header line. Unknown categories or levels are skipped.
    pub fn parse(line: &str) -> Option<LogHeader> {
        let (version, settings) = line.trim().split_once(' ')?;
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return None;
        }

        let levels: BTreeMap<_, _> = settings
            .split(';')
            .filter_map(|pair| {
                let (category, level) = pair.split_once(',')?;
                Some((LogCategory::parse(category)?, DebugLevel::parse(level)?))
            })
            .collect();
        if levels.is_empty() {
            return None;
        }

        Some(LogHeader {
            api_version: version.to_string(),
            levels,
        })
    }

    /// Find the header among the first non-empty lines of `content`.
    pub fn from_content(content: &str) -> Option<LogHeader> {
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(2)
            .find_map(LogHeader::parse)
    }

    pub fn level(&self, category: LogCategory) -> Option<DebugLevel> {
        self.levels.get(&category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_header() {
        let header =
            LogHeader::parse("48.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;DB,INFO;SYSTEM,DEBUG").unwrap();
        assert_eq!(header.api_version, "48.0");
        assert_eq!(header.level(LogCategory::ApexCode), Some(DebugLevel::Finest));
        assert_eq!(header.level(LogCategory::Database), Some(DebugLevel::Info));
        assert_eq!(header.level(LogCategory::Callout), None);
    }

    #[test]
    fn skips_unknown_pairs() {
        let header = LogHeader::parse("62.0 APEX_CODE,DEBUG;HOLOGRAM,FINE;DB,LOUD").unwrap();
        assert_eq!(header.levels.len(), 1);
    }

    #[test]
    fn event_lines_are_not_headers() {
        assert_eq!(LogHeader::parse("12:00:00.0 (1)|USER_DEBUG|x"), None);
        assert_eq!(LogHeader::parse(""), None);
    }

    #[test]
    fn found_in_content() {
        let content = "\n48.0 APEX_CODE,FINE\n10:00:00.0 (1)|EXECUTION_STARTED\n";
        let header = LogHeader::from_content(content).unwrap();
        assert_eq!(header.level(LogCategory::ApexCode), Some(DebugLevel::Fine));
    }

    #[test]
    fn levels_order_by_verbosity() {
        assert!(DebugLevel::None < DebugLevel::Error);
        assert!(DebugLevel::Debug < DebugLevel::Finest);
    }
}
