//! Boot sequence scripts.
//!
//! A script is an ordered, immutable list of [`Line`]s. Scripts are authored
//! in TOML as an array of `[[line]]` tables:
//!
//! ```toml
//! [[line]]
//! id = "bios"
//! text = "BIOS v2.31 ... OK"
//! style = "system"
//! delay_ms = 250
//! ```
//!
//! Validation happens once, at construction. A [`Script`] that exists is
//! well-formed: ids are unique and non-empty, no delay is negative, and the
//! delays add up to at most [`MAX_TOTAL_DURATION`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay applied to a line that does not specify one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Longest a script may take from start to its last line.
pub const MAX_TOTAL_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Presentation tag for a line.
///
/// Purely cosmetic: the reveal engine never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    #[default]
    Normal,
    Success,
    Warning,
    Error,
    System,
    Hero,
}

impl StyleTag {
    /// Returns every tag, in declaration order.
    pub fn all() -> &'static [StyleTag] {
        &[
            StyleTag::Normal,
            StyleTag::Success,
            StyleTag::Warning,
            StyleTag::Error,
            StyleTag::System,
            StyleTag::Hero,
        ]
    }

    /// Returns the name used in script files.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleTag::Normal => "normal",
            StyleTag::Success => "success",
            StyleTag::Warning => "warning",
            StyleTag::Error => "error",
            StyleTag::System => "system",
            StyleTag::Hero => "hero",
        }
    }
}

impl std::fmt::Display for StyleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scripted boot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Line {
    id: String,
    text: String,
    #[serde(default)]
    style: StyleTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay_ms: Option<i64>,
}

impl Line {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            style: StyleTag::Normal,
            delay_ms: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleTag) -> Self {
        self.style = style;
        self
    }

    /// Sets the delay in milliseconds. Negative values are accepted here and
    /// rejected by [`Script::new`].
    #[must_use]
    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> StyleTag {
        self.style
    }

    /// The delay as written in the script, if any.
    pub fn delay_ms(&self) -> Option<i64> {
        self.delay_ms
    }

    /// How long to wait before this line appears, measured from the previous
    /// line's reveal.
    pub fn effective_delay(&self) -> Duration {
        match self.delay_ms {
            Some(ms) => Duration::from_millis(u64::try_from(ms).unwrap_or(0)),
            None => DEFAULT_DELAY,
        }
    }
}

/// Errors detected while building a [`Script`].
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate line id '{id}' (lines {first} and {second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("line '{id}' has a negative delay ({delay_ms}ms)")]
    NegativeDelay { id: String, delay_ms: i64 },

    #[error("line '{id}' pushes the script past the 24h limit")]
    DelayOverflow { id: String },

    #[error("failed to parse script")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read script from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default, rename = "line")]
    lines: Vec<Line>,
}

/// A validated, ordered boot sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    lines: Vec<Line>,
}

impl Script {
    /// Builds a script, rejecting empty ids, duplicate ids, negative delays
    /// and scripts running longer than [`MAX_TOTAL_DURATION`].
    ///
    /// # Errors
    /// Returns the first problem found, in script order.
    pub fn new(lines: Vec<Line>) -> Result<Self, ScriptError> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(lines.len());
        let mut total = Duration::ZERO;

        for (index, line) in lines.iter().enumerate() {
            if line.id.trim().is_empty() {
                return Err(ScriptError::EmptyId { index });
            }
            if let Some(&first) = seen.get(line.id.as_str()) {
                return Err(ScriptError::DuplicateId {
                    id: line.id.clone(),
                    first,
                    second: index,
                });
            }
            if let Some(delay_ms) = line.delay_ms
                && delay_ms < 0
            {
                return Err(ScriptError::NegativeDelay {
                    id: line.id.clone(),
                    delay_ms,
                });
            }
            total = total
                .checked_add(line.effective_delay())
                .filter(|total| *total <= MAX_TOTAL_DURATION)
                .ok_or_else(|| ScriptError::DelayOverflow {
                    id: line.id.clone(),
                })?;
            seen.insert(line.id.as_str(), index);
        }

        Ok(Self { lines })
    }

    /// Parses and validates a script from TOML source.
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or the script is invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(source)?;
        Self::new(file.lines)
    }

    /// Reads, parses and validates a script file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid script.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// The script shipped with the binary.
    ///
    /// # Errors
    /// Only fails if the embedded `default_script.toml` is broken.
    pub fn builtin() -> Result<Self, ScriptError> {
        Self::from_toml_str(include_str!("../default_script.toml"))
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Time from start until the last line is visible. Never exceeds
    /// [`MAX_TOTAL_DURATION`].
    pub fn total_duration(&self) -> Duration {
        self.lines.iter().map(Line::effective_delay).sum()
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
