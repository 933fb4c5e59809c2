//! Document paths.
//!
//! A path is written as dotted steps (`contributor.0.name`). Steps made only of
//! ASCII digits are array indices; everything else is a field name. The empty
//! string is the document root.

use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// One step of a [`DocPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// A mapping member.
    Key(String),
    /// A position in an ordered sequence.
    Index(usize),
}

impl PathStep {
    /// The step as a mapping key. Indices render as their decimal form.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }

    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathStep {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<usize> for PathStep {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// A sequence of steps locating a position within a nested document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocPath {
    steps: Vec<PathStep>,
}

impl DocPath {
    /// The document root (no steps).
    #[must_use]
    pub const fn root() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub const fn from_steps(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] for empty segments (`a..b`, a trailing
    /// dot) or an index that does not fit in `usize`.
    pub fn parse(path: &str) -> Result<Self, CoreError> {
        if path.is_empty() {
            return Ok(Self::root());
        }

        let steps = path
            .split('.')
            .map(|segment| parse_step(path, segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Name of the top-level field this path starts at, if the first step is a key.
    #[must_use]
    pub fn root_field(&self) -> Option<&str> {
        match self.steps.first() {
            Some(PathStep::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// A new path with `step` appended.
    #[must_use]
    pub fn child(&self, step: impl Into<PathStep>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step.into());
        Self { steps }
    }

    /// JSON Pointer form (`/contributor/0/name`), `/` for the root.
    ///
    /// Matches the instance paths reported by the validator so error filtering
    /// can compare the two directly.
    #[must_use]
    pub fn to_pointer(&self) -> String {
        if self.steps.is_empty() {
            return String::from("/");
        }
        let mut pointer = String::new();
        for step in &self.steps {
            pointer.push('/');
            pointer.push_str(&step.as_key().replace('~', "~0").replace('/', "~1"));
        }
        pointer
    }
}

fn parse_step(path: &str, segment: &str) -> Result<PathStep, CoreError> {
    if segment.is_empty() {
        return Err(CoreError::InvalidPath {
            path: path.to_string(),
            reason: "empty path segment".to_string(),
        });
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        return segment
            .parse::<usize>()
            .map(PathStep::Index)
            .map_err(|e| CoreError::InvalidPath {
                path: path.to_string(),
                reason: format!("index '{segment}' out of range: {e}"),
            });
    }
    Ok(PathStep::Key(segment.to_string()))
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl FromStr for DocPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
