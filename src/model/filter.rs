use std::fmt;
use std::str::FromStr;

use super::task::{ParseError, Priority, normalize_word};

/// Priority dropdown selection: everything, or one priority only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn allows(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => p == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => f.write_str("All Priorities"),
            PriorityFilter::Only(p) => write!(f, "{} Priority", p),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_word(s) == "all" {
            return Ok(PriorityFilter::All);
        }
        s.parse::<Priority>()
            .map(PriorityFilter::Only)
            .map_err(|_| ParseError::PriorityFilter(s.to_string()))
    }
}

/// Transient view state owned by the presentation layer and passed into
/// the derived views. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against text and category.
    /// Empty matches everything.
    pub search: String,
    pub priority: PriorityFilter,
}

impl TaskFilter {
    pub fn new(search: impl Into<String>, priority: PriorityFilter) -> Self {
        TaskFilter {
            search: search.into(),
            priority,
        }
    }

    /// Filter that lets every task through
    pub fn all() -> Self {
        TaskFilter::default()
    }
}
