use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

use super::period::DateRange;

/// Bucket label for transactions no job claims.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRule {
    pub name: String,
    pub active: DateRange,
    /// Case-insensitive substrings tested against the vendor.
    pub vendor_patterns: Vec<String>,
    /// Case-insensitive substrings tested against the description.
    pub description_patterns: Vec<String>,
}

impl JobRule {
    pub fn new(
        name: impl Into<String>,
        active: DateRange,
        vendor_patterns: Vec<String>,
        description_patterns: Vec<String>,
    ) -> Self {
        JobRule {
            name: name.into(),
            active,
            vendor_patterns,
            description_patterns,
        }
    }

    /// A rule without any patterns can never claim a transaction.
    pub fn has_patterns(&self) -> bool {
        !self.vendor_patterns.is_empty() || !self.description_patterns.is_empty()
    }
}

/// Job rules in precedence order. Earlier rules win ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobRuleSet {
    rules: Vec<JobRule>,
}

impl JobRuleSet {
    pub fn new(rules: Vec<JobRule>) -> Result<Self, RuleError> {
        validate(&rules)?;
        Ok(Self { rules })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }
}

fn validate(rules: &[JobRule]) -> Result<(), RuleError> {
    let mut seen = HashSet::with_capacity(rules.len());

    for (index, rule) in rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            return Err(RuleError::BlankName { index: index + 1 });
        }
        if rule.name == UNCATEGORIZED {
            return Err(RuleError::ReservedName(rule.name.clone()));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(RuleError::DuplicateName(rule.name.clone()));
        }
        for (field, patterns) in [
            ("vendor_patterns", &rule.vendor_patterns),
            ("description_patterns", &rule.description_patterns),
        ] {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(RuleError::BlankPattern {
                    job: rule.name.clone(),
                    field,
                });
            }
        }
    }

    Ok(())
}

impl<'a> IntoIterator for &'a JobRuleSet {
    type Item = &'a JobRule;
    type IntoIter = std::slice::Iter<'a, JobRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// The rule source could not be turned into a usable [`JobRuleSet`].
///
/// Job positions (`index`) are 1-based, in document order.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("cannot read rules from '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("rules document is not valid {format}: {message}")]
    Syntax {
        format: &'static str,
        message: String,
    },
    #[error("rules document has no 'jobs' list")]
    MissingJobs,
    #[error("job #{index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },
    #[error("job #{index}: name is blank")]
    BlankName { index: usize },
    #[error("job '{job}': {field} '{value}' is not a YYYY-MM-DD date")]
    InvalidDate {
        job: String,
        field: &'static str,
        value: String,
    },
    #[error("job '{job}': date_start {start} is after date_end {end}")]
    InvertedRange {
        job: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("job '{0}' is defined more than once")]
    DuplicateName(String),
    #[error("job name '{0}' is reserved for unmatched transactions")]
    ReservedName(String),
    #[error("job '{job}': {field} contains a blank pattern")]
    BlankPattern { job: String, field: &'static str },
}
