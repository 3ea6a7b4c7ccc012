//! Expansion rules: a trigger sequence and the text that replaces it.

use crate::error::{HotwordError, Result};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Non-empty sequence of characters, compared code point by code point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerSequence(Vec<char>);

impl TriggerSequence {
    pub fn new(trigger: &str) -> Result<Self> {
        let chars: Vec<char> = trigger.chars().collect();
        if chars.is_empty() {
            return Err(HotwordError::EmptyTrigger);
        }
        Ok(Self(chars))
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> char {
        self.0[0]
    }
}

impl fmt::Display for TriggerSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    trigger: TriggerSequence,
    replacement: String,
}

impl Rule {
    pub fn new(trigger: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            trigger: TriggerSequence::new(trigger)?,
            replacement: replacement.into(),
        })
    }

    pub fn trigger(&self) -> &TriggerSequence {
        &self.trigger
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Immutable, ordered snapshot of the rules of one engine generation.
///
/// Cloning is cheap: every clone shares the same rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet(Arc<[Arc<Rule>]>);

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules.into_iter().map(Arc::new).collect())
    }

    /// Build a rule set from `(trigger, replacement)` pairs, rejecting
    /// the first invalid one.
    pub fn from_pairs<I, T, R>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, R)>,
        T: AsRef<str>,
        R: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(trigger, replacement)| Rule::new(trigger.as_ref(), replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }
}

impl Deref for RuleSet {
    type Target = [Arc<Rule>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
