//! Per-rule trigger state machine.
//!
//! A [`Matcher`] tracks how much of its rule's trigger has been typed. It is
//! driven one character at a time and reports a [`Completion`] on the
//! character that finishes the trigger, resetting itself in the same step.

use crate::rule::Rule;
use std::sync::Arc;

/// A finished trigger: erase `count` characters and insert `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub count: usize,
    pub rule: Arc<Rule>,
}

impl Completion {
    pub fn replacement(&self) -> &str {
        self.rule.replacement()
    }
}

/// Outcome of feeding one character to a matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Advanced,
    /// The first trigger character was repeated while exactly one character
    /// had matched; progress is kept as is.
    Repeated,
    Reset,
    Completed(Completion),
}

#[derive(Debug, Clone)]
pub struct Matcher {
    rule: Arc<Rule>,
    matched: usize,
}

impl Matcher {
    pub fn new(rule: Arc<Rule>) -> Self {
        Self { rule, matched: 0 }
    }

    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    /// Characters matched so far; always a prefix of the trigger.
    pub fn progress(&self) -> &[char] {
        &self.rule.trigger().chars()[..self.matched]
    }

    pub fn feed(&mut self, c: char) -> Step {
        let trigger = self.rule.trigger().chars();

        if c == trigger[self.matched] {
            self.matched += 1;
            if self.matched == trigger.len() {
                self.matched = 0;
                return Step::Completed(Completion {
                    count: trigger.len(),
                    rule: Arc::clone(&self.rule),
                });
            }
            Step::Advanced
        } else if self.matched == 1 && c == trigger[0] {
            Step::Repeated
        } else {
            // The resetting character is consumed, not retried as a new start.
            self.matched = 0;
            Step::Reset
        }
    }

    pub fn reset(&mut self) {
        self.matched = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(trigger: &str, replacement: &str) -> Matcher {
        Matcher::new(Arc::new(Rule::new(trigger, replacement).unwrap()))
    }

    fn feed_all(m: &mut Matcher, input: &str) -> Vec<Step> {
        input.chars().map(|c| m.feed(c)).collect()
    }

    #[test]
    fn full_trigger_completes_once_and_resets() {
        let mut m = matcher("abc", "alphabet");
        let steps = feed_all(&mut m, "abc");

        assert_eq!(steps[0], Step::Advanced);
        assert_eq!(steps[1], Step::Advanced);
        match &steps[2] {
            Step::Completed(done) => {
                assert_eq!(done.count, 3);
                assert_eq!(done.replacement(), "alphabet");
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(m.progress().is_empty());

        let again = feed_all(&mut m, "abc");
        assert!(matches!(again[2], Step::Completed(_)));
    }

    #[test]
    fn single_character_trigger_completes_immediately() {
        let mut m = matcher("x", "ex");
        assert!(matches!(m.feed('x'), Step::Completed(ref d) if d.count == 1));
        assert!(matches!(m.feed('x'), Step::Completed(_)));
    }

    #[test]
    fn mismatch_resets_progress() {
        let mut m = matcher("abc", "x");
        feed_all(&mut m, "ab");
        assert_eq!(m.progress(), &['a', 'b']);

        assert_eq!(m.feed('z'), Step::Reset);
        assert!(m.progress().is_empty());
    }

    #[test]
    fn repeated_first_character_is_tolerated_at_length_one() {
        let mut m = matcher("hw", "Hello");
        assert_eq!(m.feed('h'), Step::Advanced);
        assert_eq!(m.feed('h'), Step::Repeated);
        assert_eq!(m.feed('h'), Step::Repeated);
        assert_eq!(m.progress(), &['h']);
        assert!(matches!(m.feed('w'), Step::Completed(_)));
    }

    #[test]
    fn repeat_tolerance_does_not_extend_past_length_one() {
        let mut m = matcher("abc", "x");
        feed_all(&mut m, "ab");
        assert_eq!(m.feed('a'), Step::Reset);
        assert!(m.progress().is_empty());
    }

    #[test]
    fn forward_match_wins_over_repeat_tolerance() {
        let mut m = matcher("aab", "x");
        assert_eq!(m.feed('a'), Step::Advanced);
        assert_eq!(m.feed('a'), Step::Advanced);
        assert_eq!(m.progress(), &['a', 'a']);
        assert!(matches!(m.feed('b'), Step::Completed(_)));
    }

    #[test]
    fn resetting_character_is_not_reconsidered_as_a_start() {
        let mut m = matcher("ab", "x");
        feed_all(&mut m, "ac");
        assert!(m.progress().is_empty());

        let mut m = matcher("abc", "x");
        feed_all(&mut m, "ab");
        assert_eq!(m.feed('a'), Step::Reset);
        assert_eq!(m.feed('b'), Step::Reset);
        assert!(m.progress().is_empty());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut m = matcher("hw", "x");
        assert_eq!(m.feed('H'), Step::Reset);
        assert!(m.progress().is_empty());
    }

    #[test]
    fn explicit_reset_clears_progress() {
        let mut m = matcher("hello", "x");
        feed_all(&mut m, "hel");
        m.reset();
        assert!(m.progress().is_empty());
    }
}
