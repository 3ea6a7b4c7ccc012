//! Engine generation lifecycle.
//!
//! A reload stops the current generation completely before the next one
//! subscribes, so a keystroke is never seen by two rule sets. Calls are
//! serialized by the controller's lock.

use crate::engine::{Engine, RunningEngine, DEFAULT_SLOW_ACTION};
use crate::error::{HotwordError, Result};
use crate::hub::EventHub;
use crate::rule::RuleSet;
use crate::sink::ActionSink;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Builds the action sink for each new generation.
pub type SinkFactory = Box<dyn Fn() -> Box<dyn ActionSink> + Send + Sync>;

#[derive(Default)]
struct State {
    running: Option<RunningEngine>,
    rules: RuleSet,
    generation: u64,
}

pub struct ReloadController {
    hub: Arc<EventHub>,
    make_sink: SinkFactory,
    slow_action: Duration,
    state: Mutex<State>,
}

impl ReloadController {
    pub fn new(hub: Arc<EventHub>, make_sink: SinkFactory) -> Self {
        Self {
            hub,
            make_sink,
            slow_action: DEFAULT_SLOW_ACTION,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_slow_action_threshold(mut self, threshold: Duration) -> Self {
        self.slow_action = threshold;
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start the first generation. Starting while a generation is running is
    /// a caller bug and is refused.
    pub fn start(&self, rules: RuleSet) -> Result<u64> {
        let mut state = self.lock();
        if state.running.is_some() {
            return Err(HotwordError::SubscriptionActive);
        }
        self.start_locked(&mut state, rules)
    }

    /// Stop the running generation, if any, then start one with `rules`.
    pub fn reload(&self, rules: RuleSet) -> Result<u64> {
        let mut state = self.lock();
        if let Some(running) = state.running.take() {
            running.stop();
        }
        self.start_locked(&mut state, rules)
    }

    /// Stop the running generation. Blocks until it can no longer dispatch.
    pub fn stop(&self) {
        let mut state = self.lock();
        if let Some(running) = state.running.take() {
            running.stop();
        }
    }

    /// True while a generation is subscribed and its dispatch thread is alive.
    pub fn is_running(&self) -> bool {
        self.lock()
            .running
            .as_ref()
            .is_some_and(|running| !running.is_finished())
    }

    /// Replace a generation whose dispatch thread died with a fresh one on
    /// the same rules. Returns the new generation number, or `None` when
    /// nothing needed restarting.
    pub fn recover(&self) -> Result<Option<u64>> {
        let mut state = self.lock();
        let running = match state.running.take() {
            Some(running) if running.is_finished() => running,
            healthy => {
                state.running = healthy;
                return Ok(None);
            }
        };

        tracing::error!(
            generation = running.generation(),
            "engine generation died; key events were not being matched"
        );
        running.stop();

        let rules = state.rules.clone();
        self.start_locked(&mut state, rules).map(Some)
    }

    /// Generation number of the running engine, if any.
    pub fn generation(&self) -> Option<u64> {
        self.lock().running.as_ref().map(RunningEngine::generation)
    }

    fn start_locked(&self, state: &mut State, rules: RuleSet) -> Result<u64> {
        let generation = state.generation + 1;
        let rule_count = rules.len();
        state.rules = rules.clone();

        let engine =
            Engine::new(&rules, (self.make_sink)()).with_slow_action_threshold(self.slow_action);
        let running = RunningEngine::start(generation, engine, &self.hub)?;

        state.generation = generation;
        state.running = Some(running);
        tracing::info!(generation, rules = rule_count, "rules loaded");
        Ok(generation)
    }
}

impl Drop for ReloadController {
    fn drop(&mut self) {
        self.stop();
    }
}
