//! Trigger dispatch engine.
//!
//! An [`Engine`] owns one [`Matcher`] per rule and feeds every key event to
//! all of them. Completions go to the [`ActionSink`] synchronously, so an
//! expansion finishes before the next key is looked at.
//!
//! [`RunningEngine`] is one engine generation bound to an [`EventHub`]
//! subscription and driven from its own thread.

use crate::error::Result;
use crate::event::KeyEvent;
use crate::hub::{EventHub, Subscription};
use crate::matcher::{Completion, Matcher, Step};
use crate::rule::RuleSet;
use crate::sink::ActionSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const DEFAULT_SLOW_ACTION: Duration = Duration::from_millis(500);

pub struct Engine<S> {
    matchers: Vec<Matcher>,
    sink: S,
    slow_action: Duration,
}

impl<S: ActionSink> Engine<S> {
    pub fn new(rules: &RuleSet, sink: S) -> Self {
        Self {
            matchers: rules.iter().cloned().map(Matcher::new).collect(),
            sink,
            slow_action: DEFAULT_SLOW_ACTION,
        }
    }

    pub fn with_slow_action_threshold(mut self, threshold: Duration) -> Self {
        self.slow_action = threshold;
        self
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Normalize `event` and feed it to every matcher. Events that are not a
    /// single released character are ignored. Returns the number of
    /// completions.
    pub fn dispatch(&mut self, event: &KeyEvent) -> usize {
        match event.normalize() {
            Some(c) => self.feed(c),
            None => 0,
        }
    }

    /// Feed one character to every matcher in registration order.
    pub fn feed(&mut self, c: char) -> usize {
        let mut completed = 0;
        for matcher in self.matchers.iter_mut() {
            if let Step::Completed(completion) = matcher.feed(c) {
                completed += 1;
                run_action(&mut self.sink, &completion, self.slow_action);
            }
        }
        completed
    }
}

fn run_action<S: ActionSink>(sink: &mut S, completion: &Completion, slow_action: Duration) {
    let trigger = completion.rule.trigger();
    tracing::info!(%trigger, count = completion.count, "trigger completed");

    let started = Instant::now();
    if let Err(e) = sink.expand(completion.count, completion.replacement()) {
        tracing::warn!(%trigger, error = %e, "expansion failed");
    }

    let elapsed = started.elapsed();
    if elapsed > slow_action {
        tracing::warn!(
            %trigger,
            elapsed_ms = elapsed.as_millis() as u64,
            "expansion blocked key processing longer than expected"
        );
    }
}

/// One engine generation consuming events from an [`EventHub`].
pub struct RunningEngine {
    generation: u64,
    hub: Arc<EventHub>,
    subscription_id: u64,
    stopped: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RunningEngine {
    /// Subscribe to `hub` and start dispatching on a dedicated thread.
    ///
    /// Fails with `SubscriptionActive` if another generation is still
    /// subscribed.
    pub fn start<S>(generation: u64, engine: Engine<S>, hub: &Arc<EventHub>) -> Result<Self>
    where
        S: ActionSink + 'static,
    {
        let subscription = hub.subscribe()?;
        let subscription_id = subscription.id();
        let stopped = Arc::new(AtomicBool::new(false));

        let spawned = thread::Builder::new()
            .name(format!("hotword-engine-{}", generation))
            .spawn({
                let stopped = Arc::clone(&stopped);
                move || run_generation(generation, engine, subscription, stopped)
            });

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                hub.unsubscribe(subscription_id);
                return Err(e.into());
            }
        };

        tracing::info!(generation, "engine generation started");
        Ok(Self {
            generation,
            hub: Arc::clone(hub),
            subscription_id,
            stopped,
            thread: Some(thread),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once the dispatch thread has exited on its own, for example
    /// after a panicking sink. A stopped engine also counts as finished.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Unsubscribe and wait for the dispatch thread to exit. Once this
    /// returns no event reaches this generation's matchers.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        self.stopped.store(true, Ordering::SeqCst);
        self.hub.unsubscribe(self.subscription_id);

        if thread.join().is_err() {
            tracing::error!(generation = self.generation, "engine thread panicked");
        }
        tracing::info!(generation = self.generation, "engine generation stopped");
    }
}

impl Drop for RunningEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_generation<S: ActionSink>(
    generation: u64,
    mut engine: Engine<S>,
    subscription: Subscription,
    stopped: Arc<AtomicBool>,
) {
    // recv fails once the hub drops our sender on unsubscribe.
    while let Ok(event) = subscription.recv() {
        if stopped.load(Ordering::SeqCst) {
            break;
        }
        engine.dispatch(&event);
    }
    tracing::debug!(generation, "engine dispatch loop exited");
}
