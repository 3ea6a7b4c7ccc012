use crossbeam_channel::{unbounded, Receiver, Sender};
use hotword_core::{ActionSink, EventHub, KeyEvent, ReloadController, Result, RuleSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(2);

/// Reports every expansion on a channel.
struct ChannelSink {
    done: Sender<(usize, String)>,
}

impl ActionSink for ChannelSink {
    fn delete_last_characters(&mut self, _count: usize) -> Result<()> {
        Ok(())
    }

    fn insert_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn expand(&mut self, count: usize, replacement: &str) -> Result<()> {
        let _ = self.done.send((count, replacement.to_string()));
        Ok(())
    }
}

/// Reports an expansion, then blocks until the test opens the gate.
struct GateSink {
    done: Sender<(usize, String)>,
    gate: Receiver<()>,
}

impl ActionSink for GateSink {
    fn delete_last_characters(&mut self, _count: usize) -> Result<()> {
        Ok(())
    }

    fn insert_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn expand(&mut self, count: usize, replacement: &str) -> Result<()> {
        let _ = self.done.send((count, replacement.to_string()));
        let _ = self.gate.recv_timeout(WAIT);
        Ok(())
    }
}

/// Panics on its first expansion, then behaves like [`ChannelSink`].
struct FlakySink {
    done: Sender<(usize, String)>,
    tripped: Arc<AtomicBool>,
}

impl ActionSink for FlakySink {
    fn delete_last_characters(&mut self, _count: usize) -> Result<()> {
        Ok(())
    }

    fn insert_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn expand(&mut self, count: usize, replacement: &str) -> Result<()> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("paste failed hard");
        }
        let _ = self.done.send((count, replacement.to_string()));
        Ok(())
    }
}

fn channel_controller(hub: &Arc<EventHub>) -> (ReloadController, Receiver<(usize, String)>) {
    let (tx, rx) = unbounded();
    let controller = ReloadController::new(
        Arc::clone(hub),
        Box::new(move || Box::new(ChannelSink { done: tx.clone() }) as Box<dyn ActionSink>),
    );
    (controller, rx)
}

fn type_str(hub: &EventHub, input: &str) {
    for c in input.chars() {
        hub.publish(KeyEvent::pressed(c.to_string()));
        hub.publish(KeyEvent::released(c.to_string()));
    }
}

#[test]
fn typing_a_trigger_pastes_its_replacement() {
    let hub = Arc::new(EventHub::new());
    let (controller, done) = channel_controller(&hub);
    controller
        .start(RuleSet::from_pairs([("hw", "Hello, world!")]).unwrap())
        .unwrap();

    type_str(&hub, "hw");
    assert_eq!(
        done.recv_timeout(WAIT).unwrap(),
        (2, "Hello, world!".to_string())
    );

    type_str(&hub, "hw");
    assert_eq!(
        done.recv_timeout(WAIT).unwrap(),
        (2, "Hello, world!".to_string())
    );
}

#[test]
fn duplicate_triggers_each_fire() {
    let hub = Arc::new(EventHub::new());
    let (controller, done) = channel_controller(&hub);
    controller
        .start(RuleSet::from_pairs([("go", "first"), ("go", "second")]).unwrap())
        .unwrap();

    type_str(&hub, "go");
    assert_eq!(done.recv_timeout(WAIT).unwrap().1, "first");
    assert_eq!(done.recv_timeout(WAIT).unwrap().1, "second");
}

#[test]
fn only_new_triggers_complete_after_reload() {
    let hub = Arc::new(EventHub::new());
    let (controller, done) = channel_controller(&hub);
    controller
        .start(RuleSet::from_pairs([("hw", "old")]).unwrap())
        .unwrap();

    type_str(&hub, "hw");
    assert_eq!(done.recv_timeout(WAIT).unwrap().1, "old");

    controller
        .reload(RuleSet::from_pairs([("zz", "new")]).unwrap())
        .unwrap();

    type_str(&hub, "hwzz");
    assert_eq!(done.recv_timeout(WAIT).unwrap(), (2, "new".to_string()));
    assert!(done.try_recv().is_err());
}

#[test]
fn nothing_completes_after_stop() {
    let hub = Arc::new(EventHub::new());
    let (controller, done) = channel_controller(&hub);
    controller
        .start(RuleSet::from_pairs([("hw", "x")]).unwrap())
        .unwrap();

    controller.stop();
    type_str(&hub, "hw");
    assert!(done.recv_timeout(Duration::from_millis(200)).is_err());
    assert!(!hub.has_subscriber());
}

#[test]
fn buffered_events_are_dropped_by_a_stopping_generation() {
    let hub = Arc::new(EventHub::new());
    let (done_tx, done) = unbounded();
    let (gate_tx, gate_rx) = unbounded();

    let controller = Arc::new(ReloadController::new(
        Arc::clone(&hub),
        Box::new(move || {
            Box::new(GateSink {
                done: done_tx.clone(),
                gate: gate_rx.clone(),
            }) as Box<dyn ActionSink>
        }),
    ));
    controller
        .start(RuleSet::from_pairs([("ab", "x")]).unwrap())
        .unwrap();

    // First completion parks the engine thread inside the sink.
    type_str(&hub, "ab");
    assert_eq!(done.recv_timeout(WAIT).unwrap(), (2, "x".to_string()));

    // These queue up behind the parked action.
    type_str(&hub, "abab");

    let stopper = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.stop())
    };

    // The hub is released before stop() waits for the engine thread.
    while hub.has_subscriber() {
        thread::sleep(Duration::from_millis(5));
    }
    gate_tx.send(()).unwrap();
    stopper.join().unwrap();

    assert!(done.try_recv().is_err());
    assert!(!controller.is_running());
}

#[test]
fn concurrent_reloads_never_overlap() {
    let hub = Arc::new(EventHub::new());
    let (controller, _done) = channel_controller(&hub);
    let controller = Arc::new(controller);
    controller.start(RuleSet::default()).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                for _ in 0..10 {
                    let rules = RuleSet::from_pairs([(format!("t{}", i), "x")]).unwrap();
                    controller.reload(rules).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(controller.generation(), Some(41));
    assert!(hub.has_subscriber());
}

#[test]
fn dead_generation_is_detected_and_restarted() {
    let hub = Arc::new(EventHub::new());
    let (done_tx, done) = unbounded();
    let tripped = Arc::new(AtomicBool::new(false));

    let controller = ReloadController::new(
        Arc::clone(&hub),
        Box::new(move || {
            Box::new(FlakySink {
                done: done_tx.clone(),
                tripped: Arc::clone(&tripped),
            }) as Box<dyn ActionSink>
        }),
    );
    controller
        .start(RuleSet::from_pairs([("hw", "Hello, world!")]).unwrap())
        .unwrap();

    type_str(&hub, "hw");

    let deadline = Instant::now() + WAIT;
    while controller.is_running() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!controller.is_running());
    assert!(!hub.publish(KeyEvent::released("h")));
    assert!(done.try_recv().is_err());

    assert_eq!(controller.recover().unwrap(), Some(2));
    assert!(controller.is_running());

    type_str(&hub, "hw");
    assert_eq!(
        done.recv_timeout(WAIT).unwrap(),
        (2, "Hello, world!".to_string())
    );
}
