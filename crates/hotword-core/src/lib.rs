//! hotword core: rule handling and the trigger matching engine.
//!
//! Every configured trigger gets its own [`Matcher`]. The [`Engine`] feeds
//! each released key to all matchers and, when one completes, asks the
//! [`ActionSink`] to erase the trigger and paste the replacement.

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod hub;
pub mod keyboard;
pub mod matcher;
pub mod rule;
pub mod settings;
pub mod sink;
pub mod storage;

// Re-export common items for convenience
pub use config::{get_config_dir, is_daemon_running};
pub use controller::{ReloadController, SinkFactory};
pub use engine::{Engine, RunningEngine};
pub use error::{HotwordError, Result};
pub use event::{KeyEvent, KeyTransition};
pub use hub::EventHub;
pub use matcher::{Completion, Matcher, Step};
pub use rule::{Rule, RuleSet, TriggerSequence};
pub use settings::{load_settings, PasteModifier, PasteShortcut, Settings};
pub use sink::{ActionSink, LogSink, PasteSink};
pub use storage::{add_rule, delete_rule, load_rules, touch_config, update_rule};
