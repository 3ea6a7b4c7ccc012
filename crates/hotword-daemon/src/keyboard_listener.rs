use crossbeam_channel::{bounded, RecvTimeoutError};
use hotword_core::keyboard::KeyTranslator;
use hotword_core::{EventHub, HotwordError, Result};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the hook gets to report an installation failure.
const HOOK_STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Install the global keyboard hook and publish every key event to `hub`.
///
/// rdev cannot be unhooked, so the listener lives for the rest of the
/// process; engine generations come and go by (un)subscribing on the hub.
/// A hook that fails to install is reported as an error.
pub fn start_keyboard_listener(hub: Arc<EventHub>) -> Result<JoinHandle<()>> {
    let (failed_tx, failed_rx) = bounded::<String>(1);

    let handle = thread::Builder::new()
        .name("hotword-keyboard".to_string())
        .spawn(move || {
            let mut translator = KeyTranslator::new();
            let result = rdev::listen(move |event| {
                if let Some(key_event) = translator.translate(&event) {
                    if !hub.publish(key_event) {
                        tracing::warn!("key event dropped: no engine generation is listening");
                    }
                }
            });

            if let Err(e) = result {
                let message = format!("{:?}", e);
                tracing::error!(error = %message, "keyboard listener stopped");
                let _ = failed_tx.send(message);
            }
        })?;

    match failed_rx.recv_timeout(HOOK_STARTUP_GRACE) {
        Err(RecvTimeoutError::Timeout) => {
            tracing::info!("keyboard listener installed");
            Ok(handle)
        }
        Ok(message) => Err(HotwordError::Keyboard(format!(
            "Failed to install keyboard hook: {}",
            message
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(HotwordError::Keyboard(
            "Keyboard listener exited during startup".to_string(),
        )),
    }
}
