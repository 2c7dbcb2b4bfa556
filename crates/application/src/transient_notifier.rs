//! Timed one-shot status messages.
//!
//! At most one expiry timer is pending per notifier. Showing a new message
//! cancels the previous timer first, so an older message can never clear a
//! newer one when its own delay runs out.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Callback run once when a timer expires without being superseded.
pub type ExpiryAction = Box<dyn FnOnce() + Send + 'static>;

/// Message currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    text: String,
    expires_at: Instant,
}

impl TransientMessage {
    /// Returns the message text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns when the message clears itself.
    #[must_use]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// Change published to rendering-layer subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    /// A message became visible.
    Shown(String),
    /// The visible message went away.
    Cleared,
}

#[derive(Default)]
struct NotifierState {
    message: Option<TransientMessage>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl NotifierState {
    /// Cancels the pending timer and invalidates any timer that already woke.
    fn cancel_pending(&mut self) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

/// Holder of one self-expiring message.
pub struct TransientNotifier {
    state: Arc<Mutex<NotifierState>>,
    events: broadcast::Sender<NoticeEvent>,
}

impl TransientNotifier {
    /// Creates a notifier with no message.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(NotifierState::default())),
            events,
        }
    }

    /// Subscribes to shown/cleared events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.events.subscribe()
    }

    /// Returns the visible message.
    #[must_use]
    pub fn message(&self) -> Option<TransientMessage> {
        self.state.lock().message.clone()
    }

    /// Returns the visible message text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.state
            .lock()
            .message
            .as_ref()
            .map(|message| message.text.clone())
    }

    /// Returns whether an expiry timer is outstanding.
    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Shows `text` and clears it after `duration`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn show(&self, text: impl Into<String>, duration: Duration) {
        self.schedule(Some(text.into()), duration, None);
    }

    /// Shows an optional message and runs `on_expire` after `duration`.
    ///
    /// `on_expire` does not run if the timer is superseded or cleared first.
    pub fn show_then(&self, text: Option<String>, duration: Duration, on_expire: ExpiryAction) {
        self.schedule(text, duration, Some(on_expire));
    }

    /// Removes the message and cancels any pending timer. Idempotent.
    pub fn clear(&self) {
        let had_message = {
            let mut state = self.state.lock();
            state.cancel_pending();
            state.message.take().is_some()
        };

        if had_message {
            let _ = self.events.send(NoticeEvent::Cleared);
        }
    }

    fn schedule(&self, text: Option<String>, duration: Duration, on_expire: Option<ExpiryAction>) {
        let mut state = self.state.lock();
        let generation = state.cancel_pending();
        let had_message = state.message.is_some();

        state.message = text.clone().map(|text| TransientMessage {
            text,
            expires_at: Instant::now() + duration,
        });

        match text {
            Some(text) => {
                let _ = self.events.send(NoticeEvent::Shown(text));
            }
            None if had_message => {
                let _ = self.events.send(NoticeEvent::Cleared);
            }
            None => {}
        }

        let shared = Arc::clone(&self.state);
        let events = self.events.clone();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            let cleared = {
                let mut state = shared.lock();
                if state.generation != generation {
                    return;
                }
                state.pending = None;
                state.message.take().is_some()
            };

            debug!(generation, cleared, "transient notice timer expired");
            if cleared {
                let _ = events.send(NoticeEvent::Cleared);
            }
            if let Some(on_expire) = on_expire {
                on_expire();
            }
        }));
    }
}

impl Default for TransientNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TransientNotifier {
    fn drop(&mut self) {
        self.state.lock().cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::Instant;

    use super::{NoticeEvent, TransientNotifier};

    const DELAY: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn message_clears_after_its_delay() {
        let notifier = TransientNotifier::new();
        let mut events = notifier.subscribe();
        let started = Instant::now();

        notifier.show("saved", DELAY);
        assert_eq!(notifier.text().as_deref(), Some("saved"));
        assert!(notifier.has_pending_timer());

        assert_eq!(events.recv().await.ok(), Some(NoticeEvent::Shown("saved".to_owned())));
        assert_eq!(events.recv().await.ok(), Some(NoticeEvent::Cleared));
        assert!(started.elapsed() >= DELAY);
        assert_eq!(notifier.text(), None);
        assert!(!notifier.has_pending_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn second_show_supersedes_first_timer() {
        let notifier = TransientNotifier::new();
        let mut events = notifier.subscribe();
        let started = Instant::now();

        notifier.show("first", DELAY);
        tokio::time::sleep(Duration::from_secs(1)).await;
        notifier.show("second", DELAY);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(notifier.text().as_deref(), Some("second"));

        assert_eq!(events.recv().await.ok(), Some(NoticeEvent::Shown("first".to_owned())));
        assert_eq!(events.recv().await.ok(), Some(NoticeEvent::Shown("second".to_owned())));
        assert_eq!(events.recv().await.ok(), Some(NoticeEvent::Cleared));

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(4050), "{elapsed:?}");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_is_idempotent_and_cancels_expiry_action() {
        let notifier = TransientNotifier::new();
        let mut events = notifier.subscribe();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        notifier.show_then(
            Some("pending".to_owned()),
            DELAY,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        notifier.clear();
        notifier.clear();

        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(events.try_recv().ok(), Some(NoticeEvent::Shown("pending".to_owned())));
        assert_eq!(events.try_recv().ok(), Some(NoticeEvent::Cleared));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_action_runs_once_without_message() {
        let notifier = TransientNotifier::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        notifier.show_then(
            None,
            DELAY,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(notifier.message(), None);

        tokio::time::sleep(DELAY + Duration::from_millis(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(DELAY).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_notifier_cancels_its_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        {
            let notifier = TransientNotifier::new();
            notifier.show_then(
                Some("bye".to_owned()),
                DELAY,
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
