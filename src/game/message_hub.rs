//! Subscribe/notify channel for inbound shared text.
//!
//! A pasted PGN (or any other text another app shares in) arrives as one
//! string. Subscribers receive it as-is; when nobody has subscribed yet the
//! most recent message is held and delivered to the first subscriber.
//! Owned by the host application, not a process-wide singleton.

type Subscriber = Box<dyn FnMut(&str) + Send>;

#[derive(Default)]
pub struct MessageHub {
    subscribers: Vec<Subscriber>,
    pending: Option<String>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. A pending message is delivered to it
    /// immediately and cleared.
    pub fn subscribe(&mut self, mut on_message: impl FnMut(&str) + Send + 'static) {
        if let Some(pending) = self.pending.take() {
            on_message(&pending);
        }
        self.subscribers.push(Box::new(on_message));
    }

    /// Deliver a message to every subscriber, or hold it when there are
    /// none yet.
    pub fn notify(&mut self, text: &str) {
        if self.subscribers.is_empty() {
            self.pending = Some(text.to_owned());
            return;
        }
        for subscriber in &mut self.subscribers {
            subscriber(text);
        }
    }
}

impl std::fmt::Debug for MessageHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHub")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}
