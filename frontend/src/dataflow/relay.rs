//! Event relay for the Actor+Relay architecture.
//!
//! A relay is the only way UI code talks to an Actor: the UI sends what
//! happened, the Actor decides what that means for its state.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use futures::{FutureExt, Stream, StreamExt};
use std::cell::RefCell;
use std::rc::Rc;

/// Cloneable event sender with fan-out subscriptions.
///
/// Name relays after the event source, `{source}_{event}_relay`:
/// `search_text_changed_relay`, `billboard_added_relay`, `form_opened_relay`.
/// Every subscriber receives every event sent after it subscribed; events sent
/// while nobody listens are dropped.
pub struct Relay<T> {
    subscribers: Rc<RefCell<Vec<UnboundedSender<T>>>>,
}

impl<T> Clone for Relay<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Relay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Relay<T> {
    /// Relay with no subscribers; sends are discarded until someone subscribes.
    fn default() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + 'static> Relay<T> {
    pub fn subscribe(&self) -> UnboundedReceiver<T> {
        let (sender, receiver) = unbounded();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    pub fn send(&self, value: T) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|sender| !sender.is_closed());
        if let Some((last, rest)) = subscribers.split_last() {
            for sender in rest {
                let _ = sender.unbounded_send(value.clone());
            }
            let _ = last.unbounded_send(value);
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }
}

/// Relay plus its first subscription.
pub fn relay<T: Clone + 'static>() -> (Relay<T>, UnboundedReceiver<T>) {
    let relay = Relay::default();
    let stream = relay.subscribe();
    (relay, stream)
}

/// Drops every event already queued on `stream` without waiting for more.
pub fn discard_queued<S: Stream + Unpin>(stream: &mut S) -> usize {
    let mut discarded = 0;
    while let Some(Some(_)) = stream.next().now_or_never() {
        discarded += 1;
    }
    discarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let (relay, mut stream) = relay();
        relay.send(1);
        relay.send(2);
        relay.send(3);
        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
        assert_eq!(stream.next().await, Some(3));
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let (form_opened_relay, mut picker_stream) = relay::<String>();
        let mut debounce_stream = form_opened_relay.subscribe();

        form_opened_relay.send("reset".to_string());

        assert_eq!(picker_stream.next().await.as_deref(), Some("reset"));
        assert_eq!(debounce_stream.next().await.as_deref(), Some("reset"));
    }

    #[tokio::test]
    async fn dropped_subscribers_are_forgotten() {
        let (relay, stream) = relay::<u8>();
        let mut kept = relay.subscribe();
        drop(stream);

        relay.send(7);
        assert_eq!(relay.subscriber_count(), 1);
        assert_eq!(kept.next().await, Some(7));
    }

    #[test]
    fn queued_events_can_be_discarded() {
        let (relay, mut stream) = relay::<u8>();
        relay.send(1);
        relay.send(2);
        assert_eq!(discard_queued(&mut stream), 2);
        assert_eq!(discard_queued(&mut stream), 0);

        relay.send(3);
        assert_eq!(stream.next().now_or_never(), Some(Some(3)));
    }

    #[test]
    fn send_without_subscribers_is_discarded() {
        let relay = Relay::<u8>::default();
        relay.send(1);
        assert_eq!(relay.subscriber_count(), 0);
    }
}
