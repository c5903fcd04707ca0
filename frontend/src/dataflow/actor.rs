//! Single-value Actor: owns a `Mutable<T>` and is the only code that writes it.

use std::future::Future;
use std::rc::Rc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state container driven by its own event loop.
///
/// The processor receives the state handle and usually loops over one or more
/// relay streams with `select!`. Readers only get signals. Dropping the last
/// clone of an Actor drops its task, which also cancels any timer the loop is
/// awaiting.
///
/// ```rust
/// let (billboard_added_relay, mut billboard_added_stream) = relay::<String>();
/// let selection = Actor::new(Selection::new(), async move |state| {
///     while let Some(id) = billboard_added_stream.next().await {
///         state.lock_mut().add(id);
///     }
/// });
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T: 'static> {
    state: Mutable<T>,
    #[allow(dead_code)]
    task_handle: Rc<TaskHandle>,
}

impl<T: 'static> Actor<T> {
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Rc::new(Task::start_droppable(processor(state.clone())));
        Self { state, task_handle }
    }

    pub fn signal(&self) -> impl Signal<Item = T> + use<T>
    where
        T: Clone,
    {
        self.state.signal_cloned()
    }

    /// Maps through a reference so large state is not cloned per emission.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        F: FnMut(&T) -> U + 'static,
    {
        self.state.signal_ref(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::{StreamExt, select};
    use std::time::Duration;
    use zoon::SignalExt;

    async fn pause() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn processor_applies_events_in_order() {
        let (billboard_added_relay, mut billboard_added_stream) = relay::<String>();
        let added = Actor::new(Vec::<String>::new(), async move |state| {
            while let Some(id) = billboard_added_stream.next().await {
                state.lock_mut().push(id);
            }
        });

        billboard_added_relay.send("b2".to_string());
        billboard_added_relay.send("b1".to_string());
        pause().await;

        let ids = added.signal().to_stream().next().await.unwrap();
        assert_eq!(ids, ["b2", "b1"]);
    }

    #[tokio::test]
    async fn processor_selects_over_several_relays() {
        let (region_selected_relay, mut region_selected_stream) = relay::<String>();
        let (reset_requested_relay, mut reset_requested_stream) = relay::<()>();
        let region = Actor::new(String::new(), async move |state| {
            loop {
                select! {
                    Some(region_id) = region_selected_stream.next() => state.set_neq(region_id),
                    Some(()) = reset_requested_stream.next() => state.set_neq(String::new()),
                    complete => break,
                }
            }
        });

        region_selected_relay.send("r2".to_string());
        pause().await;
        assert_eq!(region.signal().to_stream().next().await.unwrap(), "r2");

        reset_requested_relay.send(());
        pause().await;
        assert_eq!(region.signal().to_stream().next().await.unwrap(), "");
    }

    #[tokio::test]
    async fn signal_ref_maps_without_cloning_state() {
        let (billboard_added_relay, mut billboard_added_stream) = relay::<String>();
        let selection = Actor::new(shared::Selection::new(), async move |state| {
            while let Some(id) = billboard_added_stream.next().await {
                state.lock_mut().add(id);
            }
        });

        billboard_added_relay.send("b1".to_string());
        billboard_added_relay.send("b1".to_string());
        pause().await;

        let count = selection.signal_ref(shared::Selection::len).to_stream().next().await.unwrap();
        assert_eq!(count, 1);
    }
}
