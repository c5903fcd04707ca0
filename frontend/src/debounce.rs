use crate::dataflow::{Actor, Relay, discard_queued, relay};
use futures::future::LocalBoxFuture;
use futures::{FutureExt, StreamExt, select_biased};
use shared::Debouncer;
use zoon::*;

/// Trailing-edge debounce of a value stream.
///
/// `value` only follows `input_changed_relay` once no new input arrived for
/// `delay_ms`; every input restarts the wait. A reset cancels the pending
/// input and publishes `T::default()` at once. Dropping the last clone drops
/// the actor task together with its timer.
#[derive(Clone)]
pub struct Debounced<T: 'static> {
    pub value: Actor<T>,
    pub input_changed_relay: Relay<T>,
    pub reset_requested_relay: Relay<()>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Default + 'static,
{
    pub fn new(delay_ms: u32) -> Self {
        Self::with_sleep(delay_ms, |ms| Timer::sleep(ms).boxed_local())
    }

    /// Same as [`Debounced::new`] with the quiet-period timer supplied by the caller.
    pub fn with_sleep<S>(delay_ms: u32, sleep: S) -> Self
    where
        S: Fn(u32) -> LocalBoxFuture<'static, ()> + 'static,
    {
        let (input_changed_relay, input_changed_stream) = relay::<T>();
        let (reset_requested_relay, reset_requested_stream) = relay::<()>();

        let value = Actor::new(T::default(), async move |state| {
            let mut input_changed_stream = input_changed_stream.fuse();
            let mut reset_requested_stream = reset_requested_stream.fuse();
            let mut debouncer = Debouncer::new();

            // Resets are polled first and swallow input queued with them.
            loop {
                select_biased! {
                    reset = reset_requested_stream.next() => {
                        if reset.is_none() {
                            break;
                        }
                        debouncer.cancel();
                        discard_queued(&mut input_changed_stream);
                        state.set_neq(T::default());
                    }
                    input = input_changed_stream.next() => {
                        let Some(input) = input else { break };
                        let mut ticket = debouncer.push(input);

                        // Quiet period; every new input restarts the timer.
                        loop {
                            select_biased! {
                                reset = reset_requested_stream.next() => {
                                    if reset.is_none() {
                                        return;
                                    }
                                    debouncer.cancel();
                                    discard_queued(&mut input_changed_stream);
                                    state.set_neq(T::default());
                                    break;
                                }
                                input = input_changed_stream.next() => {
                                    let Some(input) = input else { return };
                                    ticket = debouncer.push(input);
                                }
                                _ = sleep(delay_ms).fuse() => {
                                    if let Some(value) = debouncer.fire(ticket) {
                                        state.set_neq(value);
                                    }
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });

        Self {
            value,
            input_changed_relay,
            reset_requested_relay,
        }
    }
}
