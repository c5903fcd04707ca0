//! Timer-agnostic debounce bookkeeping.
//!
//! The caller owns the clock: every [`Debouncer::push`] hands out a ticket, the
//! caller waits the delay and then redeems the ticket with [`Debouncer::fire`].
//! Only the newest ticket yields a value, and only once. A newer push or a
//! [`Debouncer::cancel`] turns every older ticket into a no-op, which is what
//! keeps a timer scheduled before a reset from writing stale input back.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    pending: Option<T>,
    generation: u64,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: T) -> DebounceTicket {
        self.generation += 1;
        self.pending = Some(value);
        DebounceTicket(self.generation)
    }

    pub fn fire(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.generation {
            return None;
        }
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_fires_once_with_last_value() {
        let mut debouncer = Debouncer::new();
        let tickets: Vec<_> = ["a", "ab", "abc", "abcd"]
            .into_iter()
            .map(|text| debouncer.push(text.to_string()))
            .collect();

        let fired: Vec<_> = tickets
            .into_iter()
            .filter_map(|ticket| debouncer.fire(ticket))
            .collect();
        assert_eq!(fired, ["abcd"]);
    }

    #[test]
    fn ticket_redeems_only_once() {
        let mut debouncer = Debouncer::new();
        let ticket = debouncer.push(1);
        assert_eq!(debouncer.fire(ticket), Some(1));
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn cancel_invalidates_pending_ticket() {
        let mut debouncer = Debouncer::new();
        let stale = debouncer.push("xyz");
        debouncer.cancel();
        assert_eq!(debouncer.fire(stale), None);

        let fresh = debouncer.push("new");
        assert_eq!(debouncer.fire(stale), None);
        assert_eq!(debouncer.fire(fresh), Some("new"));
    }
}
