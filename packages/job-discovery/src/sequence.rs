//! Latest-request-wins guard for overlapping queries.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket for one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets. A response is only applied if
/// its ticket is still the latest one issued; anything older lost the race to
/// a newer filter state.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let sequencer = RequestSequencer::new();
        let a = sequencer.issue();
        assert!(sequencer.is_latest(a));

        let b = sequencer.issue();
        assert!(b > a);
        assert!(!sequencer.is_latest(a));
        assert!(sequencer.is_latest(b));
    }
}
