use std::fmt;

/// Tag carried by one round-trip; only the latest ticket may touch the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-widget monotonic counter imposing latest-request-wins.
///
/// Callers keep it behind the same lock as the state it guards so that issuing
/// a ticket and applying a result never interleave.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, making every outstanding one stale.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    pub fn latest(&self) -> Option<Ticket> {
        (self.latest > 0).then_some(Ticket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase() {
        let mut sequence = RequestSequence::new();
        let first = sequence.issue();
        let second = sequence.issue();
        assert!(second > first);
        assert_eq!(sequence.latest(), Some(second));
    }

    #[test]
    fn test_only_latest_is_current() {
        let mut sequence = RequestSequence::new();
        let first = sequence.issue();
        assert!(sequence.is_current(first));

        let second = sequence.issue();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }

    #[test]
    fn test_fresh_sequence_has_no_latest() {
        assert!(RequestSequence::new().latest().is_none());
    }

    #[test]
    fn test_ticket_display() {
        let mut sequence = RequestSequence::new();
        assert_eq!(sequence.issue().to_string(), "#1");
    }
}
