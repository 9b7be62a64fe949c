/// Last-writer-wins ordering for background renders
///
/// Each render request takes a ticket. When results come back out of order,
/// only the one holding the most recently issued ticket is displayed.

#[derive(Debug, Default)]
pub struct RenderSequence {
    latest: u64,
}

impl RenderSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a new render request; supersedes every earlier ticket
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether a finished render reflects the latest request
    pub fn accept(&self, ticket: u64) -> bool {
        ticket == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_accepted() {
        let mut seq = RenderSequence::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(first < second);
        assert!(!seq.accept(first));
        assert!(seq.accept(second));
    }

    #[test]
    fn test_stale_result_after_newer_request() {
        let mut seq = RenderSequence::new();
        let t1 = seq.issue();
        assert!(seq.accept(t1));

        // A newer request invalidates t1 even though it already completed once
        let t2 = seq.issue();
        assert!(!seq.accept(t1));
        assert!(seq.accept(t2));
        assert_eq!(seq.latest(), t2);
    }

    #[test]
    fn test_fresh_sequence_rejects_unissued() {
        let seq = RenderSequence::new();
        assert!(!seq.accept(1));
    }
}
