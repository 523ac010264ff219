use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Produces request correlation tokens.
///
/// A token is the current time in microseconds followed by a sequence number,
/// so tokens taken in a tight loop stay distinct even when the clock does not
/// advance between reads.
#[derive(Debug, Default)]
pub struct RequestIdClock {
    sequence: AtomicU64,
}

impl RequestIdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}.{seq:06}", Utc::now().timestamp_micros())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tokens_are_distinct_in_a_tight_loop() {
        let clock = RequestIdClock::new();
        let tokens: HashSet<String> = (0..1000).map(|_| clock.next()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
