use crate::models::Conversation;

pub fn compute_unread_count(conversations: &[Conversation]) -> usize {
    conversations
        .iter()
        .filter(|c| !c.is_archived() && !c.read())
        .count()
}

/// Remembers the last pushed unread count so the badge only moves when the
/// count does.
#[derive(Debug, Default)]
pub struct BadgeTracker {
    last: Option<usize>,
}

impl BadgeTracker {
    /// Returns the count to push, or `None` when it did not change.
    pub fn update(&mut self, conversations: &[Conversation]) -> Option<usize> {
        let count = compute_unread_count(conversations);
        if self.last == Some(count) {
            return None;
        }
        self.last = Some(count);
        Some(count)
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_count_skips_archived() {
        let conversations = vec![
            Conversation::new(1).with_read(false),
            Conversation::new(2).with_read(false).with_archived(true),
            Conversation::new(3),
        ];
        assert_eq!(compute_unread_count(&conversations), 1);
        assert_eq!(compute_unread_count(&[]), 0);
    }

    #[test]
    fn test_tracker_pushes_changes_only() {
        let mut tracker = BadgeTracker::default();
        assert_eq!(tracker.update(&[]), Some(0));
        assert_eq!(tracker.update(&[]), None);

        let unread = vec![Conversation::new(1).with_read(false)];
        assert_eq!(tracker.update(&unread), Some(1));
        assert_eq!(tracker.update(&unread), None);
        assert_eq!(tracker.last(), Some(1));
    }
}
