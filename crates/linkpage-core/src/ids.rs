//! Link id generation.

use std::fmt;

/// Source of fresh link ids.
///
/// Ids only need to be unique within one profile's lifetime.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    /// Produce an id that this generator has never returned before.
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `link-1`, `link-2`, ... for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `issued` ids were already handed out.
    pub fn starting_after(issued: u64) -> Self {
        Self { issued }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("link-{}", self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "link-1");
        assert_eq!(ids.next_id(), "link-2");

        let mut resumed = SequentialIds::starting_after(5);
        assert_eq!(resumed.next_id(), "link-6");
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let mut ids = UuidIds;
        let seen: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 100);
    }
}
