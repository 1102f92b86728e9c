//! Id Generation
//!
//! Every folder, drawer item and piece of nested content carries an opaque
//! string id. Ids are generated client-side and must not collide.

use std::cell::Cell;

/// Source of fresh unique ids
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in simple (hyphenless) form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, for tests and fixtures
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_unique() {
        let ids = UuidIds;
        let set: HashSet<String> = (0..500).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 500);
        assert!(set.iter().all(|id| id.len() == 32 && !id.contains('-')));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("f");
        assert_eq!(ids.next_id(), "f-1");
        assert_eq!(ids.next_id(), "f-2");
    }
}
