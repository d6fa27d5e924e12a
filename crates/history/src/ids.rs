use uuid::Uuid;

/// Supplies the unique ids assigned to history entries. Collision-freedom
/// across rapid successive appends is the implementor's contract; a plain
/// timestamp is not enough.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs; the production generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic counter-based ids for tests and fixtures.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("entry-{:04}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_distinct_and_ordered() {
        let mut ids = SequentialIdGenerator::default();
        assert_eq!(ids.next_id(), "entry-0001");
        assert_eq!(ids.next_id(), "entry-0002");
    }

    #[test]
    fn uuid_ids_do_not_collide_in_a_burst() {
        let mut ids = UuidIdGenerator;
        let mut seen = std::collections::HashSet::new();
        for _ in 0..128 {
            assert!(seen.insert(ids.next_id()));
        }
    }
}
