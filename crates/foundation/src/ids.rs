use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id source.
///
/// Ids are never reused within one allocator, so identity comparisons on them
/// stay meaningful for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique id for long-lived engine instances (maps, DOM elements).
pub fn next_instance_id() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::{IdAllocator, next_instance_id};

    #[test]
    fn allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn instance_ids_are_unique() {
        let a = next_instance_id();
        let b = next_instance_id();
        assert_ne!(a, b);
    }
}
