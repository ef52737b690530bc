use foundation::handles::Handle;
use foundation::ids::next_instance_id;

/// Subscription handle returned by [`Listeners::add`].
///
/// A key is only meaningful to the registry that issued it. Removing with a
/// key from another registry, or with a key whose slot has since been reused,
/// is a no-op.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    registry: u64,
    handle: Handle,
}

impl ListenerKey {
    pub fn handle(&self) -> Handle {
        self.handle
    }
}

#[derive(Debug)]
struct Slot<L> {
    generation: u32,
    listener: Option<L>,
}

/// Ordered listener registry keyed by subscription handle.
///
/// Ordering contract:
/// - `snapshot()` yields listeners in subscription order.
/// - A slot freed by `remove` may be reused; its generation is bumped so the
///   old key stays dead.
#[derive(Debug)]
pub struct Listeners<L> {
    id: u64,
    slots: Vec<Slot<L>>,
    free: Vec<u32>,
    order: Vec<u32>,
}

impl<L> Default for Listeners<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Listeners<L> {
    pub fn new() -> Self {
        Self {
            id: next_instance_id(),
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: L) -> ListenerKey {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].listener = Some(listener);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    listener: Some(listener),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.order.push(index);
        ListenerKey {
            registry: self.id,
            handle: Handle::new(index, self.slots[index as usize].generation),
        }
    }

    /// Returns `true` if a live listener was removed.
    pub fn remove(&mut self, key: ListenerKey) -> bool {
        if !self.contains(key) {
            return false;
        }
        let index = key.handle.index();
        let slot = &mut self.slots[index as usize];
        slot.listener = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.order.retain(|i| *i != index);
        true
    }

    pub fn contains(&self, key: ListenerKey) -> bool {
        if key.registry != self.id {
            return false;
        }
        self.slots
            .get(key.handle.index() as usize)
            .is_some_and(|s| s.generation == key.handle.generation() && s.listener.is_some())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        for index in self.order.drain(..) {
            let slot = &mut self.slots[index as usize];
            slot.listener = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index);
        }
    }
}

impl<L: Clone> Listeners<L> {
    /// Clones the live listeners in subscription order.
    ///
    /// Dispatchers call this and release any borrow on the owner before
    /// invoking, so a listener may subscribe or unsubscribe re-entrantly.
    pub fn snapshot(&self) -> Vec<L> {
        self.order
            .iter()
            .filter_map(|i| self.slots[*i as usize].listener.clone())
            .collect()
    }

    /// Like [`snapshot`](Self::snapshot), paired with each listener's key.
    ///
    /// Dispatchers re-check [`contains`](Self::contains) before each call so
    /// a listener removed earlier in the same dispatch does not run.
    pub fn entries(&self) -> Vec<(ListenerKey, L)> {
        self.order
            .iter()
            .filter_map(|i| {
                let slot = &self.slots[*i as usize];
                let key = ListenerKey {
                    registry: self.id,
                    handle: Handle::new(*i, slot.generation),
                };
                slot.listener.clone().map(|l| (key, l))
            })
            .collect()
    }
}
