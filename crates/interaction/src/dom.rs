use std::cell::RefCell;
use std::rc::Rc;

use runtime::ListenerKey;
use scene::{DomListener, ElementId, EventTarget, TargetSource};
use tracing::debug;

/// Where a [`DomEventBinder`]'s listener currently lives.
#[derive(Debug, Clone, PartialEq)]
pub enum BindState<T> {
    Unbound,
    BoundTo { target: T, key: ListenerKey },
}

struct DomBinding<M: TargetSource> {
    map: M,
    event: String,
    handler: DomListener,
    state: BindState<M::Target>,
}

impl<M: TargetSource> DomBinding<M> {
    fn unbind(&mut self) {
        if let BindState::BoundTo { target, key } =
            std::mem::replace(&mut self.state, BindState::Unbound)
        {
            target.remove_listener(&self.event, key);
            debug!(target = target.element_id().0, event = %self.event, "dom listener unbound");
        }
    }

    fn rebind(&mut self) {
        self.unbind();
        let Some(target) = self.map.target() else {
            debug!(event = %self.event, "map has no target yet; dom listener unbound");
            return;
        };
        let key = target.add_listener(&self.event, Rc::clone(&self.handler));
        debug!(target = target.element_id().0, event = %self.event, "dom listener bound");
        self.state = BindState::BoundTo { target, key };
    }
}

/// Keeps one DOM listener on whatever element the map currently renders into.
///
/// States: `Unbound` (no target yet, or after unmount) and `BoundTo(target)`.
/// The map's target-change notification moves the listener to the new
/// element. `unmount` is terminal.
pub struct DomEventBinder<M: TargetSource> {
    binding: Rc<RefCell<DomBinding<M>>>,
    target_change: Option<ListenerKey>,
}

impl<M> DomEventBinder<M>
where
    M: TargetSource + Clone + 'static,
{
    pub fn mount(map: &M, event: &str, handler: DomListener) -> Self {
        let binding = Rc::new(RefCell::new(DomBinding {
            map: map.clone(),
            event: event.to_string(),
            handler,
            state: BindState::Unbound,
        }));
        binding.borrow_mut().rebind();

        let weak = Rc::downgrade(&binding);
        let target_change = map.on_target_change(Rc::new(move || {
            if let Some(binding) = weak.upgrade() {
                binding.borrow_mut().rebind();
            }
        }));

        Self {
            binding,
            target_change: Some(target_change),
        }
    }
}

impl<M: TargetSource> DomEventBinder<M> {
    pub fn unmount(&mut self) {
        let mut binding = self.binding.borrow_mut();
        if let Some(key) = self.target_change.take() {
            binding.map.un_target_change(key);
        }
        binding.unbind();
    }

    pub fn bound_target(&self) -> Option<ElementId> {
        match &self.binding.borrow().state {
            BindState::BoundTo { target, .. } => Some(target.element_id()),
            BindState::Unbound => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.target_change.is_some()
    }
}

impl<M: TargetSource> Drop for DomEventBinder<M> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<M: TargetSource> std::fmt::Debug for DomEventBinder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let binding = self.binding.borrow();
        let target = match &binding.state {
            BindState::BoundTo { target, .. } => Some(target.element_id()),
            BindState::Unbound => None,
        };
        f.debug_struct("DomEventBinder")
            .field("event", &binding.event)
            .field("target", &target)
            .field("mounted", &self.target_change.is_some())
            .finish()
    }
}
