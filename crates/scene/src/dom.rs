use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::ids::next_instance_id;
use foundation::math::Vec2;
use runtime::{ListenerKey, Listeners};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub name: String,
    pub client_px: Vec2,
}

impl DomEvent {
    pub fn new(name: impl Into<String>, client_px: Vec2) -> Self {
        Self {
            name: name.into(),
            client_px,
        }
    }
}

pub type DomListener = Rc<dyn Fn(&DomEvent)>;
pub type TargetListener = Rc<dyn Fn()>;

/// Something DOM listeners can be attached to.
pub trait EventTarget: Clone {
    fn element_id(&self) -> ElementId;
    fn add_listener(&self, name: &str, listener: DomListener) -> ListenerKey;
    fn remove_listener(&self, name: &str, key: ListenerKey) -> bool;
}

/// A map's rendering target, which may change after construction.
pub trait TargetSource {
    type Target: EventTarget;

    /// `None` until the map has been placed into a container.
    fn target(&self) -> Option<Self::Target>;
    fn on_target_change(&self, listener: TargetListener) -> ListenerKey;
    fn un_target_change(&self, key: ListenerKey) -> bool;
}

struct ElementState {
    id: ElementId,
    tag: String,
    listeners: BTreeMap<String, Listeners<DomListener>>,
}

/// Shared in-memory DOM element.
#[derive(Clone)]
pub struct DomElement(Rc<RefCell<ElementState>>);

impl std::fmt::Debug for DomElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("DomElement")
            .field("id", &state.id)
            .field("tag", &state.tag)
            .finish_non_exhaustive()
    }
}

impl DomElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(ElementState {
            id: ElementId(next_instance_id()),
            tag: tag.into(),
            listeners: BTreeMap::new(),
        })))
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .get(name)
            .map(Listeners::len)
            .unwrap_or(0)
    }

    /// Invokes the listeners for `event.name`. Returns how many ran.
    pub fn dispatch(&self, event: &DomEvent) -> usize {
        let listeners = self
            .0
            .borrow()
            .listeners
            .get(&event.name)
            .map(Listeners::entries)
            .unwrap_or_default();
        let mut ran = 0;
        for (key, listener) in listeners {
            let live = self
                .0
                .borrow()
                .listeners
                .get(&event.name)
                .is_some_and(|l| l.contains(key));
            if live {
                listener(event);
                ran += 1;
            }
        }
        ran
    }
}

impl EventTarget for DomElement {
    fn element_id(&self) -> ElementId {
        self.0.borrow().id
    }

    fn add_listener(&self, name: &str, listener: DomListener) -> ListenerKey {
        self.0
            .borrow_mut()
            .listeners
            .entry(name.to_string())
            .or_default()
            .add(listener)
    }

    fn remove_listener(&self, name: &str, key: ListenerKey) -> bool {
        self.0
            .borrow_mut()
            .listeners
            .get_mut(name)
            .is_some_and(|l| l.remove(key))
    }
}
