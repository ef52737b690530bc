use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use foundation::math::Projection;
use runtime::{ListenerKey, Listeners};
use tracing::debug;

use crate::dom::{DomElement, EventTarget, TargetListener, TargetSource};
use crate::map::MapScene;
use crate::pointer::{MapId, MapPointerEvent, PointerEventType, PointerListener, PointerSource};

/// Shared handle to one map instance.
///
/// Every dispatch releases the scene borrow before calling listeners, so a
/// listener may subscribe, unsubscribe or read the map while it runs.
#[derive(Debug, Clone)]
pub struct MapHandle(Rc<RefCell<MapScene>>);

impl MapHandle {
    pub fn new(scene: MapScene) -> Self {
        Self(Rc::new(RefCell::new(scene)))
    }

    pub fn scene(&self) -> Ref<'_, MapScene> {
        self.0.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, MapScene> {
        self.0.borrow_mut()
    }

    /// Delivers `event` to listeners of `event.kind`. Returns how many ran.
    ///
    /// A listener unsubscribed by an earlier one in the same dispatch is
    /// skipped.
    pub fn dispatch_pointer(&self, event: &MapPointerEvent) -> usize {
        let listeners = self
            .0
            .borrow()
            .pointer_listeners
            .get(&event.kind)
            .map(Listeners::entries)
            .unwrap_or_default();
        let mut ran = 0;
        for (key, listener) in listeners {
            let live = self
                .0
                .borrow()
                .pointer_listeners
                .get(&event.kind)
                .is_some_and(|l| l.contains(key));
            if !live {
                continue;
            }
            listener(event);
            ran += 1;
        }
        ran
    }

    pub fn pointer_listener_count(&self, kind: PointerEventType) -> usize {
        self.0
            .borrow()
            .pointer_listeners
            .get(&kind)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// Moves the map into `target` (or out of the DOM with `None`) and fires
    /// the target-change notification when the element actually changed.
    pub fn set_target(&self, target: Option<DomElement>) {
        let listeners = {
            let mut scene = self.0.borrow_mut();
            let old = scene.target.as_ref().map(EventTarget::element_id);
            let new = target.as_ref().map(EventTarget::element_id);
            if old == new {
                return;
            }
            debug!(map = scene.id().0, ?old, ?new, "map target changed");
            scene.target = target;
            scene.target_listeners.snapshot()
        };
        for listener in &listeners {
            listener();
        }
    }

    pub fn target_listener_count(&self) -> usize {
        self.0.borrow().target_listeners.len()
    }
}

impl PointerSource for MapHandle {
    fn map_id(&self) -> MapId {
        self.0.borrow().id()
    }

    fn projection(&self) -> Projection {
        self.0.borrow().projection()
    }

    fn on(&self, kind: PointerEventType, listener: PointerListener) -> ListenerKey {
        self.0
            .borrow_mut()
            .pointer_listeners
            .entry(kind)
            .or_default()
            .add(listener)
    }

    fn un(&self, kind: PointerEventType, key: ListenerKey) -> bool {
        self.0
            .borrow_mut()
            .pointer_listeners
            .get_mut(&kind)
            .is_some_and(|l| l.remove(key))
    }
}

impl TargetSource for MapHandle {
    type Target = DomElement;

    fn target(&self) -> Option<DomElement> {
        self.0.borrow().target.clone()
    }

    fn on_target_change(&self, listener: TargetListener) -> ListenerKey {
        self.0.borrow_mut().target_listeners.add(listener)
    }

    fn un_target_change(&self, key: ListenerKey) -> bool {
        self.0.borrow_mut().target_listeners.remove(key)
    }
}
