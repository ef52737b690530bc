use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::LonLat;
use runtime::ListenerKey;
use scene::{MapId, MapPointerEvent, PointerEventType, PointerListener, PointerSource};
use tracing::debug;

/// Pointer event with the geographic position under the pointer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPointerEvent {
    pub lon_lat: LonLat,
    /// The engine event as delivered, for consumers that need pixels.
    pub raw: MapPointerEvent,
}

pub type GeoPointerCallback = Rc<dyn Fn(&GeoPointerEvent)>;

struct PointerBinding<M> {
    map: M,
    kind: PointerEventType,
    key: ListenerKey,
}

/// Delivers geographic pointer events from one map to one UI callback.
///
/// Exactly one engine listener is live per binder. It is registered once per
/// `(map, kind)` and removed with the key that registration returned. The
/// callback itself sits in a slot the listener reads on every event, so a new
/// callback does not require resubscribing.
pub struct PointerInteractionBinder<M: PointerSource + Clone> {
    callback: Rc<RefCell<GeoPointerCallback>>,
    binding: Option<PointerBinding<M>>,
}

impl<M: PointerSource + Clone> std::fmt::Debug for PointerInteractionBinder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerInteractionBinder")
            .field("binding", &self.binding())
            .finish_non_exhaustive()
    }
}

impl<M: PointerSource + Clone> PointerInteractionBinder<M> {
    /// `map` may be absent while the UI tree has no map yet.
    pub fn mount(map: Option<&M>, kind: PointerEventType, callback: GeoPointerCallback) -> Self {
        let mut binder = Self {
            callback: Rc::new(RefCell::new(callback)),
            binding: None,
        };
        if let Some(map) = map {
            binder.bind(map, kind);
        }
        binder
    }

    /// Follows new props. Rebinds only when the map instance or event type
    /// changed: the old listener is removed first, with its original key.
    pub fn update(&mut self, map: Option<&M>, kind: PointerEventType, callback: GeoPointerCallback) {
        *self.callback.borrow_mut() = callback;

        let wanted = map.map(|m| (m.map_id(), kind));
        if self.binding() == wanted {
            return;
        }
        self.unbind();
        if let Some(map) = map {
            self.bind(map, kind);
        }
    }

    pub fn unmount(&mut self) {
        self.unbind();
    }

    /// `(map, kind)` of the live listener, if any.
    pub fn binding(&self) -> Option<(MapId, PointerEventType)> {
        self.binding.as_ref().map(|b| (b.map.map_id(), b.kind))
    }

    fn bind(&mut self, map: &M, kind: PointerEventType) {
        let projection = map.projection();
        let slot = Rc::clone(&self.callback);
        let listener: PointerListener = Rc::new(move |event: &MapPointerEvent| {
            let geo = GeoPointerEvent {
                lon_lat: projection.inverse(event.coordinate),
                raw: *event,
            };
            // Release the slot before calling out; the callback may re-render.
            let callback = Rc::clone(&slot.borrow());
            callback(&geo);
        });
        let key = map.on(kind, listener);
        debug!(map = map.map_id().0, ?kind, "pointer listener bound");
        self.binding = Some(PointerBinding {
            map: map.clone(),
            kind,
            key,
        });
    }

    fn unbind(&mut self) {
        let Some(binding) = self.binding.take() else {
            return;
        };
        let removed = binding.map.un(binding.kind, binding.key);
        debug!(
            map = binding.map.map_id().0,
            kind = ?binding.kind,
            removed,
            "pointer listener unbound"
        );
    }
}

impl<M: PointerSource + Clone> Drop for PointerInteractionBinder<M> {
    fn drop(&mut self) {
        self.unbind();
    }
}
