use std::rc::Rc;

use foundation::math::{Projection, Vec2};
use runtime::ListenerKey;
use serde::{Deserialize, Serialize};

/// Identity of one map instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub u64);

/// `MouseEvent.buttons` bits.
pub mod buttons {
    pub const PRIMARY: u16 = 1;
    pub const SECONDARY: u16 = 2;
    pub const AUXILIARY: u16 = 4;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventType {
    Click,
    SingleClick,
    DblClick,
    PointerMove,
    PointerDrag,
    PointerDown,
    PointerUp,
}

/// Pointer event as the engine delivers it: screen pixel plus the projected
/// coordinate under it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapPointerEvent {
    pub kind: PointerEventType,
    pub pixel: Vec2,
    pub coordinate: Vec2,
    /// Pressed-button bitmask, see [`buttons`].
    pub buttons: u16,
    pub dragging: bool,
}

impl MapPointerEvent {
    pub fn new(kind: PointerEventType, pixel: Vec2, coordinate: Vec2) -> Self {
        Self {
            kind,
            pixel,
            coordinate,
            buttons: 0,
            dragging: kind == PointerEventType::PointerDrag,
        }
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }
}

pub type PointerListener = Rc<dyn Fn(&MapPointerEvent)>;

/// Pointer-event bus of one map instance.
///
/// `on` returns the key `un` needs; there is no reference matching.
pub trait PointerSource {
    fn map_id(&self) -> MapId;
    fn projection(&self) -> Projection;
    fn on(&self, kind: PointerEventType, listener: PointerListener) -> ListenerKey;
    /// Returns `true` if a live listener was removed.
    fn un(&self, kind: PointerEventType, key: ListenerKey) -> bool;
}
