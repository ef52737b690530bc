use scene::{InteractionToken, MapPointerEvent, ViewControl, normalize_angle};
use tracing::{debug, trace};

use crate::config::DragRotateConfig;

/// State held between drag-start and drag-end.
#[derive(Debug)]
struct InteractionSession {
    /// Pointer angle of the last accepted sample (radians).
    last_angle: Option<f64>,
    token: InteractionToken,
}

/// Rotates the view by dragging with a specific button combination.
///
/// The view turns by the change in the pointer's angle around the viewport
/// center, so the map follows the pointer like a grabbed disc. Driven by the
/// engine's gesture dispatch (down, drag, up), not by UI lifecycle.
#[derive(Debug)]
pub struct DragRotateInteraction {
    config: DragRotateConfig,
    session: Option<InteractionSession>,
}

impl DragRotateInteraction {
    pub fn new(config: DragRotateConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> DragRotateConfig {
        self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Drag start. Takes the view's interaction lock. Returns `true` to
    /// claim the drag sequence.
    pub fn handle_down_event<V: ViewControl + ?Sized>(
        &mut self,
        view: &mut V,
        _event: &MapPointerEvent,
    ) -> bool {
        if self.session.is_some() {
            return true;
        }
        let token = view.begin_interaction();
        self.session = Some(InteractionSession {
            last_angle: None,
            token,
        });
        debug!("drag-rotate started");
        true
    }

    /// One drag sample. Returns the rotation delta applied to the view, if any.
    ///
    /// Samples whose `buttons` differ from the configured mask belong to some
    /// other gesture and are ignored, as are all samples while rotation is
    /// disabled on the view. The first accepted sample only records the
    /// baseline angle. The angle change is wrapped into `(-PI, PI]` before it
    /// is applied, so the delta is the shortest turn between samples.
    pub fn handle_drag_event<V: ViewControl + ?Sized>(
        &mut self,
        view: &mut V,
        event: &MapPointerEvent,
    ) -> Option<f64> {
        let session = self.session.as_mut()?;
        if event.buttons != self.config.required_buttons {
            trace!(buttons = event.buttons, "drag-rotate: other buttons, sample ignored");
            return None;
        }
        if !view.rotation_enabled() {
            return None;
        }

        let center = view.viewport_center_px();
        // Screen y grows downwards; flip it so angles are counter-clockwise.
        let angle = (center.y - event.pixel.y).atan2(event.pixel.x - center.x);
        let applied = session.last_angle.map(|last| {
            // Shortest turn, so crossing the +/-PI seam does not spin the map.
            let delta = normalize_angle(angle - last);
            view.adjust_rotation_internal(-delta);
            -delta
        });
        session.last_angle = Some(angle);
        trace!(angle, ?applied, "drag-rotate sample");
        applied
    }

    /// Drag end. Releases the lock and lets the view settle over the
    /// configured duration. Returns `false`: the gesture ends here.
    pub fn handle_up_event<V: ViewControl + ?Sized>(
        &mut self,
        view: &mut V,
        _event: &MapPointerEvent,
    ) -> bool {
        if let Some(session) = self.session.take() {
            view.end_interaction(session.token, self.config.inertia_duration_ms);
            debug!(duration_ms = self.config.inertia_duration_ms, "drag-rotate ended");
        }
        false
    }
}

impl Default for DragRotateInteraction {
    fn default() -> Self {
        Self::new(DragRotateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use foundation::math::Vec2;
    use scene::{
        InteractionToken, MapPointerEvent, PointerEventType, View, ViewControl, ViewOptions,
        buttons,
    };

    use super::DragRotateInteraction;
    use crate::config::DragRotateConfig;

    /// View double that records every call.
    struct RecordingView {
        inner: View,
        begins: u32,
        ends: Vec<u32>,
        deltas: Vec<f64>,
    }

    impl RecordingView {
        fn new(enable_rotation: bool) -> Self {
            Self {
                inner: View::new(ViewOptions {
                    enable_rotation,
                    viewport_px: [800.0, 600.0],
                    ..ViewOptions::default()
                }),
                begins: 0,
                ends: Vec::new(),
                deltas: Vec::new(),
            }
        }
    }

    impl ViewControl for RecordingView {
        fn begin_interaction(&mut self) -> InteractionToken {
            self.begins += 1;
            self.inner.begin_interaction()
        }

        fn end_interaction(&mut self, token: InteractionToken, duration_ms: u32) {
            self.ends.push(duration_ms);
            self.inner.end_interaction(token, duration_ms);
        }

        fn adjust_rotation_internal(&mut self, delta_rad: f64) {
            self.deltas.push(delta_rad);
            self.inner.adjust_rotation_internal(delta_rad);
        }

        fn rotation_enabled(&self) -> bool {
            self.inner.rotation_enabled()
        }

        fn viewport_center_px(&self) -> Vec2 {
            self.inner.viewport_center_px()
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    /// Drag sample at `deg` degrees (counter-clockwise from east) around the
    /// 800x600 viewport center.
    fn sample_at(deg: f64, buttons: u16) -> MapPointerEvent {
        let r = 100.0;
        let pixel = Vec2::new(
            400.0 + r * deg.to_radians().cos(),
            300.0 - r * deg.to_radians().sin(),
        );
        MapPointerEvent::new(PointerEventType::PointerDrag, pixel, Vec2::ZERO).with_buttons(buttons)
    }

    fn down() -> MapPointerEvent {
        MapPointerEvent::new(PointerEventType::PointerDown, Vec2::new(500.0, 300.0), Vec2::ZERO)
    }

    fn up() -> MapPointerEvent {
        MapPointerEvent::new(PointerEventType::PointerUp, Vec2::new(400.0, 200.0), Vec2::ZERO)
    }

    #[test]
    fn rotation_follows_angular_position() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::default();
        assert!(drag.handle_down_event(&mut view, &down()));

        assert_eq!(drag.handle_drag_event(&mut view, &sample_at(0.0, buttons::SECONDARY)), None);
        drag.handle_drag_event(&mut view, &sample_at(30.0, buttons::SECONDARY));
        drag.handle_drag_event(&mut view, &sample_at(90.0, buttons::SECONDARY));

        assert_eq!(view.deltas.len(), 2);
        assert_close(view.deltas[0], -30f64.to_radians());
        assert_close(view.deltas[1], -60f64.to_radians());
        assert_close(view.inner.rotation(), -90f64.to_radians());
    }

    #[test]
    fn empty_drag_still_locks_and_unlocks_once() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::default();
        drag.handle_down_event(&mut view, &down());
        assert!(!drag.handle_up_event(&mut view, &up()));

        assert_eq!(view.begins, 1);
        assert_eq!(view.ends, vec![250]);
        assert!(view.deltas.is_empty());
        assert!(!view.inner.is_interacting());
        assert!(!drag.is_active());
    }

    #[test]
    fn other_button_samples_are_ignored_without_moving_the_baseline() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::default();
        drag.handle_down_event(&mut view, &down());

        drag.handle_drag_event(&mut view, &sample_at(0.0, buttons::SECONDARY));
        drag.handle_drag_event(&mut view, &sample_at(170.0, buttons::PRIMARY));
        drag.handle_drag_event(&mut view, &sample_at(
            45.0,
            buttons::PRIMARY | buttons::SECONDARY,
        ));
        drag.handle_drag_event(&mut view, &sample_at(20.0, buttons::SECONDARY));

        assert_eq!(view.deltas.len(), 1);
        assert_close(view.deltas[0], -20f64.to_radians());
    }

    #[test]
    fn disabled_rotation_skips_samples_entirely() {
        let mut view = RecordingView::new(false);
        let mut drag = DragRotateInteraction::default();
        drag.handle_down_event(&mut view, &down());
        for deg in [0.0, 30.0, 60.0] {
            assert_eq!(drag.handle_drag_event(&mut view, &sample_at(deg, buttons::SECONDARY)), None);
        }
        drag.handle_up_event(&mut view, &up());

        assert!(view.deltas.is_empty());
        assert_eq!(view.begins, 1);
        assert_eq!(view.ends.len(), 1);
    }

    #[test]
    fn crossing_the_seam_takes_the_short_way() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::default();
        drag.handle_down_event(&mut view, &down());
        drag.handle_drag_event(&mut view, &sample_at(175.0, buttons::SECONDARY));
        drag.handle_drag_event(&mut view, &sample_at(-175.0, buttons::SECONDARY));

        assert_close(view.deltas[0], -10f64.to_radians());
    }

    #[test]
    fn samples_outside_a_session_are_ignored() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::default();
        assert_eq!(drag.handle_drag_event(&mut view, &sample_at(0.0, buttons::SECONDARY)), None);
        assert!(!drag.handle_up_event(&mut view, &up()));
        assert_eq!(view.begins, 0);
        assert!(view.ends.is_empty());
    }

    #[test]
    fn each_drag_starts_from_a_fresh_baseline() {
        let mut view = RecordingView::new(true);
        let mut drag = DragRotateInteraction::new(DragRotateConfig {
            required_buttons: buttons::AUXILIARY,
            inertia_duration_ms: 0,
        });
        drag.handle_down_event(&mut view, &down());
        drag.handle_drag_event(&mut view, &sample_at(0.0, buttons::AUXILIARY));
        drag.handle_drag_event(&mut view, &sample_at(10.0, buttons::AUXILIARY));
        drag.handle_up_event(&mut view, &up());

        drag.handle_down_event(&mut view, &down());
        drag.handle_drag_event(&mut view, &sample_at(90.0, buttons::AUXILIARY));
        drag.handle_up_event(&mut view, &up());

        assert_eq!(view.deltas.len(), 1);
        assert_eq!(view.ends, vec![0, 0]);
    }
}
