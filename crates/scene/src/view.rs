use std::collections::BTreeSet;

use foundation::ids::IdAllocator;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// When `false`, rotation adjustments are ignored.
    pub enable_rotation: bool,
    /// A settled rotation within this many radians of north snaps to north.
    pub snap_tolerance_rad: f64,
    /// Viewport size in CSS pixels `[width, height]`.
    pub viewport_px: [f64; 2],
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            enable_rotation: true,
            snap_tolerance_rad: 0.0,
            viewport_px: [800.0, 600.0],
        }
    }
}

/// Proof of a held interaction lock. Returned by `begin_interaction`.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionToken(u64);

/// Camera rotation control used by gestures.
pub trait ViewControl {
    /// Acquires the interaction lock, cancelling any running settle animation.
    fn begin_interaction(&mut self) -> InteractionToken;
    /// Releases the lock. When the last lock is released the view settles
    /// over `duration_ms`. Unknown tokens are ignored.
    fn end_interaction(&mut self, token: InteractionToken, duration_ms: u32);
    /// Rotates by `delta_rad` without constraint resolution.
    fn adjust_rotation_internal(&mut self, delta_rad: f64);
    fn rotation_enabled(&self) -> bool;
    fn viewport_center_px(&self) -> Vec2;
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct SettleAnimation {
    from: f64,
    to: f64,
    elapsed_ms: f64,
    duration_ms: f64,
}

impl SettleAnimation {
    fn sample(&self) -> f64 {
        let t = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// In-memory camera state.
#[derive(Debug, Clone)]
pub struct View {
    options: ViewOptions,
    rotation: f64,
    held: BTreeSet<u64>,
    ids: IdAllocator,
    /// Last delta applied while interacting; carried into the settle animation.
    momentum: f64,
    animation: Option<SettleAnimation>,
}

impl View {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            rotation: 0.0,
            held: BTreeSet::new(),
            ids: IdAllocator::new(),
            momentum: 0.0,
            animation: None,
        }
    }

    pub fn options(&self) -> ViewOptions {
        self.options
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        self.options.enable_rotation = enabled;
    }

    pub fn set_viewport_size(&mut self, width_px: f64, height_px: f64) {
        self.options.viewport_px = [width_px.max(1.0), height_px.max(1.0)];
    }

    pub fn is_interacting(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Steps the settle animation. Returns `true` while it is still running.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let Some(mut animation) = self.animation.take() else {
            return false;
        };
        animation.elapsed_ms += dt_ms.max(0.0);
        self.rotation = animation.sample();
        if animation.finished() {
            self.rotation = animation.to;
            debug!(rotation = self.rotation, "view settled");
            return false;
        }
        self.animation = Some(animation);
        true
    }

    /// Resolved rotation target: residual momentum applied, then snapped to
    /// north when within tolerance.
    fn settle_target(&self) -> f64 {
        let target = self.rotation + self.momentum;
        let from_north = normalize_angle(target);
        if from_north.abs() <= self.options.snap_tolerance_rad {
            target - from_north
        } else {
            target
        }
    }
}

impl ViewControl for View {
    fn begin_interaction(&mut self) -> InteractionToken {
        if self.animation.take().is_some() {
            trace!(rotation = self.rotation, "settle animation cancelled");
        }
        self.momentum = 0.0;
        let id = self.ids.next_id();
        self.held.insert(id);
        InteractionToken(id)
    }

    fn end_interaction(&mut self, token: InteractionToken, duration_ms: u32) {
        if !self.held.remove(&token.0) {
            trace!(token = token.0, "end_interaction with unknown token");
            return;
        }
        if !self.held.is_empty() {
            return;
        }
        let to = self.settle_target();
        self.momentum = 0.0;
        if duration_ms == 0 || to == self.rotation {
            self.rotation = to;
            return;
        }
        self.animation = Some(SettleAnimation {
            from: self.rotation,
            to,
            elapsed_ms: 0.0,
            duration_ms: f64::from(duration_ms),
        });
    }

    fn adjust_rotation_internal(&mut self, delta_rad: f64) {
        if !self.options.enable_rotation {
            return;
        }
        self.rotation += delta_rad;
        self.momentum = delta_rad;
    }

    fn rotation_enabled(&self) -> bool {
        self.options.enable_rotation
    }

    fn viewport_center_px(&self) -> Vec2 {
        let [w, h] = self.options.viewport_px;
        Vec2::new(w / 2.0, h / 2.0)
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}
