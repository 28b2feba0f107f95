//! Pan/zoom viewport
//!
//! Owns the `{scale, tx, ty}` transform applied to the board content layer:
//!
//! ```text
//! screen = content * scale + (tx, ty)      (relative to the viewport's top-left)
//! ```
//!
//! # Inputs
//! - Wheel zoom, only with ctrl/meta/shift held so plain scrolling is left alone
//! - Pointer drag pan
//! - External commands from the event bus (`board:control`, `board:focus`)
//!
//! The transform has a single owner. Other components send commands through
//! the bus and never write the transform directly.

use agrolink_types::{BoardEvent, ControlKind, FocusRequest};
use egui::{Modifiers, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Scale restored by `reset`
    pub initial_scale: f32,
    /// Factor applied by `zoomIn` / `zoomOut`
    pub zoom_step: f32,
    /// `k` in `exp(-deltaY * k)`
    pub wheel_sensitivity: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 3.0,
            initial_scale: 1.0,
            zoom_step: 1.2,
            wheel_sensitivity: 0.0015,
        }
    }
}

impl ViewportConfig {
    /// Repair inverted or non-positive bounds instead of failing.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };

        let mut min_scale = positive(self.min_scale, defaults.min_scale);
        let mut max_scale = positive(self.max_scale, defaults.max_scale);
        if min_scale > max_scale {
            std::mem::swap(&mut min_scale, &mut max_scale);
        }

        Self {
            min_scale,
            max_scale,
            initial_scale: positive(self.initial_scale, defaults.initial_scale)
                .clamp(min_scale, max_scale),
            zoom_step: positive(self.zoom_step, defaults.zoom_step).max(1.0),
            wheel_sensitivity: positive(self.wheel_sensitivity, defaults.wheel_sensitivity),
        }
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Translate + uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl ViewTransform {
    pub fn new(scale: f32, tx: f32, ty: f32) -> Self {
        Self { scale, tx, ty }
    }

    /// Content-space point → viewport-relative screen point.
    pub fn to_screen(&self, content: Pos2) -> Pos2 {
        Pos2::new(
            content.x * self.scale + self.tx,
            content.y * self.scale + self.ty,
        )
    }

    /// Viewport-relative screen point → content-space point.
    pub fn to_content(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.tx) / self.scale,
            (screen.y - self.ty) / self.scale,
        )
    }

    pub fn rect_to_screen(&self, content: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(content.min), self.to_screen(content.max))
    }

    pub fn rect_to_content(&self, screen: Rect) -> Rect {
        Rect::from_min_max(self.to_content(screen.min), self.to_content(screen.max))
    }
}

// =============================================================================
// VIEWPORT
// =============================================================================

/// Pan/zoom state for the board canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    transform: ViewTransform,
    /// Viewport size in screen pixels
    size: Vec2,
    /// Last pointer position while dragging
    drag_last: Option<Pos2>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            transform: ViewTransform::new(config.initial_scale, 0.0, 0.0),
            size: Vec2::new(800.0, 600.0),
            drag_last: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Call when the hosting rect changes.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = Vec2::new(size.x.max(0.0), size.y.max(0.0));
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_finite() {
            scale.clamp(self.config.min_scale, self.config.max_scale)
        } else {
            self.transform.scale
        }
    }

    fn center(&self) -> Pos2 {
        Pos2::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    // =========================================================================
    // ZOOM
    // =========================================================================

    /// Set a new scale keeping `anchor` (viewport-relative) fixed on screen.
    ///
    /// `tx' = cx - k * (cx - tx)` with `k = new / old`.
    pub fn zoom_to_at(&mut self, scale: f32, anchor: Pos2) {
        let old = self.transform.scale;
        let new = self.clamp_scale(scale);
        if old <= 0.0 || (new - old).abs() <= f32::EPSILON {
            return;
        }
        let k = new / old;
        self.transform = ViewTransform {
            scale: new,
            tx: anchor.x - k * (anchor.x - self.transform.tx),
            ty: anchor.y - k * (anchor.y - self.transform.ty),
        };
    }

    /// Multiply the scale by `factor` around `anchor`.
    pub fn zoom_by_at(&mut self, factor: f32, anchor: Pos2) {
        self.zoom_to_at(self.transform.scale * factor, anchor);
    }

    /// Wheel zoom with DOM-style `delta_y` (positive = away from content).
    ///
    /// Returns `false` and leaves the transform alone when no zoom modifier is
    /// held, so the caller can let the event scroll normally.
    pub fn wheel(&mut self, delta_y: f32, cursor: Pos2, modifiers: Modifiers) -> bool {
        if !(modifiers.ctrl || modifiers.command || modifiers.mac_cmd || modifiers.shift) {
            return false;
        }
        if !delta_y.is_finite() || delta_y == 0.0 {
            return true;
        }
        let factor = (-delta_y * self.config.wheel_sensitivity).exp();
        self.zoom_by_at(factor, cursor);
        true
    }

    // =========================================================================
    // PAN
    // =========================================================================

    /// Translate by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        self.transform.tx += delta.x;
        self.transform.ty += delta.y;
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        self.drag_last = Some(pos);
    }

    /// Accumulate the delta since the last pointer position.
    pub fn pointer_move(&mut self, pos: Pos2) {
        if let Some(last) = self.drag_last {
            self.pan_by(pos - last);
            self.drag_last = Some(pos);
        }
    }

    /// Pointer released or left the viewport.
    pub fn pointer_up(&mut self) {
        self.drag_last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_last.is_some()
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// `zoomIn` / `zoomOut` around the viewport center, or `reset`.
    pub fn control(&mut self, kind: ControlKind) {
        match kind {
            ControlKind::ZoomIn => self.zoom_by_at(self.config.zoom_step, self.center()),
            ControlKind::ZoomOut => self.zoom_by_at(1.0 / self.config.zoom_step, self.center()),
            ControlKind::Reset => {
                self.transform = ViewTransform::new(self.config.initial_scale, 0.0, 0.0);
            }
        }
    }

    /// Center the viewport on a content-space point.
    pub fn focus(&mut self, request: FocusRequest) {
        if !request.x.is_finite() || !request.y.is_finite() {
            return;
        }
        let scale = request
            .scale
            .map(|s| self.clamp_scale(s))
            .unwrap_or(self.transform.scale);
        let center = self.center();
        self.transform = ViewTransform {
            scale,
            tx: center.x - request.x * scale,
            ty: center.y - request.y * scale,
        };
    }

    /// Focus request that shows all of `content` at the largest fitting scale.
    pub fn fit_request(&self, content: Rect, padding: f32) -> Option<FocusRequest> {
        if content.is_negative() || content.width() < 1.0 || content.height() < 1.0 {
            return None;
        }
        let avail = self.size - Vec2::splat(padding * 2.0);
        if avail.x <= 0.0 || avail.y <= 0.0 {
            return None;
        }
        let scale = (avail.x / content.width()).min(avail.y / content.height());
        let center = content.center();
        Some(FocusRequest::new(center.x, center.y).with_scale(self.clamp_scale(scale)))
    }

    /// Apply a bus event. Returns `true` if the viewport consumed it.
    pub fn handle(&mut self, event: &BoardEvent) -> bool {
        match event {
            BoardEvent::Control(kind) => {
                self.control(*kind);
                true
            }
            BoardEvent::Focus(request) => {
                self.focus(*request);
                true
            }
            BoardEvent::GotoShelf { .. } => false,
        }
    }

    /// Visible content-space rectangle.
    pub fn visible_content(&self) -> Rect {
        self.transform
            .rect_to_content(Rect::from_min_size(Pos2::ZERO, self.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    fn viewport(size: Vec2) -> Viewport {
        let mut vp = Viewport::default();
        vp.set_size(size);
        vp
    }

    #[test]
    fn wheel_without_modifier_is_ignored() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        assert!(!vp.wheel(-120.0, Pos2::new(10.0, 10.0), Modifiers::default()));
        assert_eq!(vp.transform(), ViewTransform::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        assert!(vp.wheel(-100.0, Pos2::new(400.0, 300.0), ctrl()));
        assert!(vp.scale() > 1.0);
        assert!((vp.scale() - 0.15_f32.exp()).abs() < EPS);

        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert!(vp.wheel(400.0, Pos2::new(400.0, 300.0), shift));
        assert!(vp.scale() < 1.0);
    }

    #[test]
    fn control_commands() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        vp.control(ControlKind::ZoomIn);
        assert!((vp.scale() - 1.2).abs() < EPS);
        // center stays put
        let c = vp.transform().to_content(Pos2::new(400.0, 300.0));
        assert!((c.x - 400.0).abs() < EPS && (c.y - 300.0).abs() < EPS);

        vp.control(ControlKind::ZoomOut);
        assert!((vp.scale() - 1.0).abs() < EPS);

        vp.pan_by(Vec2::new(30.0, -12.0));
        vp.control(ControlKind::Reset);
        assert_eq!(vp.transform(), ViewTransform::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn focus_centers_point() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        vp.focus(FocusRequest::new(100.0, 50.0).with_scale(1.2));

        assert!((vp.scale() - 1.2).abs() < EPS);
        let on_screen = vp.transform().to_screen(Pos2::new(100.0, 50.0));
        assert!((on_screen.x - 400.0).abs() < EPS);
        assert!((on_screen.y - 300.0).abs() < EPS);
    }

    #[test]
    fn focus_without_scale_keeps_scale() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        vp.control(ControlKind::ZoomIn);
        vp.focus(FocusRequest::new(10.0, 10.0));
        assert!((vp.scale() - 1.2).abs() < EPS);
    }

    #[test]
    fn drag_pans_until_release() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        vp.pointer_move(Pos2::new(50.0, 50.0));
        assert_eq!(vp.transform().tx, 0.0);

        vp.pointer_down(Pos2::new(10.0, 10.0));
        vp.pointer_move(Pos2::new(25.0, 5.0));
        vp.pointer_move(Pos2::new(30.0, 0.0));
        assert!(vp.is_dragging());
        assert_eq!((vp.transform().tx, vp.transform().ty), (20.0, -10.0));

        vp.pointer_up();
        vp.pointer_move(Pos2::new(300.0, 300.0));
        assert_eq!((vp.transform().tx, vp.transform().ty), (20.0, -10.0));
    }

    #[test]
    fn fit_request_contains_content() {
        let vp = viewport(Vec2::new(800.0, 600.0));
        let content = Rect::from_min_size(Pos2::ZERO, Vec2::new(1600.0, 600.0));
        let req = vp.fit_request(content, 0.0).unwrap();
        assert!((req.scale.unwrap() - 0.5).abs() < EPS);
        assert_eq!((req.x, req.y), (800.0, 300.0));

        assert!(vp.fit_request(Rect::NOTHING, 10.0).is_none());
    }

    #[test]
    fn sanitized_config_repairs_bounds() {
        let config = ViewportConfig {
            min_scale: 4.0,
            max_scale: 0.5,
            initial_scale: 10.0,
            zoom_step: 0.5,
            wheel_sensitivity: -1.0,
        }
        .sanitized();
        assert_eq!((config.min_scale, config.max_scale), (0.5, 4.0));
        assert_eq!(config.initial_scale, 4.0);
        assert_eq!(config.zoom_step, 1.0);
        assert_eq!(config.wheel_sensitivity, 0.0015);
    }

    #[test]
    fn gotoshelf_is_not_a_viewport_command() {
        let mut vp = viewport(Vec2::new(800.0, 600.0));
        let event = BoardEvent::GotoShelf {
            shelf_id: "1A1".into(),
        };
        assert!(!vp.handle(&event));
    }

    proptest! {
        #[test]
        fn zoom_commands_stay_in_bounds(
            requested in -10.0f32..50.0,
            steps in proptest::collection::vec(0u8..3, 0..30),
        ) {
            let mut vp = viewport(Vec2::new(640.0, 480.0));
            vp.focus(FocusRequest { x: 0.0, y: 0.0, scale: Some(requested.abs().max(0.01)) });
            for step in steps {
                let kind = match step {
                    0 => ControlKind::ZoomIn,
                    1 => ControlKind::ZoomOut,
                    _ => ControlKind::Reset,
                };
                vp.control(kind);
                vp.zoom_by_at(requested.abs() + 0.01, Pos2::new(12.0, 34.0));
                let s = vp.scale();
                prop_assert!(s >= vp.config().min_scale - EPS && s <= vp.config().max_scale + EPS);
            }
        }

        #[test]
        fn wheel_zoom_keeps_cursor_point_fixed(
            delta in -600.0f32..600.0,
            cx in 0.0f32..800.0,
            cy in 0.0f32..600.0,
            tx in -500.0f32..500.0,
            ty in -500.0f32..500.0,
            start in 0.5f32..2.5,
        ) {
            let mut vp = viewport(Vec2::new(800.0, 600.0));
            vp.focus(FocusRequest::new(0.0, 0.0).with_scale(start));
            vp.pan_by(Vec2::new(tx, ty) - Vec2::new(vp.transform().tx, vp.transform().ty));

            let cursor = Pos2::new(cx, cy);
            let before = vp.transform().to_content(cursor);
            vp.wheel(delta, cursor, ctrl());
            let after = vp.transform().to_screen(before);

            prop_assert!((after.x - cx).abs() < 0.05, "x drift {} vs {}", after.x, cx);
            prop_assert!((after.y - cy).abs() < 0.05, "y drift {} vs {}", after.y, cy);
        }

        #[test]
        fn pan_is_additive(
            dx1 in -300.0f32..300.0, dy1 in -300.0f32..300.0,
            dx2 in -300.0f32..300.0, dy2 in -300.0f32..300.0,
        ) {
            let mut stepwise = viewport(Vec2::new(800.0, 600.0));
            stepwise.pan_by(Vec2::new(dx1, dy1));
            stepwise.pan_by(Vec2::new(dx2, dy2));

            let mut reversed = viewport(Vec2::new(800.0, 600.0));
            reversed.pan_by(Vec2::new(dx2, dy2));
            reversed.pan_by(Vec2::new(dx1, dy1));

            let mut once = viewport(Vec2::new(800.0, 600.0));
            once.pan_by(Vec2::new(dx1 + dx2, dy1 + dy2));

            for vp in [&stepwise, &reversed] {
                prop_assert!((vp.transform().tx - once.transform().tx).abs() < EPS);
                prop_assert!((vp.transform().ty - once.transform().ty).abs() < EPS);
            }
        }
    }
}
