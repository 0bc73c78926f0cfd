//! Pixel layout of the overview overlay, derived from the window size.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::coords::PanelRect;
use super::gesture::PointerTarget;

// =============================================================================
// Constants
// =============================================================================

pub const OVERLAY_WIDTH_FRACTION: f32 = 0.9;
pub const OVERLAY_HEIGHT_FRACTION: f32 = 0.85;
pub const OVERLAY_MAX_SIZE: Vec2 = Vec2::new(1200.0, 800.0);

pub const HEADER_HEIGHT: f32 = 44.0;
pub const TOOLBAR_HEIGHT: f32 = 40.0;
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const PADDING: f32 = 10.0;
pub const MINIMAP_SIZE: Vec2 = Vec2::new(240.0, 150.0);
pub const SLIDER_LEFT: f32 = 190.0;
pub const SLIDER_SIZE: Vec2 = Vec2::new(180.0, 14.0);

/// Named rectangles of the overlay that UI nodes are pinned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OverlayRegion {
    Overlay,
    Header,
    Toolbar,
    Slider,
    Map,
    Minimap,
    Sidebar,
}

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct OverviewLayout {
    pub window: Vec2,
    pub overlay: PanelRect,
    pub header: PanelRect,
    pub toolbar: PanelRect,
    pub slider: PanelRect,
    pub map: PanelRect,
    pub minimap: PanelRect,
    /// Sidebar area below the minimap.
    pub sidebar: PanelRect,
}

impl OverviewLayout {
    pub fn from_window(window: Vec2) -> Self {
        let window = window.max(Vec2::ZERO);
        let overlay_size = Vec2::new(
            window.x * OVERLAY_WIDTH_FRACTION,
            window.y * OVERLAY_HEIGHT_FRACTION,
        )
        .min(OVERLAY_MAX_SIZE);
        let overlay = PanelRect::new((window - overlay_size) * 0.5, overlay_size);

        let header = PanelRect::new(overlay.min, Vec2::new(overlay.size.x, HEADER_HEIGHT));
        let toolbar = PanelRect::new(
            overlay.min + Vec2::new(0.0, HEADER_HEIGHT),
            Vec2::new(overlay.size.x, TOOLBAR_HEIGHT),
        );
        let slider = PanelRect::new(
            toolbar.min + Vec2::new(SLIDER_LEFT, (TOOLBAR_HEIGHT - SLIDER_SIZE.y) * 0.5),
            SLIDER_SIZE,
        );

        let body_top = toolbar.max().y;
        let body_height = (overlay.max().y - body_top).max(0.0);
        let sidebar_width = SIDEBAR_WIDTH.min(overlay.size.x);
        let sidebar_left = overlay.max().x - sidebar_width;

        let map = PanelRect::new(
            Vec2::new(overlay.min.x + PADDING, body_top + PADDING),
            Vec2::new(
                (overlay.size.x - sidebar_width - PADDING * 2.0).max(0.0),
                (body_height - PADDING * 2.0).max(0.0),
            ),
        );

        let minimap_size = Vec2::new(
            MINIMAP_SIZE.x.min((sidebar_width - PADDING * 2.0).max(0.0)),
            MINIMAP_SIZE.y.min((body_height - PADDING * 2.0).max(0.0)),
        );
        let minimap = PanelRect::new(
            Vec2::new(sidebar_left + PADDING, body_top + PADDING),
            minimap_size,
        );

        let sidebar_top = minimap.max().y + PADDING;
        let sidebar = PanelRect::new(
            Vec2::new(sidebar_left, sidebar_top),
            Vec2::new(sidebar_width, (overlay.max().y - sidebar_top).max(0.0)),
        );

        Self {
            window,
            overlay,
            header,
            toolbar,
            slider,
            map,
            minimap,
            sidebar,
        }
    }

    pub fn rect(&self, region: OverlayRegion) -> PanelRect {
        match region {
            OverlayRegion::Overlay => self.overlay,
            OverlayRegion::Header => self.header,
            OverlayRegion::Toolbar => self.toolbar,
            OverlayRegion::Slider => self.slider,
            OverlayRegion::Map => self.map,
            OverlayRegion::Minimap => self.minimap,
            OverlayRegion::Sidebar => self.sidebar,
        }
    }

    /// Gesture target under a window-pixel position. `None` over panel chrome.
    pub fn pointer_target(&self, position: Vec2) -> Option<PointerTarget> {
        if !self.overlay.contains(position) {
            Some(PointerTarget::Backdrop)
        } else if self.minimap.contains(position) {
            Some(PointerTarget::Minimap)
        } else if self.map.contains(position) {
            Some(PointerTarget::MapCanvas)
        } else if self.slider.contains(position) {
            Some(PointerTarget::Slider)
        } else {
            None
        }
    }

    /// Whether a gesture captured on `target` has left its surface.
    /// The slider keeps tracking outside its track, like any slider thumb.
    pub fn has_left(&self, target: PointerTarget, position: Vec2) -> bool {
        match target {
            PointerTarget::MapCanvas => !self.map.contains(position),
            PointerTarget::Minimap => !self.minimap.contains(position),
            PointerTarget::Backdrop => self.overlay.contains(position),
            PointerTarget::Slider => false,
        }
    }

    /// Slider fraction for a cursor x position, clamped to the track ends.
    pub fn slider_fraction_at(&self, position: Vec2) -> Option<f32> {
        if self.slider.size.x <= 0.0 {
            return None;
        }
        Some(((position.x - self.slider.min.x) / self.slider.size.x).clamp(0.0, 1.0))
    }
}

// =============================================================================
// Systems
// =============================================================================

pub fn update_overview_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut layout: ResMut<OverviewLayout>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let next = OverviewLayout::from_window(Vec2::new(window.width(), window.height()));
    layout.set_if_neq(next);
}
