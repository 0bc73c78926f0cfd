//! Minimap inset: whole-network view with the main view's footprint drawn on top.

use bevy::prelude::*;

use crate::network::NetworkSnapshot;

use super::camera::ViewportState;
use super::coords::{CoordinateSpace, PanelRect, MAP_CENTER};
use super::layout::OverviewLayout;
use super::render::{
    build_map_layer, clip_segment, draw_primitives, DrawPrimitive, InteractionOverlay, MapProjection,
};

const INDICATOR_COLOR: Color = Color::srgb(0.95, 0.95, 0.35);

/// Visible region of the main view, in minimap percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorRect {
    pub center: Vec2,
    pub size: Vec2,
}

impl IndicatorRect {
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }
}

pub fn view_indicator(view: &ViewportState) -> IndicatorRect {
    let size = 100.0 / view.zoom;
    IndicatorRect {
        center: Vec2::splat(MAP_CENTER) - view.offset / view.zoom,
        size: Vec2::splat(size),
    }
}

/// Offset that puts the clicked minimap point at the centre of the main view.
pub fn recenter_offset(click: Vec2, zoom: f32) -> Vec2 {
    (Vec2::splat(MAP_CENTER) - click) * zoom
}

/// Minimap primitives: whole network at zoom 1 plus the indicator outline.
pub fn build_minimap_primitives(
    snapshot: &NetworkSnapshot,
    space: &CoordinateSpace,
    view: &ViewportState,
    panel: PanelRect,
) -> Vec<DrawPrimitive> {
    let identity = ViewportState::default();
    let projection = MapProjection {
        space,
        view: &identity,
        panel,
    };
    let mut primitives = build_map_layer(snapshot, &projection, &InteractionOverlay::default())
        .primitives
        .into_iter()
        .map(|primitive| match primitive {
            DrawPrimitive::Disc {
                center,
                radius,
                color,
                ..
            } => DrawPrimitive::Disc {
                center,
                radius: (radius * 0.5).max(1.5),
                color,
                outline: None,
            },
            other => other,
        })
        .collect::<Vec<_>>();

    let indicator = view_indicator(view);
    let min = panel.to_pixels(indicator.min());
    let max = panel.to_pixels(indicator.max());
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ];
    for index in 0..corners.len() {
        let from = corners[index];
        let to = corners[(index + 1) % corners.len()];
        if let Some((from, to)) = clip_segment(from, to, &panel) {
            primitives.push(DrawPrimitive::Segment {
                from,
                to,
                color: INDICATOR_COLOR,
            });
        }
    }

    primitives
}

pub fn draw_minimap(
    mut gizmos: Gizmos,
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    view: Res<ViewportState>,
    layout: Res<OverviewLayout>,
) {
    let primitives = build_minimap_primitives(&snapshot, &space, &view, layout.minimap);
    draw_primitives(&mut gizmos, &primitives, layout.window);
}
