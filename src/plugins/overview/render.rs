//! Map layer: projects the network snapshot into panel pixels and draws it.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;

use crate::network::{
    EntityRef, HazardLevel, NetworkSnapshot, NodeStatus, WireKind,
};
use crate::plugins::core::{ConsoleConfig, OverviewWindow};

use super::camera::ViewportState;
use super::coords::{window_to_canvas, CoordinateSpace, PanelRect};
use super::layout::OverviewLayout;

// =============================================================================
// Constants
// =============================================================================

pub const NODE_RADIUS_PX: f32 = 6.0;
pub const HAZARD_RADIUS_PX: f32 = 4.5;
pub const HOVER_SCALE: f32 = 1.5;
/// Hovered entities stay hovered until the cursor leaves this multiple of the hit radius.
pub const HOVER_KEEP_FACTOR: f32 = 1.5;
pub const MAX_SEGMENTS_PER_SPAN: usize = 20;
pub const GRID_COLUMNS: usize = 10;
pub const GRID_ROWS: usize = 6;

const GRID_COLOR: Color = Color::srgba(0.3, 0.36, 0.42, 0.35);
const OUTLINE_HOVER: Color = Color::WHITE;

// =============================================================================
// Draw layer
// =============================================================================

/// Positions are window pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawPrimitive {
    Segment {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Disc {
        center: Vec2,
        radius: f32,
        color: Color,
        outline: Option<Color>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapLabel {
    pub text: String,
    pub position: Vec2,
}

#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct MapLayer {
    pub primitives: Vec<DrawPrimitive>,
    pub labels: Vec<MapLabel>,
    pub no_data: bool,
}

/// Transient interaction styling layered over the base entity style.
#[derive(Resource, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InteractionOverlay {
    pub hovered: Option<EntityRef>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityStyle {
    pub color: Color,
    pub radius: f32,
    pub outline: Option<Color>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRadii {
    pub node: f32,
    pub hazard: f32,
}

impl HitRadii {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            node: config.node_hit_radius_px,
            hazard: config.hazard_hit_radius_px,
        }
    }

    fn for_entity(&self, entity: EntityRef) -> f32 {
        match entity {
            EntityRef::Node(_) => self.node,
            EntityRef::Hazard(_) => self.hazard,
        }
    }
}

// =============================================================================
// Styles
// =============================================================================

pub fn node_color(status: NodeStatus) -> Color {
    match status {
        NodeStatus::Normal => Color::srgb(0.2, 0.6, 0.9),
        NodeStatus::Warning => Color::srgb(1.0, 0.7, 0.0),
        NodeStatus::Error => Color::srgb(1.0, 0.2, 0.2),
    }
}

pub fn hazard_color(level: HazardLevel) -> Color {
    match level {
        HazardLevel::Low => Color::srgb(1.0, 0.8, 0.0),
        HazardLevel::Medium => Color::srgb(1.0, 0.4, 0.0),
        HazardLevel::High => Color::srgb(0.9, 0.1, 0.1),
    }
}

pub fn wire_color(kind: WireKind) -> Color {
    match kind {
        WireKind::Conductor => Color::srgb(0.8, 0.7, 0.5),
        WireKind::GroundWire => Color::srgb(0.6, 0.6, 0.6),
    }
}

pub fn base_style(snapshot: &NetworkSnapshot, entity: EntityRef) -> Option<EntityStyle> {
    match entity {
        EntityRef::Node(index) => snapshot.nodes.get(index).map(|node| EntityStyle {
            color: node_color(node.status),
            radius: NODE_RADIUS_PX,
            outline: None,
        }),
        EntityRef::Hazard(index) => snapshot.hazards.get(index).map(|hazard| EntityStyle {
            color: hazard_color(hazard.level),
            radius: HAZARD_RADIUS_PX,
            outline: None,
        }),
    }
}

pub fn apply_overlay(
    style: EntityStyle,
    entity: EntityRef,
    overlay: &InteractionOverlay,
) -> EntityStyle {
    if overlay.hovered == Some(entity) {
        EntityStyle {
            radius: style.radius * HOVER_SCALE,
            outline: Some(OUTLINE_HOVER),
            ..style
        }
    } else {
        style
    }
}

// =============================================================================
// Projection
// =============================================================================

/// World to panel pixels for one frame's view.
#[derive(Clone, Copy, Debug)]
pub struct MapProjection<'a> {
    pub space: &'a CoordinateSpace,
    pub view: &'a ViewportState,
    pub panel: PanelRect,
}

impl MapProjection<'_> {
    pub fn pixel(&self, world: Vec3) -> Vec2 {
        self.panel.to_pixels(self.space.world_to_screen(world, self.view))
    }
}

/// Thins long polylines down to at most `MAX_SEGMENTS_PER_SPAN` segments.
pub fn sample_span(points: &[Vec3]) -> Vec<Vec3> {
    if points.len() <= MAX_SEGMENTS_PER_SPAN + 1 {
        return points.to_vec();
    }

    let step = (points.len() - 1).div_ceil(MAX_SEGMENTS_PER_SPAN);
    let mut sampled: Vec<Vec3> = points.iter().step_by(step).copied().collect();
    if let Some(last) = points.last() {
        if sampled.last() != Some(last) {
            sampled.push(*last);
        }
    }
    sampled
}

/// Liang-Barsky clip of a segment against `rect`.
pub fn clip_segment(from: Vec2, to: Vec2, rect: &PanelRect) -> Option<(Vec2, Vec2)> {
    if !from.is_finite() || !to.is_finite() {
        return None;
    }

    let delta = to - from;
    let min = rect.min;
    let max = rect.max();
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;

    let checks = [
        (-delta.x, from.x - min.x),
        (delta.x, max.x - from.x),
        (-delta.y, from.y - min.y),
        (delta.y, max.y - from.y),
    ];

    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((from + delta * t0, from + delta * t1))
}

fn grid_primitives(panel: &PanelRect, out: &mut Vec<DrawPrimitive>) {
    let min = panel.min;
    let max = panel.max();
    for column in 1..GRID_COLUMNS {
        let x = min.x + panel.size.x * column as f32 / GRID_COLUMNS as f32;
        out.push(DrawPrimitive::Segment {
            from: Vec2::new(x, min.y),
            to: Vec2::new(x, max.y),
            color: GRID_COLOR,
        });
    }
    for row in 1..GRID_ROWS {
        let y = min.y + panel.size.y * row as f32 / GRID_ROWS as f32;
        out.push(DrawPrimitive::Segment {
            from: Vec2::new(min.x, y),
            to: Vec2::new(max.x, y),
            color: GRID_COLOR,
        });
    }
}

/// Full rebuild of the drawable layer: grid, edges, nodes, then hazards.
pub fn build_map_layer(
    snapshot: &NetworkSnapshot,
    projection: &MapProjection,
    overlay: &InteractionOverlay,
) -> MapLayer {
    let panel = projection.panel;
    let mut layer = MapLayer {
        no_data: snapshot.nodes.is_empty(),
        ..Default::default()
    };

    grid_primitives(&panel, &mut layer.primitives);

    for edge in &snapshot.edges {
        if edge.points.len() < 2 {
            continue;
        }
        let color = wire_color(edge.kind);
        let pixels: Vec<Vec2> = sample_span(&edge.points)
            .into_iter()
            .map(|point| projection.pixel(point))
            .collect();
        for pair in pixels.windows(2) {
            if let Some((from, to)) = clip_segment(pair[0], pair[1], &panel) {
                layer
                    .primitives
                    .push(DrawPrimitive::Segment { from, to, color });
            }
        }
    }

    for (index, node) in snapshot.nodes.iter().enumerate() {
        let entity = EntityRef::Node(index);
        let center = projection.pixel(node.position);
        if !center.is_finite() || !panel.contains(center) {
            continue;
        }
        let Some(base) = base_style(snapshot, entity) else {
            continue;
        };
        let style = apply_overlay(base, entity, overlay);
        layer.primitives.push(DrawPrimitive::Disc {
            center,
            radius: style.radius,
            color: style.color,
            outline: style.outline,
        });
        layer.labels.push(MapLabel {
            text: node.name.clone(),
            position: center + Vec2::new(style.radius + 3.0, -7.0),
        });
    }

    for (index, hazard) in snapshot.hazards.iter().enumerate() {
        let entity = EntityRef::Hazard(index);
        let center = projection.pixel(hazard.position);
        if !center.is_finite() || !panel.contains(center) {
            continue;
        }
        let Some(base) = base_style(snapshot, entity) else {
            continue;
        };
        let style = apply_overlay(base, entity, overlay);
        layer.primitives.push(DrawPrimitive::Disc {
            center,
            radius: style.radius,
            color: style.color,
            outline: style.outline,
        });
    }

    layer
}

// =============================================================================
// Hit testing
// =============================================================================

fn entity_distance(
    snapshot: &NetworkSnapshot,
    projection: &MapProjection,
    entity: EntityRef,
    cursor: Vec2,
) -> Option<f32> {
    let pixel = projection.pixel(snapshot.position_of(entity)?);
    if !pixel.is_finite() || !projection.panel.contains(pixel) {
        return None;
    }
    Some(pixel.distance(cursor))
}

/// Closest entity within its pixel radius. Hazards win ties with nodes.
pub fn hit_test(
    snapshot: &NetworkSnapshot,
    projection: &MapProjection,
    cursor: Vec2,
    radii: HitRadii,
) -> Option<EntityRef> {
    let mut best: Option<(EntityRef, f32)> = None;

    let nodes = (0..snapshot.nodes.len()).map(EntityRef::Node);
    let hazards = (0..snapshot.hazards.len()).map(EntityRef::Hazard);

    for entity in nodes.chain(hazards) {
        let Some(distance) = entity_distance(snapshot, projection, entity, cursor) else {
            continue;
        };
        if distance > radii.for_entity(entity) {
            continue;
        }
        let better = match (best, entity) {
            (None, _) => true,
            (Some((_, best_distance)), EntityRef::Hazard(_)) => distance <= best_distance,
            (Some((_, best_distance)), EntityRef::Node(_)) => distance < best_distance,
        };
        if better {
            best = Some((entity, distance));
        }
    }

    best.map(|(entity, _)| entity)
}

/// Hit test with hysteresis: the current hover survives a slightly wider radius.
pub fn hover_target(
    snapshot: &NetworkSnapshot,
    projection: &MapProjection,
    cursor: Vec2,
    radii: HitRadii,
    current: Option<EntityRef>,
) -> Option<EntityRef> {
    if let Some(entity) = current {
        if let Some(distance) = entity_distance(snapshot, projection, entity, cursor) {
            if distance <= radii.for_entity(entity) * HOVER_KEEP_FACTOR {
                return Some(entity);
            }
        }
    }
    hit_test(snapshot, projection, cursor, radii)
}

// =============================================================================
// Systems
// =============================================================================

#[derive(Component)]
pub struct MapLabelText;

pub fn sync_coordinate_space(snapshot: Res<NetworkSnapshot>, mut space: ResMut<CoordinateSpace>) {
    if !snapshot.is_changed() {
        return;
    }
    let next = CoordinateSpace::from_positions(snapshot.extent_positions());
    if space.set_if_neq(next) {
        info!(
            "Map bounds: min ({:.0}, {:.0}) size ({:.0} x {:.0})",
            next.bounds.min.x, next.bounds.min.z, next.bounds.size.x, next.bounds.size.z
        );
    }
}

pub fn rebuild_map_layer(
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    view: Res<ViewportState>,
    layout: Res<OverviewLayout>,
    overlay: Res<InteractionOverlay>,
    mut layer: ResMut<MapLayer>,
) {
    let dirty = snapshot.is_changed()
        || space.is_changed()
        || view.is_changed()
        || layout.is_changed()
        || overlay.is_changed();
    if !dirty {
        return;
    }

    let projection = MapProjection {
        space: &space,
        view: &view,
        panel: layout.map,
    };
    layer.set_if_neq(build_map_layer(&snapshot, &projection, &overlay));
}

pub fn draw_primitives(gizmos: &mut Gizmos, primitives: &[DrawPrimitive], window: Vec2) {
    for primitive in primitives {
        match primitive {
            DrawPrimitive::Segment { from, to, color } => {
                gizmos.line_2d(
                    window_to_canvas(*from, window),
                    window_to_canvas(*to, window),
                    *color,
                );
            }
            DrawPrimitive::Disc {
                center,
                radius,
                color,
                outline,
            } => {
                let center = window_to_canvas(*center, window);
                let mut ring = *radius;
                while ring > 0.5 {
                    gizmos.circle_2d(center, ring, *color);
                    ring -= 1.0;
                }
                if let Some(outline) = outline {
                    gizmos.circle_2d(center, radius + 1.0, *outline);
                }
            }
        }
    }
}

pub fn draw_map_layer(mut gizmos: Gizmos, layer: Res<MapLayer>, layout: Res<OverviewLayout>) {
    draw_primitives(&mut gizmos, &layer.primitives, layout.window);
}

pub fn sync_map_labels(
    mut commands: Commands,
    layer: Res<MapLayer>,
    overview: Res<OverviewWindow>,
    labels: Query<Entity, With<MapLabelText>>,
) {
    if !layer.is_changed() && !overview.is_changed() {
        return;
    }

    for entity in labels.iter() {
        commands.entity(entity).despawn();
    }

    if !overview.open {
        return;
    }

    for label in &layer.labels {
        commands.spawn((
            MapLabelText,
            Text::new(label.text.clone()),
            TextFont {
                font_size: 11.0,
                ..default()
            },
            TextColor(Color::srgba(0.85, 0.9, 0.96, 0.9)),
            UiNode {
                position_type: PositionType::Absolute,
                left: Val::Px(label.position.x),
                top: Val::Px(label.position.y),
                ..default()
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{HazardKind, HazardMarker, NetworkEdge, NetworkNode};
    use crate::plugins::overview::coords::Bounds;

    fn node(name: &str, x: f32, z: f32) -> NetworkNode {
        NetworkNode {
            id: 0,
            name: name.to_string(),
            position: Vec3::new(x, 0.0, z),
            status: NodeStatus::Normal,
            height: 10.0,
        }
    }

    fn hazard(x: f32, z: f32) -> HazardMarker {
        HazardMarker {
            id: 0,
            name: "Crane".to_string(),
            position: Vec3::new(x, 0.0, z),
            level: HazardLevel::High,
            kind: HazardKind::Equipment,
            description: String::new(),
        }
    }

    fn unit_space() -> CoordinateSpace {
        CoordinateSpace::new(Bounds {
            min: Vec3::ZERO,
            size: Vec3::splat(100.0),
        })
    }

    fn panel() -> PanelRect {
        PanelRect::new(Vec2::new(0.0, 0.0), Vec2::new(1000.0, 1000.0))
    }

    fn discs(layer: &MapLayer) -> Vec<(Vec2, f32)> {
        layer
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::Disc { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn centre_node_projects_to_panel_centre() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("T1", 50.0, 50.0)],
            ..Default::default()
        };
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let layer = build_map_layer(&snapshot, &projection, &InteractionOverlay::default());
        assert_eq!(discs(&layer), vec![(Vec2::new(500.0, 500.0), NODE_RADIUS_PX)]);
        assert_eq!(layer.labels.len(), 1);
        assert!(!layer.no_data);
    }

    #[test]
    fn rebuild_drops_removed_entities() {
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let overlay = InteractionOverlay::default();
        let before = NetworkSnapshot {
            nodes: vec![node("A", 10.0, 10.0), node("B", 90.0, 90.0)],
            ..Default::default()
        };
        let after = NetworkSnapshot {
            nodes: vec![node("B", 90.0, 90.0)],
            ..Default::default()
        };
        assert_eq!(discs(&build_map_layer(&before, &projection, &overlay)).len(), 2);
        let layer = build_map_layer(&after, &projection, &overlay);
        assert_eq!(discs(&layer).len(), 1);
        assert_eq!(layer.labels.len(), 1);
        assert_eq!(layer.labels[0].text, "B");
    }

    #[test]
    fn empty_snapshot_flags_no_data() {
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let layer = build_map_layer(
            &NetworkSnapshot::default(),
            &projection,
            &InteractionOverlay::default(),
        );
        assert!(layer.no_data);
        assert_eq!(layer.primitives.len(), GRID_COLUMNS - 1 + GRID_ROWS - 1);
    }

    #[test]
    fn hover_overlay_enlarges_only_hovered_entity() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("A", 20.0, 20.0), node("B", 80.0, 80.0)],
            ..Default::default()
        };
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let overlay = InteractionOverlay {
            hovered: Some(EntityRef::Node(1)),
        };
        let layer = build_map_layer(&snapshot, &projection, &overlay);
        let radii: Vec<f32> = discs(&layer).into_iter().map(|(_, radius)| radius).collect();
        assert_eq!(radii, vec![NODE_RADIUS_PX, NODE_RADIUS_PX * HOVER_SCALE]);
    }

    #[test]
    fn offscreen_entities_are_culled_and_edges_clipped() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("In", 50.0, 50.0), node("Out", 50.0, 400.0)],
            edges: vec![NetworkEdge {
                points: vec![Vec3::new(50.0, 0.0, 50.0), Vec3::new(50.0, 0.0, 400.0)],
                kind: WireKind::Conductor,
            }],
            hazards: Vec::new(),
        };
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let layer = build_map_layer(&snapshot, &projection, &InteractionOverlay::default());
        assert_eq!(discs(&layer).len(), 1);
        let edge = layer
            .primitives
            .iter()
            .filter_map(|primitive| match primitive {
                DrawPrimitive::Segment { from, to, color } if *color == wire_color(WireKind::Conductor) => {
                    Some((*from, *to))
                }
                _ => None,
            })
            .next();
        let (from, to) = edge.expect("clipped edge present");
        assert!(from.distance(Vec2::new(500.0, 500.0)) < 1e-2);
        assert!(to.distance(Vec2::new(500.0, 1000.0)) < 1e-2);
    }

    #[test]
    fn long_polylines_are_thinned() {
        let points: Vec<Vec3> = (0..46).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let sampled = sample_span(&points);
        assert!(sampled.len() - 1 <= MAX_SEGMENTS_PER_SPAN);
        assert_eq!(sampled.first(), points.first());
        assert_eq!(sampled.last(), points.last());

        let short = &points[..5];
        assert_eq!(sample_span(short), short.to_vec());
    }

    #[test]
    fn clip_segment_rejects_outside_and_trims_crossing() {
        let rect = PanelRect::new(Vec2::ZERO, Vec2::splat(10.0));
        assert_eq!(
            clip_segment(Vec2::new(-5.0, -5.0), Vec2::new(-1.0, 20.0), &rect),
            None
        );
        assert_eq!(
            clip_segment(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0), &rect),
            Some((Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0)))
        );
        assert_eq!(
            clip_segment(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0), &rect),
            Some((Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0)))
        );
    }

    #[test]
    fn hit_radius_is_constant_in_pixels_across_zoom() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("A", 50.0, 50.0)],
            ..Default::default()
        };
        let space = unit_space();
        let radii = HitRadii {
            node: 10.0,
            hazard: 8.0,
        };
        for zoom in [0.5, 1.0, 3.0] {
            let view = ViewportState {
                zoom,
                offset: Vec2::ZERO,
            };
            let projection = MapProjection {
                space: &space,
                view: &view,
                panel: panel(),
            };
            assert_eq!(
                hit_test(&snapshot, &projection, Vec2::new(509.0, 500.0), radii),
                Some(EntityRef::Node(0))
            );
            assert_eq!(
                hit_test(&snapshot, &projection, Vec2::new(511.0, 500.0), radii),
                None
            );
        }
    }

    #[test]
    fn hazard_wins_tie_over_node() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("A", 50.0, 50.0)],
            hazards: vec![hazard(50.0, 50.0)],
            ..Default::default()
        };
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let radii = HitRadii {
            node: 10.0,
            hazard: 8.0,
        };
        assert_eq!(
            hit_test(&snapshot, &projection, Vec2::new(500.0, 500.0), radii),
            Some(EntityRef::Hazard(0))
        );
        assert_eq!(
            hit_test(&snapshot, &projection, Vec2::new(509.0, 500.0), radii),
            Some(EntityRef::Node(0))
        );
    }

    #[test]
    fn hover_keeps_current_entity_inside_wider_radius() {
        let snapshot = NetworkSnapshot {
            nodes: vec![node("A", 50.0, 50.0)],
            ..Default::default()
        };
        let space = unit_space();
        let view = ViewportState::default();
        let projection = MapProjection {
            space: &space,
            view: &view,
            panel: panel(),
        };
        let radii = HitRadii {
            node: 10.0,
            hazard: 8.0,
        };
        let cursor = Vec2::new(513.0, 500.0);
        assert_eq!(hover_target(&snapshot, &projection, cursor, radii, None), None);
        assert_eq!(
            hover_target(&snapshot, &projection, cursor, radii, Some(EntityRef::Node(0))),
            Some(EntityRef::Node(0))
        );
    }
}
