//! Sprite backgrounds behind the overview.
//!
//! UI nodes render above gizmos, so the dimmed backdrop and the panel fills
//! under the map and minimap are world-space sprites instead.

use bevy::prelude::*;

use crate::plugins::core::OverviewWindow;

use super::coords::{window_to_canvas, PanelRect};
use super::layout::{OverlayRegion, OverviewLayout};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackdropLayer {
    /// Dims the whole window.
    Scrim,
    Panel(OverlayRegion),
}

#[derive(Component, Clone, Copy, Debug)]
pub struct OverviewSprite {
    pub layer: BackdropLayer,
}

const SPRITES: [(BackdropLayer, Color, f32); 5] = [
    (BackdropLayer::Scrim, Color::srgba(0.0, 0.0, 0.0, 0.7), 10.0),
    (
        BackdropLayer::Panel(OverlayRegion::Overlay),
        Color::srgb(0.07, 0.09, 0.12),
        11.0,
    ),
    (
        BackdropLayer::Panel(OverlayRegion::Header),
        Color::srgb(0.1, 0.13, 0.18),
        12.0,
    ),
    (
        BackdropLayer::Panel(OverlayRegion::Map),
        Color::srgb(0.03, 0.05, 0.07),
        12.0,
    ),
    (
        BackdropLayer::Panel(OverlayRegion::Minimap),
        Color::srgb(0.04, 0.06, 0.09),
        12.0,
    ),
];

/// Window-pixel rectangle a backdrop layer covers.
pub fn layer_rect(layer: BackdropLayer, layout: &OverviewLayout) -> PanelRect {
    match layer {
        BackdropLayer::Scrim => PanelRect::new(Vec2::ZERO, layout.window),
        BackdropLayer::Panel(region) => layout.rect(region),
    }
}

/// Canvas translation and size for a window-pixel rectangle.
pub fn sprite_placement(rect: &PanelRect, window: Vec2) -> (Vec2, Vec2) {
    (window_to_canvas(rect.center(), window), rect.size)
}

pub fn spawn_overview_sprites(mut commands: Commands) {
    for (layer, color, depth) in SPRITES {
        commands.spawn((
            OverviewSprite { layer },
            Sprite {
                color,
                custom_size: Some(Vec2::ZERO),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, depth),
            Visibility::Hidden,
        ));
    }
}

pub fn sync_overview_sprites(
    overview: Res<OverviewWindow>,
    layout: Res<OverviewLayout>,
    mut sprites: Query<(&OverviewSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
) {
    if !overview.is_changed() && !layout.is_changed() {
        return;
    }

    for (marker, mut sprite, mut transform, mut visibility) in sprites.iter_mut() {
        let rect = layer_rect(marker.layer, &layout);
        let (center, size) = sprite_placement(&rect, layout.window);
        sprite.custom_size = Some(size);
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        *visibility = if overview.open {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    #[test]
    fn scrim_covers_window_centred_on_origin() {
        let layout = OverviewLayout::from_window(Vec2::new(1280.0, 720.0));
        let rect = layer_rect(BackdropLayer::Scrim, &layout);
        let (center, size) = sprite_placement(&rect, layout.window);
        assert_eq!(center, Vec2::ZERO);
        assert_eq!(size, Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn map_fill_matches_map_panel() {
        let layout = OverviewLayout::from_window(Vec2::new(1280.0, 720.0));
        let rect = layer_rect(BackdropLayer::Panel(OverlayRegion::Map), &layout);
        assert_eq!(rect, layout.map);
        let (center, _) = sprite_placement(&rect, layout.window);
        assert_eq!(center, window_to_canvas(layout.map.center(), layout.window));
    }

    #[test]
    fn sprites_follow_open_state() {
        let mut world = World::default();
        world.insert_resource(OverviewWindow { open: true });
        world.insert_resource(OverviewLayout::from_window(Vec2::new(800.0, 600.0)));
        let mut spawn_state: SystemState<Commands> = SystemState::new(&mut world);
        spawn_overview_sprites(spawn_state.get_mut(&mut world));
        spawn_state.apply(&mut world);

        let mut system_state: SystemState<(
            Res<OverviewWindow>,
            Res<OverviewLayout>,
            Query<(&OverviewSprite, &mut Sprite, &mut Transform, &mut Visibility)>,
        )> = SystemState::new(&mut world);
        let (overview, layout, sprites) = system_state.get_mut(&mut world);
        sync_overview_sprites(overview, layout, sprites);
        system_state.apply(&mut world);

        let mut query = world.query::<(&OverviewSprite, &Sprite, &Visibility)>();
        let mut count = 0;
        for (marker, sprite, visibility) in query.iter(&world) {
            count += 1;
            assert_eq!(*visibility, Visibility::Visible);
            if marker.layer == BackdropLayer::Scrim {
                assert_eq!(sprite.custom_size, Some(Vec2::new(800.0, 600.0)));
            }
        }
        assert_eq!(count, SPRITES.len());
    }
}
