//! Panel configuration for UI nodes pinned to overview regions.

use bevy::prelude::*;
use bevy::ui::{Node as UiNode, OverflowAxis, PositionType, UiRect, Val};

use crate::plugins::overview::{OverlayRegion, OverviewLayout};

// =============================================================================
// Panel Position
// =============================================================================

/// Corner of the region a panel hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPosition {
    TopLeft,
    TopRight,
    BottomLeft,
}

// =============================================================================
// Panel Configuration
// =============================================================================

/// Placement and chrome for a panel inside the overview overlay
#[derive(Component, Debug, Clone)]
pub struct PanelConfig {
    pub region: OverlayRegion,
    pub position: PanelPosition,
    pub offset: Vec2,
    pub background_color: Option<Color>,
    pub padding: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Stretch to the region width, minus the offset on both sides.
    pub fill_width: bool,
    pub overflow_clip: bool,
}

impl PanelConfig {
    /// Creates a new panel config anchored to a region corner
    pub fn at(region: OverlayRegion, position: PanelPosition) -> Self {
        Self {
            region,
            position,
            offset: Vec2::ZERO,
            background_color: None,
            padding: 0.0,
            width: None,
            height: None,
            fill_width: false,
            overflow_clip: false,
        }
    }

    /// Sets the same inset from both region edges
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.offset = Vec2::splat(margin);
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the background color (None for transparent)
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Sets the padding inside the panel
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the panel width and height
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn filling_width(mut self) -> Self {
        self.fill_width = true;
        self
    }

    /// Clips content that runs past the panel height
    pub fn with_clip(mut self) -> Self {
        self.overflow_clip = true;
        self
    }

    /// Builds a fresh node for this config
    pub fn node(&self, layout: &OverviewLayout) -> UiNode {
        let mut node = UiNode {
            display: Display::None,
            ..default()
        };
        self.apply_to_node(&mut node, layout);
        node
    }

    /// Applies this config to a UiNode, setting position properties
    pub fn apply_to_node(&self, node: &mut UiNode, layout: &OverviewLayout) {
        let rect = layout.rect(self.region);
        node.position_type = PositionType::Absolute;

        match self.position {
            PanelPosition::TopLeft => {
                node.left = Val::Px(rect.min.x + self.offset.x);
                node.top = Val::Px(rect.min.y + self.offset.y);
            }
            PanelPosition::TopRight => {
                node.right = Val::Px(layout.window.x - rect.max().x + self.offset.x);
                node.top = Val::Px(rect.min.y + self.offset.y);
            }
            PanelPosition::BottomLeft => {
                node.left = Val::Px(rect.min.x + self.offset.x);
                node.bottom = Val::Px(layout.window.y - rect.max().y + self.offset.y);
            }
        }

        if self.padding > 0.0 {
            node.padding = UiRect::all(Val::Px(self.padding));
        }

        if self.fill_width {
            node.width = Val::Px((rect.size.x - self.offset.x * 2.0).max(0.0));
        } else if let Some(width) = self.width {
            node.width = Val::Px(width);
        }

        if let Some(height) = self.height {
            node.height = Val::Px(height);
        } else if self.overflow_clip {
            node.height = Val::Px((rect.size.y - self.offset.y).max(0.0));
        }

        if self.overflow_clip {
            node.overflow.y = OverflowAxis::Clip;
        }
    }

    pub fn background(&self) -> BackgroundColor {
        BackgroundColor(self.background_color.unwrap_or(Color::NONE))
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Re-pins anchored panels to the layout and shows them while the overview is open.
pub fn sync_anchored_panels(
    layout: Res<OverviewLayout>,
    overview: Res<crate::plugins::core::OverviewWindow>,
    mut panels: Query<(&PanelConfig, &mut UiNode)>,
) {
    if !layout.is_changed() && !overview.is_changed() {
        return;
    }

    for (config, mut node) in panels.iter_mut() {
        config.apply_to_node(&mut node, &layout);
        node.display = if overview.open {
            Display::Flex
        } else {
            Display::None
        };
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> OverviewLayout {
        OverviewLayout::from_window(Vec2::new(1280.0, 720.0))
    }

    #[test]
    fn panel_config_default_values() {
        let config = PanelConfig::at(OverlayRegion::Sidebar, PanelPosition::TopLeft);
        assert_eq!(config.offset, Vec2::ZERO);
        assert!(config.background_color.is_none());
        assert_eq!(config.padding, 0.0);
        assert!(config.width.is_none());
        assert!(config.height.is_none());
        assert!(!config.fill_width);
        assert!(!config.overflow_clip);
    }

    #[test]
    fn panel_config_apply_top_left_is_region_relative() {
        let layout = layout();
        let config =
            PanelConfig::at(OverlayRegion::Toolbar, PanelPosition::TopLeft).with_margin(8.0);
        let mut node = UiNode::default();
        config.apply_to_node(&mut node, &layout);

        assert_eq!(node.position_type, PositionType::Absolute);
        assert_eq!(node.left, Val::Px(layout.toolbar.min.x + 8.0));
        assert_eq!(node.top, Val::Px(layout.toolbar.min.y + 8.0));
    }

    #[test]
    fn panel_config_apply_top_right_measures_from_window_edge() {
        let layout = layout();
        let config = PanelConfig::at(OverlayRegion::Header, PanelPosition::TopRight)
            .with_offset(Vec2::new(12.0, 6.0));
        let mut node = UiNode::default();
        config.apply_to_node(&mut node, &layout);

        assert_eq!(
            node.right,
            Val::Px(layout.window.x - layout.header.max().x + 12.0)
        );
        assert_eq!(node.top, Val::Px(layout.header.min.y + 6.0));
    }

    #[test]
    fn panel_config_apply_bottom_left() {
        let layout = layout();
        let config =
            PanelConfig::at(OverlayRegion::Overlay, PanelPosition::BottomLeft).with_margin(10.0);
        let mut node = UiNode::default();
        config.apply_to_node(&mut node, &layout);

        assert_eq!(node.left, Val::Px(layout.overlay.min.x + 10.0));
        assert_eq!(
            node.bottom,
            Val::Px(layout.window.y - layout.overlay.max().y + 10.0)
        );
    }

    #[test]
    fn panel_config_fill_width_and_clip() {
        let layout = layout();
        let config = PanelConfig::at(OverlayRegion::Sidebar, PanelPosition::TopLeft)
            .with_offset(Vec2::new(10.0, 0.0))
            .filling_width()
            .with_clip();
        let mut node = UiNode::default();
        config.apply_to_node(&mut node, &layout);

        assert_eq!(node.width, Val::Px(layout.sidebar.size.x - 20.0));
        assert_eq!(node.height, Val::Px(layout.sidebar.size.y));
        assert_eq!(node.overflow.y, OverflowAxis::Clip);
    }

    #[test]
    fn panel_config_with_size_and_padding() {
        let config = PanelConfig::at(OverlayRegion::Slider, PanelPosition::TopLeft)
            .with_size(180.0, 14.0)
            .with_padding(4.0);
        let mut node = UiNode::default();
        config.apply_to_node(&mut node, &layout());

        assert_eq!(node.width, Val::Px(180.0));
        assert_eq!(node.height, Val::Px(14.0));
        assert_eq!(node.padding.left, Val::Px(4.0));
    }

    #[test]
    fn new_panel_nodes_start_hidden() {
        let config = PanelConfig::at(OverlayRegion::Header, PanelPosition::TopLeft);
        let node = config.node(&layout());
        assert_eq!(node.display, Display::None);
    }

    #[test]
    fn panel_background_defaults_transparent() {
        let config = PanelConfig::at(OverlayRegion::Header, PanelPosition::TopLeft);
        assert_eq!(config.background().0, Color::NONE);
        let filled = config.with_background(Color::BLACK);
        assert_eq!(filled.background().0, Color::BLACK);
    }
}
