use bevy::prelude::*;

mod network;
mod plugins;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.05, 0.07, 0.1)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Line Overview Console".to_string(),
                resolution: (1280, 720).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            plugins::core::CorePlugin,
            plugins::source::SourcePlugin,
            plugins::overview::OverviewPlugin,
            plugins::ui::UiPlugin,
        ))
        .run();
}
