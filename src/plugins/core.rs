use bevy::prelude::*;

use std::fs;
use std::path::Path;

pub struct CorePlugin;

pub const CONFIG_PATH: &str = "assets/console.ron";

#[derive(Resource, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub data_path: String,
    pub click_distance_px: f32,
    pub click_time_secs: f64,
    pub zoom_step: f32,
    pub wheel_sensitivity: f32,
    pub wheel_delta_limit: f32,
    pub focus_min_zoom: f32,
    pub node_hit_radius_px: f32,
    pub hazard_hit_radius_px: f32,
    pub keep_view_on_close: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_path: "assets/network.ron".to_string(),
            click_distance_px: 5.0,
            click_time_secs: 0.3,
            zoom_step: 0.2,
            wheel_sensitivity: 0.1,
            wheel_delta_limit: 0.3,
            focus_min_zoom: 1.5,
            node_hit_radius_px: 10.0,
            hazard_hit_radius_px: 8.0,
            keep_view_on_close: false,
        }
    }
}

pub fn parse_config(contents: &str) -> Result<ConsoleConfig, String> {
    ron::de::from_str::<ConsoleConfig>(contents).map_err(|error| format!("RON parse error: {}", error))
}

pub fn load_config_from_file(path: &Path) -> Result<Option<ConsoleConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }

    match fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents).map(Some),
        Err(error) => Err(format!("Read error: {}", error)),
    }
}

#[derive(Resource, Debug)]
pub struct EventLog {
    entries: Vec<String>,
    max_entries: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 8,
        }
    }
}

impl EventLog {
    pub fn push(&mut self, entry: String) {
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(0..overflow);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Whether the overview overlay is showing.
#[derive(Resource, Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OverviewWindow {
    pub open: bool,
}

/// Short-lived status line, e.g. search results.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct StatusToast {
    message: Option<String>,
    remaining: f32,
}

pub const TOAST_SECONDS: f32 = 2.5;

impl StatusToast {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.remaining = TOAST_SECONDS;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn tick(&mut self, delta: f32) {
        if self.message.is_none() {
            return;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.message = None;
            self.remaining = 0.0;
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputBindings {
    pub toggle_overview: KeyCode,
    pub reset_view: KeyCode,
    pub toggle_measure: KeyCode,
    pub refresh: KeyCode,
    pub focus_search: KeyCode,
    pub close: KeyCode,
    pub zoom_in: KeyCode,
    pub zoom_out: KeyCode,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            toggle_overview: KeyCode::Tab,
            reset_view: KeyCode::KeyR,
            toggle_measure: KeyCode::KeyM,
            refresh: KeyCode::F5,
            focus_search: KeyCode::Slash,
            close: KeyCode::Escape,
            zoom_in: KeyCode::Equal,
            zoom_out: KeyCode::Minus,
        }
    }
}

#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum ConsoleState {
    #[default]
    Boot,
    Loading,
    Ready,
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let mut log = EventLog::default();
        let config = match load_config_from_file(Path::new(CONFIG_PATH)) {
            Ok(Some(config)) => {
                info!("Loaded console config from {}", CONFIG_PATH);
                config
            }
            Ok(None) => ConsoleConfig::default(),
            Err(error) => {
                error!("Config load failed: {}", error);
                log.push(format!("Config load failed: {}", error));
                ConsoleConfig::default()
            }
        };

        app.init_state::<ConsoleState>()
            .insert_resource(config)
            .insert_resource(log)
            .insert_resource(InputBindings::default())
            .init_resource::<OverviewWindow>()
            .init_resource::<StatusToast>()
            .add_systems(OnEnter(ConsoleState::Boot), log_enter_boot)
            .add_systems(OnEnter(ConsoleState::Boot), transition_to_loading)
            .add_systems(OnEnter(ConsoleState::Loading), setup_loading_screen)
            .add_systems(OnExit(ConsoleState::Loading), teardown_loading_screen)
            .add_systems(OnEnter(ConsoleState::Ready), log_enter_ready)
            .add_systems(Update, tick_loading.run_if(in_state(ConsoleState::Loading)))
            .add_systems(Update, tick_status_toast);
    }
}

pub fn overview_open(overview: Res<OverviewWindow>) -> bool {
    overview.open
}

fn log_enter_boot(mut log: ResMut<EventLog>) {
    log.push("State: Boot".to_string());
    info!("State: Boot");
}

fn transition_to_loading(mut next_state: ResMut<NextState<ConsoleState>>) {
    next_state.set(ConsoleState::Loading);
}

fn log_enter_ready(mut log: ResMut<EventLog>, bindings: Res<InputBindings>) {
    log.push(format!("Ready: {:?} opens the line overview", bindings.toggle_overview));
    info!("State: Ready");
}

#[derive(Component)]
struct LoadingScreen;

#[derive(Resource)]
struct LoadingTimer {
    timer: Timer,
}

fn setup_loading_screen(mut commands: Commands) {
    commands.spawn((
        LoadingScreen,
        Sprite {
            color: Color::srgb(0.02, 0.03, 0.05),
            custom_size: Some(Vec2::new(4000.0, 2250.0)),
            ..default()
        },
    ));

    commands.insert_resource(LoadingTimer {
        timer: Timer::from_seconds(0.35, TimerMode::Once),
    });
}

fn tick_loading(
    time: Res<Time>,
    mut timer: ResMut<LoadingTimer>,
    mut next_state: ResMut<NextState<ConsoleState>>,
) {
    timer.timer.tick(time.delta());

    if timer.timer.is_finished() {
        next_state.set(ConsoleState::Ready);
    }
}

fn teardown_loading_screen(mut commands: Commands, screens: Query<Entity, With<LoadingScreen>>) {
    for entity in screens.iter() {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<LoadingTimer>();
}

fn tick_status_toast(time: Res<Time>, mut toast: ResMut<StatusToast>) {
    if toast.message().is_some() {
        toast.tick(time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;
    use std::time::Duration;

    #[test]
    fn console_config_default_values() {
        let config = ConsoleConfig::default();
        assert_eq!(config.click_distance_px, 5.0);
        assert_eq!(config.click_time_secs, 0.3);
        assert_eq!(config.zoom_step, 0.2);
        assert_eq!(config.wheel_delta_limit, 0.3);
        assert!(!config.keep_view_on_close);
    }

    #[test]
    fn parse_config_fills_missing_fields() {
        let config = parse_config("(keep_view_on_close: true, zoom_step: 0.25)").expect("parses");
        assert!(config.keep_view_on_close);
        assert_eq!(config.zoom_step, 0.25);
        assert_eq!(config.data_path, "assets/network.ron");
    }

    #[test]
    fn parse_config_reports_errors() {
        let error = parse_config("(zoom_step: \"wide\")").expect_err("rejects");
        assert!(error.starts_with("RON parse error"));
    }

    #[test]
    fn missing_config_file_is_none() {
        let loaded = load_config_from_file(Path::new("assets/does-not-exist.ron"));
        assert_eq!(loaded, Ok(None));
    }

    #[test]
    fn event_log_push_trims_oldest_entries() {
        let mut log = EventLog::default();
        for index in 0..12 {
            log.push(format!("entry-{}", index));
        }

        let entries = log.entries();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries.first().map(String::as_str), Some("entry-4"));
        assert_eq!(entries.last().map(String::as_str), Some("entry-11"));
    }

    #[test]
    fn status_toast_expires() {
        let mut toast = StatusToast::default();
        toast.show("Found tower: T-1");
        toast.tick(1.0);
        assert_eq!(toast.message(), Some("Found tower: T-1"));
        toast.tick(2.0);
        assert_eq!(toast.message(), None);
    }

    #[test]
    fn tick_status_toast_uses_frame_time() {
        let mut world = World::default();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs_f32(3.0));
        world.insert_resource(time);
        let mut toast = StatusToast::default();
        toast.show("No match");
        world.insert_resource(toast);

        let mut system_state: SystemState<(Res<Time>, ResMut<StatusToast>)> =
            SystemState::new(&mut world);
        let (time, toast) = system_state.get_mut(&mut world);
        tick_status_toast(time, toast);
        system_state.apply(&mut world);

        assert_eq!(world.resource::<StatusToast>().message(), None);
    }

    #[test]
    fn overview_toggle_binding_is_tab() {
        let bindings = InputBindings::default();
        assert_eq!(bindings.toggle_overview, KeyCode::Tab);
        assert_eq!(bindings.refresh, KeyCode::F5);
    }
}
