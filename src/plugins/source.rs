use bevy::prelude::*;

use crate::network::{
    HazardKind, HazardLevel, HazardMarker, NetworkEdge, NetworkNode, NetworkSnapshot, NodeStatus,
    WireKind,
};
use crate::plugins::core::{ConsoleConfig, ConsoleState, EventLog, InputBindings};
use crate::plugins::overview::OverviewOpened;
use std::fs;
use std::path::Path;

pub struct SourcePlugin;

/// Asks the entity source to re-read the network.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RefreshEntities;

impl Plugin for SourcePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NetworkSnapshot>()
            .add_message::<RefreshEntities>()
            .add_systems(OnEnter(ConsoleState::Ready), request_initial_load)
            .add_systems(
                Update,
                (handle_refresh_key, refresh_snapshot)
                    .chain()
                    .run_if(in_state(ConsoleState::Ready)),
            );
    }
}

#[derive(serde::Serialize, serde::Deserialize, Default)]
struct SaveNetwork {
    #[serde(default)]
    towers: Vec<SaveTower>,
    #[serde(default)]
    lines: Vec<SaveLine>,
    #[serde(default)]
    hazards: Vec<SaveHazard>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SaveTower {
    id: u32,
    name: String,
    x: f32,
    #[serde(default)]
    y: f32,
    z: f32,
    #[serde(default)]
    status: NodeStatus,
    #[serde(default)]
    height: f32,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SavePoint {
    x: f32,
    #[serde(default)]
    y: f32,
    z: f32,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SaveLine {
    points: Vec<SavePoint>,
    #[serde(default)]
    kind: WireKind,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct SaveHazard {
    id: u32,
    name: String,
    x: f32,
    #[serde(default)]
    y: f32,
    z: f32,
    #[serde(default)]
    level: HazardLevel,
    #[serde(default)]
    kind: HazardKind,
    #[serde(default)]
    description: String,
}

impl SaveNetwork {
    fn into_snapshot(self) -> NetworkSnapshot {
        NetworkSnapshot {
            nodes: self
                .towers
                .into_iter()
                .map(|tower| NetworkNode {
                    id: tower.id,
                    name: tower.name,
                    position: Vec3::new(tower.x, tower.y, tower.z),
                    status: tower.status,
                    height: tower.height,
                })
                .collect(),
            edges: self
                .lines
                .into_iter()
                .map(|line| NetworkEdge {
                    points: line
                        .points
                        .into_iter()
                        .map(|point| Vec3::new(point.x, point.y, point.z))
                        .collect(),
                    kind: line.kind,
                })
                .collect(),
            hazards: self
                .hazards
                .into_iter()
                .map(|hazard| HazardMarker {
                    id: hazard.id,
                    name: hazard.name,
                    position: Vec3::new(hazard.x, hazard.y, hazard.z),
                    level: hazard.level,
                    kind: hazard.kind,
                    description: hazard.description,
                })
                .collect(),
        }
    }
}

pub const SIMULATED_TOWER_COUNT: usize = 8;

/// Stand-in network used when no data file is available.
pub fn simulated_network() -> NetworkSnapshot {
    let nodes = (0..SIMULATED_TOWER_COUNT)
        .map(|index| NetworkNode {
            id: index as u32 + 1,
            name: format!("Tower-{:02}", index + 1),
            position: Vec3::new(index as f32 * 150.0, 0.0, index as f32 * 100.0),
            status: if index % 3 == 0 {
                NodeStatus::Warning
            } else {
                NodeStatus::Normal
            },
            height: 10.0 + (index % 3) as f32 * 2.0,
        })
        .collect();

    let mut snapshot = NetworkSnapshot {
        nodes,
        ..Default::default()
    };
    connect_consecutive(&mut snapshot);
    snapshot
}

/// Strings conductors between consecutive towers when no lines were supplied.
pub fn connect_consecutive(snapshot: &mut NetworkSnapshot) {
    if snapshot.nodes.len() < 2 || !snapshot.edges.is_empty() {
        return;
    }
    snapshot.edges = snapshot
        .nodes
        .windows(2)
        .map(|pair| NetworkEdge {
            points: vec![pair[0].position, pair[1].position],
            kind: WireKind::Conductor,
        })
        .collect();
}

pub fn parse_network(contents: &str) -> Result<NetworkSnapshot, String> {
    match ron::de::from_str::<SaveNetwork>(contents) {
        Ok(loaded) => {
            let mut snapshot = loaded.into_snapshot();
            connect_consecutive(&mut snapshot);
            Ok(snapshot)
        }
        Err(error) => Err(format!("RON parse error: {}", error)),
    }
}

pub fn load_network_from_file(path: &Path) -> Result<Option<NetworkSnapshot>, String> {
    if !path.exists() {
        return Ok(None);
    }

    match fs::read_to_string(path) {
        Ok(contents) => parse_network(&contents).map(Some),
        Err(error) => Err(format!("Read error: {}", error)),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotOrigin {
    File,
    Simulated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSnapshot {
    pub snapshot: NetworkSnapshot,
    pub origin: SnapshotOrigin,
    pub error: Option<String>,
}

/// Pulls the current network: data file first, simulated network otherwise.
pub fn fetch_snapshot(config: &ConsoleConfig) -> FetchedSnapshot {
    match load_network_from_file(Path::new(&config.data_path)) {
        Ok(Some(snapshot)) => FetchedSnapshot {
            snapshot,
            origin: SnapshotOrigin::File,
            error: None,
        },
        Ok(None) => FetchedSnapshot {
            snapshot: simulated_network(),
            origin: SnapshotOrigin::Simulated,
            error: None,
        },
        Err(error) => FetchedSnapshot {
            snapshot: simulated_network(),
            origin: SnapshotOrigin::Simulated,
            error: Some(error),
        },
    }
}

fn request_initial_load(mut refresh: MessageWriter<RefreshEntities>) {
    refresh.write(RefreshEntities);
}

fn handle_refresh_key(
    input: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut refresh: MessageWriter<RefreshEntities>,
) {
    if input.just_pressed(bindings.refresh) {
        refresh.write(RefreshEntities);
    }
}

/// Re-queries the source on explicit refresh and whenever the overview opens.
pub fn refresh_snapshot(
    config: Res<ConsoleConfig>,
    mut refresh: MessageReader<RefreshEntities>,
    mut opened: MessageReader<OverviewOpened>,
    mut snapshot: ResMut<NetworkSnapshot>,
    mut log: ResMut<EventLog>,
) {
    let requested = refresh.read().count() + opened.read().count();
    if requested == 0 {
        return;
    }

    let fetched = fetch_snapshot(&config);
    if let Some(error) = &fetched.error {
        error!("Network load failed: {}", error);
        log.push(format!("Network load failed: {}", error));
    }

    let summary = format!(
        "towers: {}, lines: {}, hazards: {}",
        fetched.snapshot.nodes.len(),
        fetched.snapshot.edges.len(),
        fetched.snapshot.hazards.len()
    );
    match fetched.origin {
        SnapshotOrigin::File => {
            info!("Loaded network from {} ({})", config.data_path, summary);
            log.push(format!("Loaded network ({})", summary));
        }
        SnapshotOrigin::Simulated => {
            warn!("No network data at {}, using simulated towers", config.data_path);
            log.push(format!("Simulated network ({})", summary));
        }
    }

    snapshot.set_if_neq(fetched.snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    const SAMPLE_RON: &str = r#"
(
    towers: [
        (id: 1, name: "N-01", x: 0.0, z: 0.0, status: Normal, height: 32.0),
        (id: 2, name: "N-02", x: 180.0, z: 40.0, status: Error, height: 30.0),
    ],
    lines: [
        (points: [(x: 0.0, y: 32.0, z: 0.0), (x: 180.0, y: 30.0, z: 40.0)], kind: GroundWire),
    ],
    hazards: [
        (id: 7, name: "Scaffold", x: 90.0, z: 25.0, level: High, kind: Building, description: "Too close to span"),
    ],
)
"#;

    #[test]
    fn parse_network_reads_all_sections() {
        let snapshot = parse_network(SAMPLE_RON).expect("sample parses");
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.nodes[1].status, NodeStatus::Error);
        assert_eq!(snapshot.edges.len(), 1);
        assert_eq!(snapshot.edges[0].kind, WireKind::GroundWire);
        assert_eq!(snapshot.hazards[0].kind, HazardKind::Building);
        assert_eq!(snapshot.hazards[0].position, Vec3::new(90.0, 0.0, 25.0));
    }

    #[test]
    fn parse_network_generates_missing_lines() {
        let snapshot = parse_network(
            "(towers: [(id: 1, name: \"A\", x: 0.0, z: 0.0), (id: 2, name: \"B\", x: 10.0, z: 0.0), (id: 3, name: \"C\", x: 20.0, z: 0.0)])",
        )
        .expect("parses");
        assert_eq!(snapshot.edges.len(), 2);
        assert_eq!(snapshot.nodes[0].status, NodeStatus::Normal);
    }

    #[test]
    fn parse_network_reports_errors() {
        let error = parse_network("(towers: [(id: \"one\")])").expect_err("rejects");
        assert!(error.starts_with("RON parse error"));
    }

    #[test]
    fn simulated_network_layout() {
        let snapshot = simulated_network();
        assert_eq!(snapshot.nodes.len(), 8);
        assert_eq!(snapshot.edges.len(), 7);
        assert_eq!(snapshot.nodes[3].position, Vec3::new(450.0, 0.0, 300.0));
        assert_eq!(snapshot.nodes[0].status, NodeStatus::Warning);
        assert_eq!(snapshot.nodes[1].status, NodeStatus::Normal);
        assert_eq!(snapshot.nodes[2].height, 14.0);
    }

    #[test]
    fn connect_consecutive_keeps_existing_lines() {
        let mut snapshot = simulated_network();
        snapshot.edges.truncate(1);
        connect_consecutive(&mut snapshot);
        assert_eq!(snapshot.edges.len(), 1);
    }

    #[test]
    fn missing_data_file_falls_back_to_simulated() {
        let config = ConsoleConfig {
            data_path: "assets/no-such-network.ron".to_string(),
            ..Default::default()
        };
        let fetched = fetch_snapshot(&config);
        assert_eq!(fetched.origin, SnapshotOrigin::Simulated);
        assert!(fetched.error.is_none());
        assert_eq!(fetched.snapshot.nodes.len(), SIMULATED_TOWER_COUNT);
    }

    #[test]
    fn refresh_snapshot_replaces_snapshot_on_request() {
        let mut world = World::default();
        world.insert_resource(ConsoleConfig {
            data_path: "assets/no-such-network.ron".to_string(),
            ..Default::default()
        });
        world.insert_resource(NetworkSnapshot::default());
        world.insert_resource(EventLog::default());
        world.init_resource::<Messages<RefreshEntities>>();
        world.init_resource::<Messages<OverviewOpened>>();
        world.write_message(RefreshEntities);

        let mut system_state: SystemState<(
            Res<ConsoleConfig>,
            MessageReader<RefreshEntities>,
            MessageReader<OverviewOpened>,
            ResMut<NetworkSnapshot>,
            ResMut<EventLog>,
        )> = SystemState::new(&mut world);
        let (config, refresh, opened, snapshot, log) = system_state.get_mut(&mut world);
        refresh_snapshot(config, refresh, opened, snapshot, log);
        system_state.apply(&mut world);

        assert_eq!(world.resource::<NetworkSnapshot>().nodes.len(), 8);
        assert_eq!(world.resource::<EventLog>().entries().len(), 1);
    }
}
