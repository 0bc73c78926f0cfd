use bevy::prelude::*;

/// Snapshot of everything the overview draws. Replaced wholesale on refresh.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub hazards: Vec<HazardMarker>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkNode {
    pub id: u32,
    pub name: String,
    pub position: Vec3,
    pub status: NodeStatus,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeStatus {
    #[default]
    Normal,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEdge {
    pub points: Vec<Vec3>,
    pub kind: WireKind,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WireKind {
    #[default]
    Conductor,
    GroundWire,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HazardMarker {
    pub id: u32,
    pub name: String,
    pub position: Vec3,
    pub level: HazardLevel,
    pub kind: HazardKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HazardLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HazardKind {
    Building,
    Vegetation,
    Equipment,
    #[default]
    Other,
}

/// Index of a selectable entity inside the current snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EntityRef {
    Node(usize),
    Hazard(usize),
}

impl NetworkSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.hazards.is_empty()
    }

    /// Positions that define the map extent: towers and hazards.
    pub fn extent_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.nodes
            .iter()
            .map(|node| node.position)
            .chain(self.hazards.iter().map(|hazard| hazard.position))
    }

    pub fn position_of(&self, entity: EntityRef) -> Option<Vec3> {
        match entity {
            EntityRef::Node(index) => self.nodes.get(index).map(|node| node.position),
            EntityRef::Hazard(index) => self.hazards.get(index).map(|hazard| hazard.position),
        }
    }

    pub fn name_of(&self, entity: EntityRef) -> Option<&str> {
        match entity {
            EntityRef::Node(index) => self.nodes.get(index).map(|node| node.name.as_str()),
            EntityRef::Hazard(index) => self.hazards.get(index).map(|hazard| hazard.name.as_str()),
        }
    }
}

impl NetworkEdge {
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

pub fn status_label(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Normal => "Normal",
        NodeStatus::Warning => "Warning",
        NodeStatus::Error => "Fault",
    }
}

pub fn hazard_level_label(level: HazardLevel) -> &'static str {
    match level {
        HazardLevel::Low => "Low",
        HazardLevel::Medium => "Medium",
        HazardLevel::High => "High",
    }
}

pub fn hazard_kind_label(kind: HazardKind) -> &'static str {
    match kind {
        HazardKind::Building => "Building",
        HazardKind::Vegetation => "Vegetation",
        HazardKind::Equipment => "Equipment",
        HazardKind::Other => "Other",
    }
}

// =============================================================================
// Statistics
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetworkStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub hazard_count: usize,
    pub low_hazards: usize,
    pub medium_hazards: usize,
    pub high_hazards: usize,
    pub total_length: f32,
    pub average_height: f32,
}

pub fn network_stats(snapshot: &NetworkSnapshot) -> NetworkStats {
    let mut stats = NetworkStats {
        node_count: snapshot.nodes.len(),
        edge_count: snapshot.edges.len(),
        hazard_count: snapshot.hazards.len(),
        ..Default::default()
    };

    for hazard in &snapshot.hazards {
        match hazard.level {
            HazardLevel::Low => stats.low_hazards += 1,
            HazardLevel::Medium => stats.medium_hazards += 1,
            HazardLevel::High => stats.high_hazards += 1,
        }
    }

    stats.total_length = snapshot.edges.iter().map(NetworkEdge::length).sum();

    if !snapshot.nodes.is_empty() {
        let total: f32 = snapshot.nodes.iter().map(|node| node.height).sum();
        stats.average_height = total / snapshot.nodes.len() as f32;
    }

    stats
}

// =============================================================================
// Search
// =============================================================================

/// Finds the first tower whose name contains `query`, then the first hazard
/// matching by name, kind or level. Case-insensitive; blank queries match nothing.
pub fn search(snapshot: &NetworkSnapshot, query: &str) -> Option<EntityRef> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(index) = snapshot
        .nodes
        .iter()
        .position(|node| node.name.to_lowercase().contains(&needle))
    {
        return Some(EntityRef::Node(index));
    }

    snapshot
        .hazards
        .iter()
        .position(|hazard| {
            hazard.name.to_lowercase().contains(&needle)
                || hazard_kind_label(hazard.kind).to_lowercase().contains(&needle)
                || hazard_level_label(hazard.level).to_lowercase().contains(&needle)
        })
        .map(EntityRef::Hazard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        let diff = (a - b).abs();
        assert!(diff < 1e-4, "expected {} close to {}", a, b);
    }

    fn node(id: u32, name: &str, x: f32, z: f32, height: f32) -> NetworkNode {
        NetworkNode {
            id,
            name: name.to_string(),
            position: Vec3::new(x, 0.0, z),
            status: NodeStatus::Normal,
            height,
        }
    }

    fn hazard(id: u32, name: &str, level: HazardLevel, kind: HazardKind) -> HazardMarker {
        HazardMarker {
            id,
            name: name.to_string(),
            position: Vec3::new(10.0, 0.0, 10.0),
            level,
            kind,
            description: String::new(),
        }
    }

    fn sample() -> NetworkSnapshot {
        NetworkSnapshot {
            nodes: vec![
                node(1, "Tower-01", 0.0, 0.0, 10.0),
                node(2, "Tower-02", 30.0, 40.0, 14.0),
            ],
            edges: vec![NetworkEdge {
                points: vec![Vec3::ZERO, Vec3::new(30.0, 0.0, 40.0), Vec3::new(30.0, 0.0, 50.0)],
                kind: WireKind::Conductor,
            }],
            hazards: vec![
                hazard(1, "Crane near span 2", HazardLevel::High, HazardKind::Equipment),
                hazard(2, "Poplar row", HazardLevel::Low, HazardKind::Vegetation),
            ],
        }
    }

    #[test]
    fn edge_length_sums_segments() {
        let snapshot = sample();
        assert_close(snapshot.edges[0].length(), 60.0);
    }

    #[test]
    fn stats_count_levels_and_average_height() {
        let stats = network_stats(&sample());
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.hazard_count, 2);
        assert_eq!(stats.high_hazards, 1);
        assert_eq!(stats.low_hazards, 1);
        assert_eq!(stats.medium_hazards, 0);
        assert_close(stats.total_length, 60.0);
        assert_close(stats.average_height, 12.0);
    }

    #[test]
    fn stats_empty_snapshot_is_zeroed() {
        let stats = network_stats(&NetworkSnapshot::default());
        assert_eq!(stats, NetworkStats::default());
    }

    #[test]
    fn search_prefers_towers_and_ignores_case() {
        let snapshot = sample();
        assert_eq!(search(&snapshot, "tower-02"), Some(EntityRef::Node(1)));
        assert_eq!(search(&snapshot, "  TOWER "), Some(EntityRef::Node(0)));
    }

    #[test]
    fn search_matches_hazard_name_kind_and_level() {
        let snapshot = sample();
        assert_eq!(search(&snapshot, "crane"), Some(EntityRef::Hazard(0)));
        assert_eq!(search(&snapshot, "vegetation"), Some(EntityRef::Hazard(1)));
        assert_eq!(search(&snapshot, "high"), Some(EntityRef::Hazard(0)));
    }

    #[test]
    fn search_blank_or_unknown_returns_none() {
        let snapshot = sample();
        assert_eq!(search(&snapshot, "   "), None);
        assert_eq!(search(&snapshot, "substation"), None);
    }

    #[test]
    fn extent_positions_include_nodes_and_hazards() {
        let snapshot = sample();
        assert_eq!(snapshot.extent_positions().count(), 4);
    }

    #[test]
    fn position_of_out_of_range_is_none() {
        let snapshot = sample();
        assert_eq!(snapshot.position_of(EntityRef::Node(7)), None);
        assert_eq!(
            snapshot.position_of(EntityRef::Node(1)),
            Some(Vec3::new(30.0, 0.0, 40.0))
        );
        assert_eq!(snapshot.name_of(EntityRef::Hazard(1)), Some("Poplar row"));
    }
}
