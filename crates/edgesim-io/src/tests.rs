//! Integration tests for edgesim-io.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::load;
use crate::report::AlgorithmReport;

fn write_scenario(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

const MINIMAL_SCENARIO: &str = r#"
{
  "simulation_steps": 3,
  "base_stations": [
    {"id": 1, "coordinates": [0.0, 0.0], "wireless_delay": 2, "users": [1], "edge_servers": [1]},
    {"id": 2, "coordinates": [1.0, 0.0], "wireless_delay": 2, "users": [], "edge_servers": [2]}
  ],
  "edge_servers": [
    {"id": 1, "capacity": 100, "base_station": 1, "coordinates": [0.0, 0.0], "services": [1], "static_power_percentage": 0.5, "max_power": 100.0, "container_registries": []},
    {"id": 2, "capacity": 100, "base_station": 2, "coordinates": [1.0, 0.0], "services": [], "static_power_percentage": 0.5, "max_power": 100.0, "container_registries": []}
  ],
  "container_images": [],
  "container_registries": [],
  "applications": [
    {"id": 1, "services": [1], "users": [1]}
  ],
  "services": [
    {"id": 1, "demand": 10, "layers": [], "server": {"type": "EdgeServer", "id": 1}, "application": 1}
  ],
  "users": [
    {
      "id": 1,
      "coordinates_trace": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
      "base_station": {"type": "BaseStation", "id": 1},
      "applications": [
        {"id": 1, "delay_sla": 50.0, "provisioning_time_sla": 10.0, "communication_path": [{"type": "BaseStation", "id": 1}]}
      ]
    }
  ],
  "network": {
    "links": [
      {"id": 1, "nodes": [{"type": "BaseStation", "id": 1}, {"type": "BaseStation", "id": 2}], "delay": 5, "bandwidth": 4, "bandwidth_demand": 0}
    ]
  }
}
"#;

#[test]
fn load_populates_world_and_topology_from_a_minimal_scenario() {
    let file = write_scenario(MINIMAL_SCENARIO);
    let (world, topology, config) = load(file.path()).unwrap();

    assert_eq!(config.total_steps, 3);
    assert_eq!(world.base_stations.count(), 2);
    assert_eq!(world.edge_servers.count(), 2);
    assert_eq!(topology.node_count(), 2);
    assert_eq!(topology.link_count(), 1);

    let server = world
        .edge_servers
        .find_by_id(edgesim_core::EdgeServerId(1))
        .unwrap();
    assert_eq!(server.demand, 10);

    let user = world.users.find_by_id(edgesim_core::UserId(1)).unwrap();
    // Seeded via the communication_path: wireless_delay (2) + 0 path delay
    // for a single-node path.
    assert_eq!(user.delays.get(&edgesim_core::ApplicationId(1)), Some(&2.0));
}

#[test]
fn load_rejects_a_dangling_edge_server_base_station_reference() {
    let bad = MINIMAL_SCENARIO.replace("\"base_station\": 1,", "\"base_station\": 99,");
    let file = write_scenario(&bad);
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, crate::IoError::DatasetInvalid(_)));
}

#[test]
fn report_to_csv_line_is_one_tab_separated_row() {
    let world = edgesim_entities::World::new();
    let report = AlgorithmReport::build("never_follow", &[], &world);
    let line = report.to_csv_line().unwrap();
    assert_eq!(line.matches('\t').count(), 12);
    assert!(line.starts_with("never_follow\t"));
}
