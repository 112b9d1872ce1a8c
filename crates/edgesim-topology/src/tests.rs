//! Unit tests for edgesim-topology.
//!
//! Topology under test: a 4-node path B1-B2-B3-B4 plus a direct shortcut
//! B1-B4 with high delay but high bandwidth, to exercise the weight-mode
//! quirks.

use std::collections::HashSet;

use edgesim_core::{BaseStationId, LinkId};

use crate::{Link, TopologyBuilder, TopologyError, Weight};

fn link(id: u32, a: u32, b: u32, delay: i64, bandwidth: i64) -> Link {
    Link {
        id: LinkId(id),
        a: BaseStationId(a),
        b: BaseStationId(b),
        delay,
        bandwidth,
        bandwidth_demand: 0,
        applications: HashSet::new(),
        services_being_migrated: vec![],
        active_power: None,
        low_power_percentage: None,
    }
}

fn sample_topology() -> crate::Topology {
    let mut b = TopologyBuilder::new();
    for id in 1..=4u32 {
        b.add_node(BaseStationId(id));
    }
    b.add_link(link(1, 1, 2, 10, 100));
    b.add_link(link(2, 2, 3, 10, 100));
    b.add_link(link(3, 3, 4, 10, 100));
    b.add_link(link(4, 1, 4, 100, 1000));
    b.build()
}

#[test]
fn shortest_path_by_delay_prefers_the_hop_chain() {
    let topo = sample_topology();
    let path = topo
        .shortest_path(BaseStationId(1), BaseStationId(4), Weight::Delay)
        .unwrap();
    assert_eq!(
        path,
        vec![
            BaseStationId(1),
            BaseStationId(2),
            BaseStationId(3),
            BaseStationId(4)
        ]
    );
}

#[test]
fn shortest_path_by_raw_bandwidth_penalizes_high_bandwidth_shortcut() {
    let topo = sample_topology();
    // BandwidthRaw feeds bandwidth straight in as cost, so the 1000-wide
    // shortcut costs more than three 100-wide hops (300 < 1000).
    let path = topo
        .shortest_path(BaseStationId(1), BaseStationId(4), Weight::BandwidthRaw)
        .unwrap();
    assert_eq!(
        path,
        vec![
            BaseStationId(1),
            BaseStationId(2),
            BaseStationId(3),
            BaseStationId(4)
        ]
    );
}

#[test]
fn shortest_path_by_inverse_bandwidth_prefers_high_bandwidth_shortcut() {
    let topo = sample_topology();
    // InverseBandwidth costs 1/1000 for the shortcut vs 3 * 1/100 for the
    // hop chain (0.001 < 0.03), so the single high-bandwidth hop wins.
    let path = topo
        .shortest_path(BaseStationId(1), BaseStationId(4), Weight::InverseBandwidth)
        .unwrap();
    assert_eq!(path, vec![BaseStationId(1), BaseStationId(4)]);
}

#[test]
fn disconnected_pair_is_path_not_found() {
    let mut b = TopologyBuilder::new();
    b.add_node(BaseStationId(1));
    b.add_node(BaseStationId(2));
    let topo = b.build();

    let err = topo
        .shortest_path(BaseStationId(1), BaseStationId(2), Weight::Delay)
        .unwrap_err();
    assert!(matches!(err, TopologyError::PathNotFound { .. }));
}

#[test]
fn path_delay_sums_deduplicated_edges() {
    let topo = sample_topology();
    let path = vec![
        BaseStationId(1),
        BaseStationId(1),
        BaseStationId(2),
        BaseStationId(3),
    ];
    assert_eq!(topo.path_delay(&path), 20);
}

#[test]
fn path_min_bandwidth_of_single_node_is_infinite() {
    let topo = sample_topology();
    let path = vec![BaseStationId(1)];
    assert_eq!(topo.path_min_bandwidth(&path), f64::INFINITY);
}

#[test]
fn path_min_bandwidth_along_hop_chain() {
    let topo = sample_topology();
    let path = vec![
        BaseStationId(1),
        BaseStationId(2),
        BaseStationId(3),
        BaseStationId(4),
    ];
    assert_eq!(topo.path_min_bandwidth(&path), 100.0);
}

#[test]
fn deduplicate_collapses_consecutive_repeats() {
    let path = vec![
        BaseStationId(1),
        BaseStationId(1),
        BaseStationId(2),
        BaseStationId(2),
        BaseStationId(1),
    ];
    let deduped = crate::Topology::deduplicate(&path);
    assert_eq!(
        deduped,
        vec![BaseStationId(1), BaseStationId(2), BaseStationId(1)]
    );
}
