//! Unit tests for edgesim-policy.

use std::collections::{HashMap, HashSet};

use edgesim_core::{
    ApplicationId, BaseStationId, ContainerImageId, ContainerRegistryId, Coordinates,
    EdgeServerId, LinkId, ServiceId, Step, UserId,
};
use edgesim_entities::{
    Application, BaseStation, ContainerImage, ContainerRegistry, EdgeServer, ImageLayer, Service,
    User, World,
};
use edgesim_topology::{Link, Topology, TopologyBuilder};

use crate::{FollowUser, NeverFollow, Policy, PolicyParams, ProposedHeuristic};

fn base_station(id: u32, x: f64) -> BaseStation {
    BaseStation {
        id: BaseStationId(id),
        coordinates: Coordinates::new(x, 0.0),
        wireless_delay: 0,
        users: vec![],
        edge_servers: vec![],
        chassis_power: None,
        power_model: None,
    }
}

fn edge_server(id: u32, base_station: u32, capacity: i64) -> EdgeServer {
    EdgeServer {
        id: EdgeServerId(id),
        coordinates: Coordinates::new(0.0, 0.0),
        capacity,
        demand: 0,
        base_station: BaseStationId(base_station),
        services: vec![],
        container_registries: vec![],
        max_power: 100.0,
        static_power_percentage: 0.5,
        power_model: None,
    }
}

/// Linear chain of base stations 1..=n, each link `delay`/`bandwidth`.
fn chain_topology(n: u32, delay: i64, bandwidth: i64) -> Topology {
    let mut b = TopologyBuilder::new();
    for id in 1..=n {
        b.add_node(BaseStationId(id));
    }
    for id in 1..n {
        b.add_link(Link {
            id: LinkId(id),
            a: BaseStationId(id),
            b: BaseStationId(id + 1),
            delay,
            bandwidth,
            bandwidth_demand: 0,
            applications: HashSet::new(),
            services_being_migrated: vec![],
            active_power: None,
            low_power_percentage: None,
        });
    }
    b.build()
}

fn user(id: u32, base_station: u32, app: u32, delay_sla: f64, prov_sla: f64) -> User {
    User {
        id: UserId(id),
        coordinates: Coordinates::new(0.0, 0.0),
        coordinates_trace: vec![],
        base_station: BaseStationId(base_station),
        applications: vec![ApplicationId(app)],
        communication_paths: HashMap::new(),
        delays: HashMap::new(),
        delay_slas: HashMap::from([(ApplicationId(app), delay_sla)]),
        provisioning_time_slas: HashMap::from([(ApplicationId(app), prov_sla)]),
    }
}

// ── never_follow ─────────────────────────────────────────────────────────────

#[test]
fn never_follow_is_a_true_noop() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.edge_servers.insert(edge_server(1, 1, 1000));
    world.services.insert(Service {
        id: ServiceId(1),
        demand: 5,
        layers: vec![],
        server: Some(EdgeServerId(1)),
        application: ApplicationId(1),
        migrations: vec![],
    });
    let mut topo = chain_topology(1, 1, 4);
    let before = world.clone();

    NeverFollow
        .apply(&mut world, &mut topo, &PolicyParams { delay_threshold: 0.5, prov_time_threshold: 0.5 }, Step(1))
        .unwrap();

    assert_eq!(world.services.first().unwrap().server, before.services.first().unwrap().server);
    assert!(world.services.first().unwrap().migrations.is_empty());
}

// ── follow_user ──────────────────────────────────────────────────────────────

#[test]
fn follow_user_migrates_to_closer_server_with_capacity() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.base_stations.insert(base_station(2, 1.0));
    world.base_stations.insert(base_station(3, 2.0));
    // Service currently on the far server (base station 3); a closer,
    // roomy server sits right on the user's base station.
    world.edge_servers.insert(edge_server(1, 3, 1000));
    world.edge_servers.insert(edge_server(2, 1, 1000));
    world.applications.insert(Application {
        id: ApplicationId(1),
        services: vec![ServiceId(1)],
        users: vec![UserId(1)],
    });
    world.services.insert(Service {
        id: ServiceId(1),
        demand: 5,
        layers: vec![],
        server: Some(EdgeServerId(1)),
        application: ApplicationId(1),
        migrations: vec![],
    });
    if let Some(s) = world.edge_servers.find_by_id_mut(EdgeServerId(1)) {
        s.demand = 5;
        s.services.push(ServiceId(1));
    }
    world.users.insert(user(1, 1, 1, 1000.0, 1000.0));

    let mut topo = chain_topology(3, 5, 4);
    let params = PolicyParams { delay_threshold: 0.5, prov_time_threshold: 0.5 };

    FollowUser { corrected_formula: false }
        .apply(&mut world, &mut topo, &params, Step(1))
        .unwrap();

    let service = world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(2)));
    assert_eq!(service.migrations.len(), 1);

    let origin = world.edge_servers.find_by_id(EdgeServerId(1)).unwrap();
    assert_eq!(origin.demand, 0);
    let target = world.edge_servers.find_by_id(EdgeServerId(2)).unwrap();
    assert_eq!(target.demand, 5);

    let user = world.users.find_by_id(UserId(1)).unwrap();
    assert!(user.communication_paths.contains_key(&ApplicationId(1)));
}

#[test]
fn follow_user_leaves_already_best_placed_service_alone() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.edge_servers.insert(edge_server(1, 1, 1000));
    world.applications.insert(Application {
        id: ApplicationId(1),
        services: vec![ServiceId(1)],
        users: vec![UserId(1)],
    });
    world.services.insert(Service {
        id: ServiceId(1),
        demand: 5,
        layers: vec![],
        server: Some(EdgeServerId(1)),
        application: ApplicationId(1),
        migrations: vec![],
    });
    world.users.insert(user(1, 1, 1, 1000.0, 1000.0));

    let mut topo = chain_topology(1, 1, 4);
    let params = PolicyParams { delay_threshold: 0.5, prov_time_threshold: 0.5 };

    FollowUser { corrected_formula: false }
        .apply(&mut world, &mut topo, &params, Step(1))
        .unwrap();

    let service = world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(1)));
    assert!(service.migrations.is_empty());
}

// ── proposed_heuristic ───────────────────────────────────────────────────────

#[test]
fn proposed_heuristic_skips_migration_when_delay_within_threshold() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.base_stations.insert(base_station(2, 1.0));
    world.edge_servers.insert(edge_server(1, 2, 1000));
    world.edge_servers.insert(edge_server(2, 1, 1000));
    world.applications.insert(Application {
        id: ApplicationId(1),
        services: vec![ServiceId(1)],
        users: vec![UserId(1)],
    });
    world.services.insert(Service {
        id: ServiceId(1),
        demand: 5,
        layers: vec![],
        server: Some(EdgeServerId(1)),
        application: ApplicationId(1),
        migrations: vec![],
    });
    let mut u = user(1, 1, 1, 1000.0, 1000.0);
    u.delays.insert(ApplicationId(1), 1.0);
    world.users.insert(u);

    let mut topo = chain_topology(2, 1, 4);
    // delay_threshold=0.5 → L_a = 1000*0.5 = 500, current delay 1.0 stays under it.
    let params = PolicyParams { delay_threshold: 0.5, prov_time_threshold: 0.5 };

    ProposedHeuristic { corrected_formula: false }
        .apply(&mut world, &mut topo, &params, Step(1))
        .unwrap();

    let service = world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(1)));
    assert!(service.migrations.is_empty());
}

#[test]
fn proposed_heuristic_slow_migration_drives_phase_c_provisioning() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.base_stations.insert(base_station(2, 1.0));
    world.base_stations.insert(base_station(3, 2.0));
    // Server A hosts the service and the only registry, far from the user.
    world.edge_servers.insert(edge_server(1, 3, 1000));
    // Server B is empty, has no registry, and sits on the user's base station.
    world.edge_servers.insert(edge_server(2, 1, 1000));

    world.container_registries.insert(ContainerRegistry {
        id: ContainerRegistryId(1),
        server: Some(EdgeServerId(1)),
        images: vec![ContainerImageId(1)],
        base_footprint: 0,
        provisioning_time: 0,
        migrations: vec![],
    });
    world.container_images.insert(ContainerImage {
        id: ContainerImageId(1),
        size: 100,
        name: "X".to_string(),
        layer: ImageLayer::Application,
        container_registry: Some(ContainerRegistryId(1)),
    });

    world.applications.insert(Application {
        id: ApplicationId(1),
        services: vec![ServiceId(1)],
        users: vec![UserId(1)],
    });
    world.services.insert(Service {
        id: ServiceId(1),
        demand: 5,
        layers: vec!["X".to_string()],
        server: Some(EdgeServerId(1)),
        application: ApplicationId(1),
        migrations: vec![],
    });
    if let Some(s) = world.edge_servers.find_by_id_mut(EdgeServerId(1)) {
        s.demand = 5;
        s.services.push(ServiceId(1));
        s.container_registries.push(ContainerRegistryId(1));
    }

    let mut u = user(1, 1, 1, 20.0, 10.0);
    u.delays.insert(ApplicationId(1), 10.0);
    world.users.insert(u);

    // Chain of 3 base stations, delay 5 and bandwidth 4 on every hop.
    let mut topo = chain_topology(3, 5, 4);

    // L_a = 20*0.1 = 2, current delay 10 > 2 → migration attempted.
    // P_a = 10*0.5 = 5; migration cost over 2 hops at bandwidth 4 for a
    // 100-unit image is (100/4)*2 = 50 > 5 → user lands in U_slow.
    let params = PolicyParams { delay_threshold: 0.1, prov_time_threshold: 0.5 };

    ProposedHeuristic { corrected_formula: false }
        .apply(&mut world, &mut topo, &params, Step(1))
        .unwrap();

    let service = world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(2)));
    assert_eq!(service.migrations.len(), 1);
    assert_eq!(service.migrations[0].duration, 50.0);

    // Phase C: server B had no registry and capacity for the 100-unit
    // required footprint, and hosts the user directly, so it gets one.
    assert_eq!(world.container_registries.count(), 2);
    let server_b = world.edge_servers.find_by_id(EdgeServerId(2)).unwrap();
    assert_eq!(server_b.container_registries.len(), 1);
    assert_eq!(server_b.demand, 5 + 100);
}
