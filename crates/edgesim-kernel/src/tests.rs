//! Integration tests for edgesim-kernel.

use std::collections::{HashMap, HashSet};

use edgesim_core::{
    ApplicationId, BaseStationId, ContainerRegistryId, Coordinates, EdgeServerId, LinkId,
    ServiceId, Step, UserId,
};
use edgesim_entities::{Application, BaseStation, EdgeServer, Service, User, World};
use edgesim_policy::{FollowUser, NeverFollow, PolicyParams, ProposedHeuristic};
use edgesim_topology::{Link, Topology, TopologyBuilder};

use crate::{NoopObserver, SimulatorBuilder, StepLimit};

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

fn single_service_world() -> World {
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
    if let Some(s) = world.edge_servers.find_by_id_mut(EdgeServerId(1)) {
        s.demand = 5;
        s.services.push(ServiceId(1));
    }
    world.users.insert(user(1, 1, 1, 1000.0, 1000.0));
    world
}

#[test]
fn never_follow_run_produces_zero_migrations_over_several_steps() {
    let world = single_service_world();
    let topology = chain_topology(1, 1, 4);

    let mut sim = SimulatorBuilder::new()
        .world(world)
        .topology(topology)
        .policy(NeverFollow)
        .params(PolicyParams {
            delay_threshold: 0.5,
            prov_time_threshold: 0.5,
        })
        .build();

    sim.run(StepLimit(3), &mut NoopObserver).unwrap();

    assert_eq!(sim.metrics.len(), 4); // steps 1, 2, 3, plus the final snapshot
    for step_metrics in &sim.metrics {
        for service in &step_metrics.services {
            assert!(service.migrations_last_step.is_empty());
        }
    }
    let service = sim.world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(1)));
}

#[test]
fn run_advances_current_step_past_the_limit() {
    let world = single_service_world();
    let topology = chain_topology(1, 1, 4);

    let mut sim = SimulatorBuilder::new()
        .world(world)
        .topology(topology)
        .policy(NeverFollow)
        .build();

    sim.run(StepLimit(5), &mut NoopObserver).unwrap();

    assert_eq!(sim.current_step, Step(6));
}

#[test]
fn restore_original_state_undoes_a_follow_user_migration() {
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.base_stations.insert(base_station(2, 1.0));
    world.base_stations.insert(base_station(3, 2.0));
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
    let topology = chain_topology(3, 5, 4);

    let mut sim = SimulatorBuilder::new()
        .world(world)
        .topology(topology)
        .policy(FollowUser {
            corrected_formula: false,
        })
        .params(PolicyParams {
            delay_threshold: 0.5,
            prov_time_threshold: 0.5,
        })
        .build();

    sim.run(StepLimit(1), &mut NoopObserver).unwrap();

    // The run's own restore pass should have put the service right back,
    // migration history and all, even though a migration happened mid-run.
    let service = sim.world.services.find_by_id(ServiceId(1)).unwrap();
    assert_eq!(service.server, Some(EdgeServerId(1)));
    assert!(service.migrations.is_empty());
    let origin = sim.world.edge_servers.find_by_id(EdgeServerId(1)).unwrap();
    assert_eq!(origin.demand, 5);
}

#[test]
fn proposed_heuristic_registry_deprovisioning_stays_contiguous() {
    // Five registries, none of which is the farthest until the policy
    // deprovisions the surplus; renumbering must leave ids 1..=N contiguous.
    let mut world = World::new();
    world.base_stations.insert(base_station(1, 0.0));
    world.edge_servers.insert(edge_server(1, 1, 1000));
    world.users.insert(user(1, 1, 1, 1000.0, 1000.0));
    world.applications.insert(Application {
        id: ApplicationId(1),
        services: vec![],
        users: vec![UserId(1)],
    });

    for i in 1..=5u32 {
        world.container_registries.insert(edgesim_entities::ContainerRegistry {
            id: ContainerRegistryId(i),
            server: Some(EdgeServerId(1)),
            images: vec![],
            base_footprint: 0,
            provisioning_time: 0,
            migrations: vec![],
        });
    }
    let topology = chain_topology(1, 1, 4);

    let mut sim = SimulatorBuilder::new()
        .world(world)
        .topology(topology)
        .policy(ProposedHeuristic {
            corrected_formula: false,
        })
        .params(PolicyParams {
            delay_threshold: 1.0,
            prov_time_threshold: 1.0,
        })
        .build();

    sim.run(StepLimit(1), &mut NoopObserver).unwrap();

    let ids: Vec<u32> = sim
        .world
        .container_registries
        .all()
        .iter()
        .map(|r| r.id.0)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    let expected: Vec<u32> = (1..=sorted.len() as u32).collect();
    assert_eq!(sorted, expected, "registry ids must stay 1..N contiguous");
}
