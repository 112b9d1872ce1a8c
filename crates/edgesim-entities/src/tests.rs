//! Unit tests for edgesim-entities.

use std::collections::HashMap;

use edgesim_core::{BaseStationId, ContainerImageId, ContainerRegistryId, Coordinates};

use crate::{ContainerImage, ContainerRegistry, ImageLayer, Registry};

fn image(id: u32, name: &str, size: i64) -> ContainerImage {
    ContainerImage {
        id: ContainerImageId(id),
        size,
        name: name.to_string(),
        layer: ImageLayer::Application,
        container_registry: None,
    }
}

#[test]
fn registry_all_first_count() {
    let mut reg: Registry<ContainerImage> = Registry::new();
    assert_eq!(reg.count(), 0);
    assert!(reg.first().is_none());

    reg.insert(image(1, "a", 10));
    reg.insert(image(2, "b", 20));

    assert_eq!(reg.count(), 2);
    assert_eq!(reg.first().unwrap().id, ContainerImageId(1));
    assert_eq!(reg.all().len(), 2);
}

#[test]
fn registry_find_by_id_and_predicate() {
    let mut reg: Registry<ContainerImage> = Registry::new();
    reg.insert(image(1, "os", 5));
    reg.insert(image(2, "runtime", 7));
    reg.insert(image(3, "os", 9));

    assert_eq!(reg.find_by_id(ContainerImageId(2)).unwrap().name, "runtime");
    assert!(reg.find_by_id(ContainerImageId(99)).is_none());

    let os_images: Vec<_> = reg.find_by(|img| img.name == "os").collect();
    assert_eq!(os_images.len(), 2);
}

#[test]
fn registry_remove_and_renumber() {
    let mut reg: Registry<ContainerRegistry> = Registry::new();
    for i in 1..=5u32 {
        reg.insert(ContainerRegistry {
            id: ContainerRegistryId(i),
            server: None,
            images: vec![],
            base_footprint: 0,
            provisioning_time: 0,
            migrations: vec![],
        });
    }

    reg.remove_by_id(ContainerRegistryId(2));
    reg.remove_by_id(ContainerRegistryId(4));
    assert_eq!(reg.count(), 3);

    reg.renumber_from_one();
    let ids: Vec<u32> = reg.all().iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn distinct_image_names_dedupes() {
    let images = vec![image(1, "os", 1), image(2, "os", 1), image(3, "runtime", 1)];
    let names = crate::distinct_image_names(&images);
    assert_eq!(names.len(), 2);
}

#[test]
fn user_delay_degraded_applications() {
    use edgesim_core::ApplicationId;

    let app = ApplicationId(1);
    let mut delays = HashMap::new();
    delays.insert(app, 95.0);
    let mut slas = HashMap::new();
    slas.insert(app, 100.0);

    let user = crate::User {
        id: edgesim_core::UserId(1),
        coordinates: Coordinates::new(0.0, 0.0),
        coordinates_trace: vec![],
        base_station: BaseStationId(1),
        applications: vec![app],
        communication_paths: HashMap::new(),
        delays,
        delay_slas: slas,
        provisioning_time_slas: HashMap::new(),
    };

    // threshold 0.9 -> SLA*0.9 = 90, delay 95 > 90 -> degraded
    assert_eq!(user.delay_degraded_applications(0.9), vec![app]);
    // threshold 0.99 -> SLA*0.99 = 99, delay 95 <= 99 -> not degraded
    assert!(user.delay_degraded_applications(0.99).is_empty());
}
