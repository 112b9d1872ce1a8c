//! Power-consumption models bound by name from scenario data.
//!
//! The scenario format names a power model per base station / edge server
//! (`power_model: "LinearServerPower" | "SwitchPower"`) rather than encoding
//! formula parameters directly, so the kernel's per-step metrics collection
//! dispatches on [`PowerModelKind`] to get a consumption figure for a device
//! that did not otherwise need to know how power is computed.

use crate::{EdgeServer, PowerModelKind};

/// Power consumption of an edge server under a linear model:
/// a static floor plus a component proportional to utilization.
pub fn linear_server_power(server: &EdgeServer) -> f64 {
    let static_power = server.static_power_percentage * server.max_power;
    let constant = (server.max_power - static_power) / 100.0;
    let utilization = if server.capacity == 0 {
        0.0
    } else {
        server.demand as f64 / server.capacity as f64
    };
    static_power + constant * utilization * 100.0
}

/// Power consumption of a network link port under a piecewise-linear
/// idle/active model keyed on bandwidth utilization.
pub fn switch_port_power(
    active_power: f64,
    low_power_percentage: f64,
    bandwidth_demand: i64,
    bandwidth: i64,
) -> f64 {
    let low_power = low_power_percentage * active_power;
    let load = if bandwidth == 0 {
        0.0
    } else {
        bandwidth_demand as f64 / bandwidth as f64
    };
    low_power * (1.0 - load) + active_power * load
}

/// Dispatches on an edge server's bound power model, falling back to the
/// linear model when none is configured (scenarios are not required to set
/// `power_model` on every device).
pub fn server_power_consumption(server: &EdgeServer) -> f64 {
    match server.power_model {
        Some(PowerModelKind::LinearServerPower) | None => linear_server_power(server),
        Some(PowerModelKind::SwitchPower) => {
            // A server bound to the switch model has no single "load"
            // without link context; treat it as the linear case.
            linear_server_power(server)
        }
    }
}
