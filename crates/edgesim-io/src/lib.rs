//! `edgesim-io` — scenario loading and results reporting for the edgesim
//! edge-computing simulator.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                   |
//! |------------|-------------------------------------------------------------|
//! | `scenario` | [`load`] — JSON scenario file to `World` + `Topology` + `SimConfig`. |
//! | `report`   | [`AlgorithmReport`] — the printed/CSV results summary for one run. |
//! | `row`      | [`RegistryStepRow`], the report's per-step registry breakdown. |
//! | `error`    | [`IoError`], covering I/O, JSON, CSV, and dataset-validation failures. |
//!
//! # Usage
//!
//! ```rust,ignore
//! use edgesim_io::{load, AlgorithmReport};
//!
//! let (world, topology, config) = load(Path::new("datasets/campus.json"))?;
//! // ... build and run a Simulator ...
//! let report = AlgorithmReport::build("follow_user", &sim.metrics, &sim.world);
//! println!("{report}");
//! println!("{}", report.to_csv_line()?);
//! ```

pub mod error;
pub mod report;
pub mod row;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use error::{IoError, IoResult};
pub use report::{AlgorithmReport, MigrationStats};
pub use row::RegistryStepRow;
pub use scenario::load;
