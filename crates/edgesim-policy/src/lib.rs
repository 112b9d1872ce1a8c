//! `edgesim-policy` — pluggable placement/migration policies.
//!
//! # Crate layout
//!
//! | Module                | Contents                                                |
//! |------------------------|---------------------------------------------------------|
//! | [`model`]              | `Policy` trait, `PolicyParams`                          |
//! | [`placement`]          | Shared greedy placement rule (delay-sorted candidates)  |
//! | [`noop`]               | `NeverFollow` — no-op baseline                          |
//! | [`follow_user`]        | `FollowUser` — registry-free reactive migration          |
//! | [`proposed_heuristic`] | `ProposedHeuristic` — SLA-gated migration + registry loop |
//! | [`error`]              | `PolicyError`, `PolicyResult<T>`                         |

pub mod error;
pub mod follow_user;
pub mod model;
pub mod noop;
pub mod placement;
pub mod proposed_heuristic;

#[cfg(test)]
mod tests;

pub use error::{PolicyError, PolicyResult};
pub use follow_user::FollowUser;
pub use model::{Policy, PolicyParams};
pub use noop::NeverFollow;
pub use proposed_heuristic::ProposedHeuristic;
