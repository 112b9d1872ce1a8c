//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into registry `Vec`s via `id.0 as usize`, but callers
//! should prefer the `.index()` helper for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the inner type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a registry index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identifies a `BaseStation` — a node of the topology graph.
    pub struct BaseStationId(u32);
}

typed_id! {
    /// Identifies an `EdgeServer` hosted at a base station.
    pub struct EdgeServerId(u32);
}

typed_id! {
    /// Identifies a `ContainerImage`.  Renumbered contiguously from 1 after
    /// every registry deprovisioning pass — do not treat as a stable handle
    /// across policy invocations.
    pub struct ContainerImageId(u32);
}

typed_id! {
    /// Identifies a `ContainerRegistry`.  Renumbered contiguously from 1 after
    /// every registry deprovisioning pass — do not treat as a stable handle
    /// across policy invocations.
    pub struct ContainerRegistryId(u32);
}

typed_id! {
    /// Identifies an `Application` (an ordered chain of services).
    pub struct ApplicationId(u32);
}

typed_id! {
    /// Identifies a `Service` within an application's chain.
    pub struct ServiceId(u32);
}

typed_id! {
    /// Identifies a `User`.
    pub struct UserId(u32);
}

typed_id! {
    /// Identifies an undirected topology link (edge).
    pub struct LinkId(u32);
}
