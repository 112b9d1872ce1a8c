//! Undirected weighted topology graph and builder.
//!
//! Unlike a road network, a topology here is small (tens to low hundreds of
//! base stations) and its node ids are whatever the scenario file assigns,
//! not guaranteed dense from zero. Adjacency is therefore kept in hash maps
//! rather than the CSR arrays a city-scale road graph would want — the
//! access pattern (a handful of Dijkstra runs per step, not per-agent path
//! queries at agent-population scale) does not reward the extra bookkeeping.

use std::collections::{HashMap, HashSet};

use edgesim_core::{ApplicationId, BaseStationId, LinkId, ServiceId};

/// One undirected edge of the topology. Fields mirror the scenario's
/// `network.links` entries plus the mutable state the routing and migration
/// engines update during a run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub id: LinkId,
    pub a: BaseStationId,
    pub b: BaseStationId,
    pub delay: i64,
    pub bandwidth: i64,
    pub bandwidth_demand: i64,
    pub applications: HashSet<ApplicationId>,
    pub services_being_migrated: Vec<ServiceId>,
    pub active_power: Option<f64>,
    pub low_power_percentage: Option<f64>,
}

impl Link {
    /// The endpoint that is not `node`. Panics if `node` is neither endpoint
    /// — every caller reaches a link through adjacency, so this cannot miss.
    #[inline]
    pub fn other(&self, node: BaseStationId) -> BaseStationId {
        if self.a == node {
            self.b
        } else if self.b == node {
            self.a
        } else {
            panic!("{node} is not an endpoint of {}", self.id)
        }
    }
}

/// The weight function used by [`Topology::shortest_path`].
///
/// `BandwidthRaw` and `InverseBandwidth` look superficially like opposites
/// of the same idea but are not: `BandwidthRaw` feeds the raw bandwidth
/// value to Dijkstra as a cost, so *higher*-bandwidth edges are *penalized*,
/// not preferred — this is almost certainly not what whoever wrote the
/// original call sites intended, but changing it would change which paths
/// get chosen, so both modes are kept distinct and call sites must pick the
/// one the source actually used. See the migration-time calculation for the
/// call site that uses `BandwidthRaw` and the registry-removal pass that
/// uses `InverseBandwidth`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Weight {
    /// Every edge costs 1 — plain hop count.
    HopCount,
    /// Edge cost is `link.delay`.
    Delay,
    /// Edge cost is `link.bandwidth` taken as-is. Higher bandwidth is a
    /// *larger* cost under this mode, not a smaller one.
    BandwidthRaw,
    /// Edge cost is `1.0 / link.bandwidth`. Higher bandwidth is preferred.
    InverseBandwidth,
}

/// Undirected weighted graph over base-station nodes.
///
/// Do not construct directly; use [`TopologyBuilder`].
#[derive(Clone, Debug)]
pub struct Topology {
    nodes: Vec<BaseStationId>,
    links: HashMap<LinkId, Link>,
    adjacency: HashMap<BaseStationId, Vec<LinkId>>,
}

impl Topology {
    /// An empty topology with no nodes or links.
    pub fn empty() -> Self {
        TopologyBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = BaseStationId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(&id)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.links.values_mut()
    }

    /// The link directly joining `a` and `b`, if any.
    pub fn link_between(&self, a: BaseStationId, b: BaseStationId) -> Option<&Link> {
        self.adjacency
            .get(&a)?
            .iter()
            .filter_map(|id| self.links.get(id))
            .find(|link| link.other(a) == b)
    }

    /// Every link with `node` as an endpoint.
    pub fn links_incident(&self, node: BaseStationId) -> impl Iterator<Item = &Link> + '_ {
        self.adjacency
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.links.get(id))
    }

    /// Remove consecutive repeated nodes from a path. A walk that lingers at
    /// one base station for several steps (e.g. a trivial zero-hop "path")
    /// should not be treated as traversing an edge.
    pub fn deduplicate(path: &[BaseStationId]) -> Vec<BaseStationId> {
        let mut out: Vec<BaseStationId> = Vec::with_capacity(path.len());
        for &node in path {
            if out.last() != Some(&node) {
                out.push(node);
            }
        }
        out
    }

    /// Sum of `link.delay` along the deduplicated path.
    pub fn path_delay(&self, path: &[BaseStationId]) -> i64 {
        let path = Self::deduplicate(path);
        path.windows(2)
            .filter_map(|pair| self.link_between(pair[0], pair[1]))
            .map(|link| link.delay)
            .sum()
    }

    /// Minimum `link.bandwidth` along the deduplicated path. A one-node path
    /// has no edges to constrain it, so it returns `+infinity`.
    pub fn path_min_bandwidth(&self, path: &[BaseStationId]) -> f64 {
        let path = Self::deduplicate(path);
        path.windows(2)
            .filter_map(|pair| self.link_between(pair[0], pair[1]))
            .map(|link| link.bandwidth as f64)
            .fold(f64::INFINITY, f64::min)
    }

    /// Dijkstra's algorithm over strictly positive edge weights, per
    /// [`Weight`]. Returns the node sequence from `source` to `target`
    /// inclusive, or [`TopologyError::PathNotFound`] when disconnected.
    pub fn shortest_path(
        &self,
        source: BaseStationId,
        target: BaseStationId,
        weight: Weight,
    ) -> crate::TopologyResult<Vec<BaseStationId>> {
        if source == target {
            return Ok(vec![source]);
        }

        let mut dist: HashMap<BaseStationId, f64> = HashMap::new();
        let mut prev: HashMap<BaseStationId, BaseStationId> = HashMap::new();
        let mut heap: std::collections::BinaryHeap<std::cmp::Reverse<HeapEntry>> =
            std::collections::BinaryHeap::new();

        dist.insert(source, 0.0);
        heap.push(std::cmp::Reverse(HeapEntry {
            cost: 0.0,
            node: source,
        }));

        while let Some(std::cmp::Reverse(HeapEntry { cost, node })) = heap.pop() {
            if node == target {
                return Ok(self.reconstruct(prev, target));
            }
            if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
                continue;
            }

            let Some(incident) = self.adjacency.get(&node) else {
                continue;
            };
            for link_id in incident {
                let link = &self.links[link_id];
                let neighbor = link.other(node);
                let edge_cost = edge_weight(link, weight);
                let candidate = cost + edge_cost;
                if candidate < *dist.get(&neighbor).unwrap_or(&f64::INFINITY) {
                    dist.insert(neighbor, candidate);
                    prev.insert(neighbor, node);
                    heap.push(std::cmp::Reverse(HeapEntry {
                        cost: candidate,
                        node: neighbor,
                    }));
                }
            }
        }

        Err(crate::TopologyError::PathNotFound {
            from: source,
            to: target,
        })
    }

    fn reconstruct(
        &self,
        prev: HashMap<BaseStationId, BaseStationId>,
        target: BaseStationId,
    ) -> Vec<BaseStationId> {
        let mut path = vec![target];
        let mut cur = target;
        while let Some(&p) = prev.get(&cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        path
    }
}

#[inline]
fn edge_weight(link: &Link, weight: Weight) -> f64 {
    match weight {
        Weight::HopCount => 1.0,
        Weight::Delay => link.delay as f64,
        Weight::BandwidthRaw => link.bandwidth as f64,
        Weight::InverseBandwidth => 1.0 / link.bandwidth as f64,
    }
}

/// Min-heap entry ordered by `cost`, tie-broken by `node` for determinism.
#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    cost: f64,
    node: BaseStationId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.node == other.node
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Construct a [`Topology`] incrementally, then call [`build`](Self::build).
pub struct TopologyBuilder {
    nodes: Vec<BaseStationId>,
    links: HashMap<LinkId, Link>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, id: BaseStationId) {
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
    }

    /// Add an undirected link. Both endpoints must already have been added
    /// with [`add_node`](Self::add_node).
    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link.id, link);
    }

    pub fn build(self) -> Topology {
        let mut adjacency: HashMap<BaseStationId, Vec<LinkId>> = HashMap::new();
        for link in self.links.values() {
            adjacency.entry(link.a).or_default().push(link.id);
            adjacency.entry(link.b).or_default().push(link.id);
        }
        Topology {
            nodes: self.nodes,
            links: self.links,
            adjacency,
        }
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
