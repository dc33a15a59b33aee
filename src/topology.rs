// SsBgp: Self-Stabilizing BGP Simulator written in Rust
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Topology
//!
//! The topology stores all routers and the directed, labeled links between them on a graph (see
//! [Petgraph](https://docs.rs/petgraph/latest/petgraph/index.html)). A link `source -> target`
//! transports the routes of `target` to `source`. Hence, a router learns from its out-neighbors
//! and exports to its in-neighbors.

use std::collections::HashMap;

use log::*;
use petgraph::{stable_graph::StableGraph, visit::EdgeRef, Directed, Direction};

use crate::{
    detection::{Detection, DetectionKind},
    export::MraiTimer,
    policy::{Label, Policy},
    route_table::RouteTable,
    types::{IndexType, LinkId, RouterId, Time, TopologyError},
};

/// Graph storing the links of the topology.
pub(crate) type LinkGraph<L> = StableGraph<(), Link<L>, Directed, IndexType>;

/// Directed link from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<L> {
    source: RouterId,
    target: RouterId,
    label: L,
    turned_off: bool,
}

impl<L: Label> Link<L> {
    pub(crate) fn new(source: RouterId, target: RouterId, label: L) -> Self {
        Self {
            source,
            target,
            label,
            turned_off: false,
        }
    }

    /// The router that learns routes over this link.
    pub fn source(&self) -> RouterId {
        self.source
    }

    /// The router that exports routes over this link.
    pub fn target(&self) -> RouterId {
        self.target
    }

    /// Identification of the link, `(source, target)`.
    pub fn id(&self) -> LinkId {
        (self.source, self.target)
    }

    /// The label of the link.
    pub fn label(&self) -> &L {
        &self.label
    }

    /// Extend an attribute over this link.
    pub fn extend(&self, attribute: &L::Attribute) -> L::Attribute {
        self.label.extend(self.id(), attribute)
    }

    /// Returns `true` if the link was turned off by the oscillation detection. A turned-off link
    /// does not carry any route.
    pub fn is_turned_off(&self) -> bool {
        self.turned_off
    }

    pub(crate) fn turn_off(&mut self) {
        self.turned_off = true;
    }
}

/// A router in the simulation.
#[derive(Debug)]
pub struct Router<P: Policy> {
    router_id: RouterId,
    mrai: Time,
    pub(crate) detection: Box<dyn Detection<P::Attribute>>,
    pub(crate) table: RouteTable<P::Attribute>,
    pub(crate) timer: MraiTimer<P::Attribute>,
}

impl<P: Policy> Router<P> {
    pub(crate) fn new(
        router_id: RouterId,
        mrai: Time,
        detection: Box<dyn Detection<P::Attribute>>,
    ) -> Self {
        Self {
            router_id,
            mrai,
            detection,
            table: RouteTable::new(),
            timer: MraiTimer::new(mrai),
        }
    }

    /// Return the id of the router
    pub fn router_id(&self) -> RouterId {
        self.router_id
    }

    /// Minimum route advertisement interval of the router. `0` disables batching.
    pub fn mrai(&self) -> Time {
        self.mrai
    }

    /// The oscillation detection strategy of the router.
    pub fn detection(&self) -> &dyn Detection<P::Attribute> {
        self.detection.as_ref()
    }

    /// The route table of the router.
    pub fn table(&self) -> &RouteTable<P::Attribute> {
        &self.table
    }

    /// The MRAI timer of the router.
    pub fn timer(&self) -> &MraiTimer<P::Attribute> {
        &self.timer
    }

    /// Forget all learned routes and stop the timer.
    pub(crate) fn reset(&mut self) {
        self.table.clear();
        self.timer.reset();
    }
}

/// # Topology
/// The topology owns all routers and links. It is built once before the simulation starts. During
/// the simulation, links may only be turned off.
///
/// ```rust
/// use ssbgp::prelude::*;
///
/// fn main() -> Result<(), TopologyError> {
///     let mut topo: Topology<ShortestPath> = Topology::new();
///
///     let r0 = topo.add_router(0, DetectionKind::Simple);
///     let r1 = topo.add_router(0, DetectionKind::Simple);
///     topo.add_link(r0, r1, CostLabel(1))?;
///     topo.add_link(r1, r0, CostLabel(1))?;
///
///     assert_eq!(topo.in_links(r0)?.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Topology<P: Policy> {
    pub(crate) graph: LinkGraph<P::Label>,
    pub(crate) routers: HashMap<RouterId, Router<P>>,
}

impl<P: Policy> Default for Topology<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Policy> Topology<P> {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self {
            graph: LinkGraph::default(),
            routers: HashMap::new(),
        }
    }

    /// Add a new router with the given MRAI and detection strategy. Returns the id of the new
    /// router. Routers are numbered in the order they are added, starting at `0`.
    pub fn add_router(&mut self, mrai: Time, detection: DetectionKind) -> RouterId {
        self.add_router_with(mrai, detection.build())
    }

    /// Add a new router using a custom detection strategy.
    pub fn add_router_with(
        &mut self,
        mrai: Time,
        detection: Box<dyn Detection<P::Attribute>>,
    ) -> RouterId {
        let router_id = self.graph.add_node(());
        self.routers
            .insert(router_id, Router::new(router_id, mrai, detection));
        router_id
    }

    /// Add a link from `source` to `target`. The source will learn the routes exported by the
    /// target.
    pub fn add_link(
        &mut self,
        source: RouterId,
        target: RouterId,
        label: P::Label,
    ) -> Result<(), TopologyError> {
        if source == target {
            return Err(TopologyError::SelfLoop(source));
        }
        self.get_router(source)?;
        self.get_router(target)?;
        if self.graph.find_edge(source, target).is_some() {
            return Err(TopologyError::LinkExists(source, target));
        }
        self.graph
            .add_edge(source, target, Link::new(source, target, label));
        Ok(())
    }

    /// Remove the link from `source` to `target`, and return it.
    pub fn remove_link(
        &mut self,
        source: RouterId,
        target: RouterId,
    ) -> Result<Link<P::Label>, TopologyError> {
        let edge = self
            .graph
            .find_edge(source, target)
            .ok_or(TopologyError::LinkNotFound(source, target))?;
        debug!("Remove link {} -> {}", source.index(), target.index());
        self.graph
            .remove_edge(edge)
            .ok_or(TopologyError::LinkNotFound(source, target))
    }

    /// Get a reference to a router.
    pub fn get_router(&self, router: RouterId) -> Result<&Router<P>, TopologyError> {
        self.routers
            .get(&router)
            .ok_or(TopologyError::RouterNotFound(router))
    }

    /// Get a reference to a link.
    pub fn get_link(
        &self,
        source: RouterId,
        target: RouterId,
    ) -> Result<&Link<P::Label>, TopologyError> {
        self.graph
            .find_edge(source, target)
            .map(|e| &self.graph[e])
            .ok_or(TopologyError::LinkNotFound(source, target))
    }

    /// All routers, ordered by id.
    pub fn get_routers(&self) -> Vec<RouterId> {
        let mut routers: Vec<RouterId> = self.routers.keys().copied().collect();
        routers.sort();
        routers
    }

    /// Number of routers.
    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Links over which `router` exports its routes (`* -> router`), ordered by their source.
    pub fn in_links(&self, router: RouterId) -> Result<Vec<&Link<P::Label>>, TopologyError> {
        self.get_router(router)?;
        Ok(in_links(&self.graph, router))
    }

    /// Links over which `router` learns routes (`router -> *`), ordered by their target.
    pub fn out_links(&self, router: RouterId) -> Result<Vec<&Link<P::Label>>, TopologyError> {
        self.get_router(router)?;
        let mut links: Vec<&Link<P::Label>> = self
            .graph
            .edges_directed(router, Direction::Outgoing)
            .map(|e| e.weight())
            .collect();
        links.sort_by_key(|l| l.target);
        Ok(links)
    }

    /// All links, ordered by `(source, target)`.
    pub fn links(&self) -> Vec<&Link<P::Label>> {
        let mut links: Vec<&Link<P::Label>> = self.graph.edge_weights().collect();
        links.sort_by_key(|l| l.id());
        links
    }

    /// All links that were turned off by the oscillation detection.
    pub fn turned_off_links(&self) -> Vec<LinkId> {
        self.links()
            .into_iter()
            .filter(|l| l.is_turned_off())
            .map(|l| l.id())
            .collect()
    }

    /// Clear all route tables and timers, and turn on all links again.
    pub(crate) fn reset(&mut self) {
        self.routers.values_mut().for_each(|r| r.reset());
        let edges: Vec<_> = self.graph.edge_indices().collect();
        for e in edges {
            self.graph[e].turned_off = false;
        }
    }
}

/// Links `* -> router`, ordered by their source.
pub(crate) fn in_links<L>(graph: &LinkGraph<L>, router: RouterId) -> Vec<&Link<L>> {
    let mut links: Vec<&Link<L>> = graph
        .edges_directed(router, Direction::Incoming)
        .map(|e| e.weight())
        .collect();
    links.sort_by_key(|l| l.source);
    links
}
