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

//! Module for building topologies quickly, and a set of small topologies (gadgets) with known
//! behavior.

use crate::{
    detection::DetectionKind,
    policy::{CostLabel, GaoRexford, GaoRexfordLabel, Policy, ShortestPath},
    topology::Topology,
    types::{RouterId, Time, TopologyError},
};

/// Trait for building topologies quickly.
///
/// ```
/// use ssbgp::prelude::*;
/// use ssbgp::builder::TopologyBuilder;
///
/// # fn main() -> Result<(), TopologyError> {
/// let mut topo: Topology<ShortestPath> = Topology::new();
/// let routers = topo.build_routers(4, 0, DetectionKind::Path);
/// // a line of routers, where each router learns from both of its neighbors
/// for w in routers.windows(2) {
///     topo.build_peering(w[0], w[1], CostLabel(1), CostLabel(1))?;
/// }
/// assert_eq!(topo.num_links(), 6);
/// # Ok(())
/// # }
/// ```
pub trait TopologyBuilder<P: Policy> {
    /// Add `n` routers with the same MRAI and detection strategy, and return their ids.
    fn build_routers(&mut self, n: usize, mrai: Time, detection: DetectionKind) -> Vec<RouterId>;

    /// Add a link for every pair `(source, target)`. The function `label` is called with the
    /// source and the target to compute the label of each link.
    fn build_links<I, F>(&mut self, links: I, label: F) -> Result<(), TopologyError>
    where
        I: IntoIterator<Item = (RouterId, RouterId)>,
        F: FnMut(RouterId, RouterId) -> P::Label;

    /// Add the link `a -> b` with label `forward`, and the link `b -> a` with label `backward`.
    fn build_peering(
        &mut self,
        a: RouterId,
        b: RouterId,
        forward: P::Label,
        backward: P::Label,
    ) -> Result<(), TopologyError>;
}

impl<P: Policy> TopologyBuilder<P> for Topology<P> {
    fn build_routers(&mut self, n: usize, mrai: Time, detection: DetectionKind) -> Vec<RouterId> {
        (0..n).map(|_| self.add_router(mrai, detection)).collect()
    }

    fn build_links<I, F>(&mut self, links: I, mut label: F) -> Result<(), TopologyError>
    where
        I: IntoIterator<Item = (RouterId, RouterId)>,
        F: FnMut(RouterId, RouterId) -> P::Label,
    {
        for (source, target) in links {
            self.add_link(source, target, label(source, target))?;
        }
        Ok(())
    }

    fn build_peering(
        &mut self,
        a: RouterId,
        b: RouterId,
        forward: P::Label,
        backward: P::Label,
    ) -> Result<(), TopologyError> {
        self.add_link(a, b, forward)?;
        self.add_link(b, a, backward)
    }
}

fn links(pairs: &[(usize, usize)]) -> Vec<(RouterId, RouterId)> {
    pairs
        .iter()
        .map(|(s, t)| (RouterId::new(*s), RouterId::new(*t)))
        .collect()
}

/// Two routers `0` and `1` learning from each other over links of cost `1`.
pub fn shortest_path_pair(
    detection: DetectionKind,
) -> Result<Topology<ShortestPath>, TopologyError> {
    let mut topo: Topology<ShortestPath> = Topology::new();
    let r = topo.build_routers(2, 0, detection);
    topo.build_peering(r[0], r[1], CostLabel(1), CostLabel(1))?;
    Ok(topo)
}

/// Router `1` is the provider of routers `0` and `2`.
pub fn customer_chain(detection: DetectionKind) -> Result<Topology<GaoRexford>, TopologyError> {
    let mut topo: Topology<GaoRexford> = Topology::new();
    let r = topo.build_routers(3, 0, detection);
    topo.build_peering(r[0], r[1], GaoRexfordLabel::Customer, GaoRexfordLabel::Provider)?;
    topo.build_peering(r[2], r[1], GaoRexfordLabel::Customer, GaoRexfordLabel::Provider)?;
    Ok(topo)
}

/// Three routers `0`, `1` and `2`, each of them a customer of the destination `3` and of the next
/// router in the cycle `0 -> 1 -> 2 -> 0`. Every router prefers the route over the next router in
/// the cycle (lower id) to the direct route, as long as it exists. Without oscillation detection,
/// this never converges.
pub fn provider_cycle(
    detection: DetectionKind,
    mrai: Time,
) -> Result<Topology<GaoRexford>, TopologyError> {
    let mut topo: Topology<GaoRexford> = Topology::new();
    topo.build_routers(4, mrai, detection);
    topo.build_links(
        links(&[(0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)]),
        |_, _| GaoRexfordLabel::Customer,
    )?;
    Ok(topo)
}

/// Like [`provider_cycle`], but only router `0` is connected to the destination `3`. Routers `1`
/// and `2` can only reach the destination through the cycle.
pub fn provider_triangle(
    detection: DetectionKind,
    mrai: Time,
) -> Result<Topology<GaoRexford>, TopologyError> {
    let mut topo: Topology<GaoRexford> = Topology::new();
    topo.build_routers(4, mrai, detection);
    topo.build_links(links(&[(0, 3), (0, 1), (1, 2), (2, 0)]), |_, _| {
        GaoRexfordLabel::Customer
    })?;
    Ok(topo)
}
