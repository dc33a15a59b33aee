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

use pretty_assertions::assert_eq;
use test_log::test;

use crate::{
    builder::*,
    detection::DetectionKind,
    policy::{CostLabel, GaoRexfordLabel, ShortestPath},
    topology::Topology,
    types::{RouterId, TopologyError},
};

use super::link;

#[test]
fn build_routers() {
    let mut topo: Topology<ShortestPath> = Topology::new();
    let routers = topo.build_routers(3, 4, DetectionKind::Neighbor);
    assert_eq!(routers, (0..3).map(RouterId::new).collect::<Vec<_>>());
    for r in routers {
        let router = topo.get_router(r).unwrap();
        assert_eq!(router.mrai(), 4);
        assert_eq!(router.detection().name(), "neighbor");
    }
    assert_eq!(topo.build_routers(0, 0, DetectionKind::Simple), Vec::new());
}

#[test]
fn build_links() {
    let mut topo: Topology<ShortestPath> = Topology::new();
    let r = topo.build_routers(3, 0, DetectionKind::Simple);
    topo.build_links([(r[0], r[1]), (r[1], r[2]), (r[2], r[0])], |s, t| {
        CostLabel((s.index() * 10 + t.index()) as u32)
    })
    .unwrap();
    assert_eq!(topo.num_links(), 3);
    assert_eq!(topo.get_link(r[1], r[2]).unwrap().label(), &CostLabel(12));

    assert_eq!(
        topo.build_links([(r[0], r[2]), (r[0], r[1])], |_, _| CostLabel(1)),
        Err(TopologyError::LinkExists(r[0], r[1]))
    );
    // links before the failing one are kept
    assert_eq!(topo.num_links(), 4);
}

#[test]
fn build_peering() {
    let mut topo: Topology<ShortestPath> = Topology::new();
    let r = topo.build_routers(2, 0, DetectionKind::Simple);
    topo.build_peering(r[0], r[1], CostLabel(1), CostLabel(2))
        .unwrap();
    assert_eq!(topo.get_link(r[0], r[1]).unwrap().label(), &CostLabel(1));
    assert_eq!(topo.get_link(r[1], r[0]).unwrap().label(), &CostLabel(2));
    assert_eq!(
        topo.build_peering(r[0], r[0], CostLabel(1), CostLabel(1)),
        Err(TopologyError::SelfLoop(r[0]))
    );
}

#[test]
fn gadgets() {
    let topo = shortest_path_pair(DetectionKind::Simple).unwrap();
    assert_eq!(topo.num_routers(), 2);
    assert_eq!(
        topo.links().iter().map(|l| l.id()).collect::<Vec<_>>(),
        vec![link(0, 1), link(1, 0)]
    );

    let topo = customer_chain(DetectionKind::Simple).unwrap();
    assert_eq!(topo.num_routers(), 3);
    assert_eq!(
        topo.links()
            .iter()
            .map(|l| (l.id(), *l.label()))
            .collect::<Vec<_>>(),
        vec![
            (link(0, 1), GaoRexfordLabel::Customer),
            (link(1, 0), GaoRexfordLabel::Provider),
            (link(1, 2), GaoRexfordLabel::Provider),
            (link(2, 1), GaoRexfordLabel::Customer),
        ]
    );

    let topo = provider_cycle(DetectionKind::Path, 3).unwrap();
    assert_eq!(topo.num_routers(), 4);
    assert_eq!(topo.num_links(), 6);
    assert!(topo.links().iter().all(|l| *l.label() == GaoRexfordLabel::Customer));
    assert_eq!(topo.get_router(RouterId::new(2)).unwrap().mrai(), 3);
    assert!(topo.in_links(RouterId::new(3)).unwrap().len() == 3);

    let topo = provider_triangle(DetectionKind::Dummy, 0).unwrap();
    assert_eq!(
        topo.links().iter().map(|l| l.id()).collect::<Vec<_>>(),
        vec![link(0, 1), link(0, 3), link(1, 2), link(2, 0)]
    );
}
