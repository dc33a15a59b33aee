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

use lazy_static::lazy_static;
use pretty_assertions::assert_eq;
use test_log::test;

use crate::{
    detection::DetectionKind,
    policy::{CostLabel, ShortestPath},
    topology::Topology,
    types::{RouterId, TopologyError},
};

lazy_static! {
    static ref R0: RouterId = 0.into();
    static ref R1: RouterId = 1.into();
    static ref R2: RouterId = 2.into();
    static ref R3: RouterId = 3.into();
}

fn get_test_topo() -> Topology<ShortestPath> {
    let mut topo: Topology<ShortestPath> = Topology::new();
    assert_eq!(*R0, topo.add_router(0, DetectionKind::Simple));
    assert_eq!(*R1, topo.add_router(5, DetectionKind::Path));
    assert_eq!(*R2, topo.add_router(0, DetectionKind::Dummy));
    topo.add_link(*R2, *R0, CostLabel(1)).unwrap();
    topo.add_link(*R1, *R0, CostLabel(2)).unwrap();
    topo.add_link(*R0, *R1, CostLabel(3)).unwrap();
    topo
}

#[test]
fn routers() {
    let topo = get_test_topo();
    assert_eq!(topo.num_routers(), 3);
    assert_eq!(topo.get_routers(), vec![*R0, *R1, *R2]);
    let r1 = topo.get_router(*R1).unwrap();
    assert_eq!(r1.router_id(), *R1);
    assert_eq!(r1.mrai(), 5);
    assert_eq!(r1.timer().period(), 5);
    assert_eq!(r1.detection().name(), "path");
    assert!(r1.table().is_empty());
    assert_eq!(
        topo.get_router(*R3).map(|r| r.router_id()),
        Err(TopologyError::RouterNotFound(*R3))
    );
}

#[test]
fn links() {
    let topo = get_test_topo();
    assert_eq!(topo.num_links(), 3);

    let in_links: Vec<_> = topo.in_links(*R0).unwrap().iter().map(|l| l.id()).collect();
    assert_eq!(in_links, vec![(*R1, *R0), (*R2, *R0)]);
    let out_links: Vec<_> = topo.out_links(*R0).unwrap().iter().map(|l| l.id()).collect();
    assert_eq!(out_links, vec![(*R0, *R1)]);
    assert!(topo.in_links(*R2).unwrap().is_empty());
    assert_eq!(
        topo.in_links(*R3).map(|l| l.len()),
        Err(TopologyError::RouterNotFound(*R3))
    );

    let l = topo.get_link(*R1, *R0).unwrap();
    assert_eq!(l.source(), *R1);
    assert_eq!(l.target(), *R0);
    assert_eq!(l.label(), &CostLabel(2));
    assert!(!l.is_turned_off());

    assert_eq!(
        topo.links().iter().map(|l| l.id()).collect::<Vec<_>>(),
        vec![(*R0, *R1), (*R1, *R0), (*R2, *R0)]
    );
}

#[test]
fn add_link_errors() {
    let mut topo = get_test_topo();
    assert_eq!(
        topo.add_link(*R0, *R1, CostLabel(1)),
        Err(TopologyError::LinkExists(*R0, *R1))
    );
    assert_eq!(
        topo.add_link(*R0, *R0, CostLabel(1)),
        Err(TopologyError::SelfLoop(*R0))
    );
    assert_eq!(
        topo.add_link(*R0, *R3, CostLabel(1)),
        Err(TopologyError::RouterNotFound(*R3))
    );
    assert_eq!(
        topo.add_link(*R3, *R0, CostLabel(1)),
        Err(TopologyError::RouterNotFound(*R3))
    );
    assert_eq!(topo.num_links(), 3);
}

#[test]
fn remove_link() {
    let mut topo = get_test_topo();
    let removed = topo.remove_link(*R1, *R0).unwrap();
    assert_eq!(removed.id(), (*R1, *R0));
    assert_eq!(topo.num_links(), 2);
    assert_eq!(
        topo.remove_link(*R1, *R0).map(|l| l.id()),
        Err(TopologyError::LinkNotFound(*R1, *R0))
    );
    assert_eq!(
        topo.get_link(*R1, *R0).map(|l| l.id()),
        Err(TopologyError::LinkNotFound(*R1, *R0))
    );
    // the link can be added again
    topo.add_link(*R1, *R0, CostLabel(7)).unwrap();
    assert_eq!(topo.get_link(*R1, *R0).unwrap().label(), &CostLabel(7));
}

#[test]
fn turn_off_and_reset() {
    let mut topo = get_test_topo();
    let edge = topo.graph.find_edge(*R2, *R0).unwrap();
    topo.graph[edge].turn_off();
    assert_eq!(topo.turned_off_links(), vec![(*R2, *R0)]);
    assert!(topo.get_link(*R2, *R0).unwrap().is_turned_off());

    topo.reset();
    assert!(topo.turned_off_links().is_empty());
}
