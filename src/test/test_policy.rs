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

use super::link;
use crate::policy::{
    Attribute, CostLabel, GaoRexford, GaoRexfordAttribute, GaoRexfordLabel, Label, Policy,
    ShortestPath, ShortestPathAttribute,
};

#[test]
fn shortest_path_order() {
    use ShortestPathAttribute::*;
    assert!(Length(1) > Length(2));
    assert!(Length(0) > Length(u32::MAX));
    assert!(Length(u32::MAX) > Invalid);
    assert_eq!(Invalid.cmp(&Invalid), std::cmp::Ordering::Equal);
    assert_eq!(Length(3).cmp(&Length(3)), std::cmp::Ordering::Equal);
    assert!(Length(0).is_valid());
    assert!(!Invalid.is_valid());
    assert_eq!(ShortestPath::self_attribute(), Length(0));
}

#[test]
fn shortest_path_total_order() {
    use ShortestPathAttribute::*;
    let attrs = [Invalid, Length(0), Length(1), Length(5), Length(u32::MAX)];
    for a in attrs.iter() {
        assert!(*a >= Invalid);
        for b in attrs.iter() {
            let n = [a < b, a == b, a > b].into_iter().filter(|x| *x).count();
            assert_eq!(n, 1, "{a} vs {b}");
        }
    }
}

#[test]
fn cost_label() {
    use ShortestPathAttribute::*;
    let l = link(0, 1);
    assert_eq!(CostLabel(1).extend(l, &Length(0)), Length(1));
    assert_eq!(CostLabel(10).extend(l, &Length(5)), Length(15));
    assert_eq!(CostLabel(1).extend(l, &Invalid), Invalid);
    assert_eq!(CostLabel(1).extend(l, &Length(u32::MAX)), Invalid);
    assert_eq!(CostLabel::from(3), CostLabel(3));
}

#[test]
fn label_is_pure() {
    let l = link(2, 3);
    let a = ShortestPathAttribute::Length(7);
    let first = CostLabel(2).extend(l, &a);
    let second = CostLabel(2).extend(l, &a);
    assert_eq!(first, second);
    assert_eq!(a, ShortestPathAttribute::Length(7));

    let a = GaoRexfordAttribute::Customer;
    for label in [
        GaoRexfordLabel::Customer,
        GaoRexfordLabel::Peer,
        GaoRexfordLabel::Provider,
    ] {
        assert_eq!(label.extend(l, &a), label.extend(l, &a));
    }
    assert_eq!(a, GaoRexfordAttribute::Customer);
}

#[test]
fn gao_rexford_order() {
    use GaoRexfordAttribute::*;
    let attrs = [SelfRoute, Customer, Peer, Provider, Invalid];
    for (i, a) in attrs.iter().enumerate() {
        for (j, b) in attrs.iter().enumerate() {
            assert_eq!(a.cmp(b), j.cmp(&i), "{a} vs {b}");
        }
    }
    assert!(!Invalid.is_valid());
    assert!(Provider.is_valid());
    assert_eq!(GaoRexford::self_attribute(), SelfRoute);
}

#[test]
fn gao_rexford_extend() {
    use GaoRexfordAttribute::*;
    let l = link(0, 1);

    let customer = GaoRexfordLabel::Customer;
    assert_eq!(customer.extend(l, &SelfRoute), Provider);
    assert_eq!(customer.extend(l, &Customer), Provider);
    assert_eq!(customer.extend(l, &Peer), Provider);
    assert_eq!(customer.extend(l, &Provider), Provider);
    assert_eq!(customer.extend(l, &Invalid), Invalid);

    let peer = GaoRexfordLabel::Peer;
    assert_eq!(peer.extend(l, &SelfRoute), Peer);
    assert_eq!(peer.extend(l, &Customer), Peer);
    assert_eq!(peer.extend(l, &Peer), Invalid);
    assert_eq!(peer.extend(l, &Provider), Invalid);
    assert_eq!(peer.extend(l, &Invalid), Invalid);

    let provider = GaoRexfordLabel::Provider;
    assert_eq!(provider.extend(l, &SelfRoute), Customer);
    assert_eq!(provider.extend(l, &Customer), Customer);
    assert_eq!(provider.extend(l, &Peer), Invalid);
    assert_eq!(provider.extend(l, &Provider), Invalid);
    assert_eq!(provider.extend(l, &Invalid), Invalid);
}

#[test]
fn gao_rexford_reverse() {
    assert_eq!(GaoRexfordLabel::Customer.reverse(), GaoRexfordLabel::Provider);
    assert_eq!(GaoRexfordLabel::Provider.reverse(), GaoRexfordLabel::Customer);
    assert_eq!(GaoRexfordLabel::Peer.reverse(), GaoRexfordLabel::Peer);
}

#[test]
fn serialization() {
    assert_eq!(
        serde_json::to_string(&GaoRexfordLabel::Provider).unwrap(),
        "\"provider\""
    );
    assert_eq!(
        serde_json::from_str::<GaoRexfordLabel>("\"peer\"").unwrap(),
        GaoRexfordLabel::Peer
    );
    assert_eq!(
        serde_json::to_string(&GaoRexfordAttribute::SelfRoute).unwrap(),
        "\"self\""
    );
    assert_eq!(serde_json::to_string(&CostLabel(4)).unwrap(), "4");
    assert_eq!(serde_json::from_str::<CostLabel>("12").unwrap(), CostLabel(12));
}
