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

use std::rc::Rc;

use pretty_assertions::assert_eq;
use test_log::test;

use super::{kind, link, path};
use crate::{
    detection::DetectionKind,
    event::{Message, Scheduler},
    export::{Exporter, MraiTimer},
    notifier::{EventNotifier, Notification},
    policy::{
        GaoRexford,
        GaoRexfordAttribute::{self, *},
        GaoRexfordLabel,
    },
    route::Route,
    topology::Topology,
    types::RouterId,
};

type Attr = GaoRexfordAttribute;

/// Router 0 exports to router 1 (its provider) and router 2 (its customer).
fn topology() -> Topology<GaoRexford> {
    let mut topo: Topology<GaoRexford> = Topology::new();
    for _ in 0..3 {
        topo.add_router(0, DetectionKind::Simple);
    }
    topo.add_link(RouterId::new(1), RouterId::new(0), GaoRexfordLabel::Provider)
        .unwrap();
    topo.add_link(RouterId::new(2), RouterId::new(0), GaoRexfordLabel::Customer)
        .unwrap();
    topo
}

fn route(attr: Attr, p: &[usize]) -> Rc<Route<Attr>> {
    Rc::new(Route::new(attr, path(p)))
}

fn drain(scheduler: &mut Scheduler<Attr>) -> Vec<Message<Attr>> {
    std::iter::from_fn(|| scheduler.next()).collect()
}

#[test]
fn timer_states() {
    let mut timer: MraiTimer<Attr> = MraiTimer::new(10);
    assert_eq!(timer.period(), 10);
    assert!(!timer.is_armed(0));
    assert!(timer.pending_route().is_none());

    let (first, new) = timer.request(3, route(Customer, &[5]));
    assert!(new);
    assert_eq!(timer.expiration(), 13);
    assert!(timer.is_armed(3));
    assert!(timer.is_armed(12));
    assert!(!timer.is_armed(13));

    let (second, new) = timer.request(8, route(Peer, &[6]));
    assert!(!new);
    assert!(first.ptr_eq(&second));
    assert_eq!(first.get(), route(Peer, &[6]));
    assert_eq!(timer.pending_route(), Some(route(Peer, &[6])));
    assert_eq!(timer.expiration(), 13);

    let (third, new) = timer.request(13, route(Customer, &[7]));
    assert!(new);
    assert!(!first.ptr_eq(&third));
    assert_eq!(timer.expiration(), 23);
    // the previous window keeps its last route
    assert_eq!(first.get(), route(Peer, &[6]));

    timer.reset();
    assert!(!timer.is_armed(14));
}

#[test]
fn pending_neighbors() {
    let mut timer: MraiTimer<Attr> = MraiTimer::new(5);
    timer.request(0, route(Customer, &[5]));
    assert!(timer.mark_pending(RouterId::new(1)));
    assert!(!timer.mark_pending(RouterId::new(1)));
    assert_eq!(timer.pending_neighbors().len(), 1);
    // a new window forgets the pending neighbors
    timer.request(5, route(Customer, &[5]));
    assert!(timer.pending_neighbors().is_empty());
}

#[test]
fn mrai_coalescing() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();
    let mut timer = MraiTimer::new(10);
    let r0 = RouterId::new(0);

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[5]), 0), 2);
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[6]), 1), 0);
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[7]), 2), 0);

    let messages = drain(&mut scheduler);
    assert_eq!(messages.len(), 2);
    for m in messages.iter() {
        assert_eq!(m.time, 10);
        assert_eq!(m.route(), route(Customer, &[7]));
    }
    assert_eq!(
        messages.iter().map(|m| m.link).collect::<Vec<_>>(),
        vec![link(1, 0), link(2, 0)]
    );
}

#[test]
fn withdrawals_are_immediate() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();
    let mut timer = MraiTimer::new(10);
    let r0 = RouterId::new(0);

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[5]), 0), 2);
    // router 1 must not learn a provider route from its customer
    assert_eq!(exporter.export(r0, &mut timer, route(Provider, &[6]), 3), 1);

    assert_eq!(scheduler.peek_time(), Some(3));
    let messages = drain(&mut scheduler);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].time, 3);
    assert_eq!(messages[0].link, link(1, 0));
    assert_eq!(messages[0].route(), route(Provider, &[6]));
    assert!(messages[1..].iter().all(|m| m.time == 10));
    assert!(messages[1..]
        .iter()
        .all(|m| m.route() == route(Provider, &[6])));
}

#[test]
fn withdrawal_on_idle_timer() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();
    let mut timer = MraiTimer::new(10);

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    exporter.export(RouterId::new(0), &mut timer, Rc::new(Route::invalid()), 4);
    let messages = drain(&mut scheduler);
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.time == 4 && !m.route().is_valid()));
}

#[test]
fn no_mrai() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();
    let mut timer = MraiTimer::new(0);
    let r0 = RouterId::new(0);

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[5]), 2), 2);
    assert_eq!(exporter.export(r0, &mut timer, route(Customer, &[6]), 2), 2);

    let messages = drain(&mut scheduler);
    assert_eq!(messages.len(), 4);
    assert!(messages.iter().all(|m| m.time == 2));
    assert_eq!(messages[0].route(), route(Customer, &[5]));
    assert_eq!(messages[1].route(), route(Customer, &[5]));
    assert_eq!(messages[2].route(), route(Customer, &[6]));
    assert_eq!(messages[3].route(), route(Customer, &[6]));
}

#[test]
fn notifications() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();
    let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let l = log.clone();
    notifier.add_listener(move |n: &Notification<Attr>| l.borrow_mut().push(n.clone()));
    let mut timer = MraiTimer::new(10);
    let r0 = RouterId::new(0);

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    exporter.export(r0, &mut timer, route(Customer, &[5]), 0);
    exporter.export(r0, &mut timer, route(Customer, &[6]), 1);

    let log = log.borrow();
    assert_eq!(
        log.iter().map(kind).collect::<Vec<_>>(),
        vec!["exported", "exported", "advertised"]
    );
    assert_eq!(
        log[0],
        Notification::Exported {
            route: route(Customer, &[5]),
            link: link(1, 0),
            time: 10
        }
    );
    assert_eq!(
        log[2],
        Notification::Advertised {
            router: r0,
            time: 10
        }
    );

    // the event keeps the route at scheduling time, the message delivers the coalesced one
    let messages = drain(&mut scheduler);
    assert_eq!(messages[0].link, link(1, 0));
    assert_eq!(messages[0].route(), route(Customer, &[6]));
}

#[test]
fn advertise_self() {
    let topo = topology();
    let mut scheduler = Scheduler::new();
    let mut notifier = EventNotifier::new();

    let mut exporter: Exporter<'_, GaoRexford> = Exporter {
        graph: &topo.graph,
        scheduler: &mut scheduler,
        notifier: &mut notifier,
    };
    assert_eq!(exporter.advertise_self(RouterId::new(0), 0), 2);
    let messages = drain(&mut scheduler);
    assert!(messages
        .iter()
        .all(|m| m.time == 0 && m.route() == Rc::new(Route::new(SelfRoute, path(&[])))));
}
