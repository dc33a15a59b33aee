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

use std::{cell::RefCell, rc::Rc};

use crate::{
    engine::Engine,
    notifier::Notification,
    policy::Policy,
    route::Path,
    types::{LinkId, RouterId},
};

mod test_builder;
mod test_export;
mod test_policy;
mod test_topology;

type Log<A> = Rc<RefCell<Vec<Notification<A>>>>;

/// Record all notifications of the engine.
fn record<P: Policy>(engine: &mut Engine<P>) -> Log<P::Attribute> {
    let log: Log<P::Attribute> = Default::default();
    let l = log.clone();
    engine.add_listener(move |n: &Notification<P::Attribute>| l.borrow_mut().push(n.clone()));
    log
}

fn kind<A>(n: &Notification<A>) -> &'static str {
    match n {
        Notification::Start { .. } => "start",
        Notification::Imported { .. } => "imported",
        Notification::Learned { .. } => "learned",
        Notification::Selected { .. } => "selected",
        Notification::Exported { .. } => "exported",
        Notification::Detected { .. } => "detected",
        Notification::Advertised { .. } => "advertised",
        Notification::End { .. } => "end",
    }
}

fn num_exported<A>(log: &Log<A>) -> usize {
    log.borrow()
        .iter()
        .filter(|n| matches!(n, Notification::Exported { .. }))
        .count()
}

fn detected_links<A>(log: &Log<A>) -> Vec<LinkId> {
    log.borrow()
        .iter()
        .filter_map(|n| match n {
            Notification::Detected { link, .. } => Some(*link),
            _ => None,
        })
        .collect()
}

fn path(routers: &[usize]) -> Path {
    routers.iter().map(|r| RouterId::new(*r)).collect()
}

fn link(source: usize, target: usize) -> LinkId {
    (RouterId::new(source), RouterId::new(target))
}
