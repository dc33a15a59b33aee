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

//! # Protocol
//!
//! Processing of a single message at the receiving router. The message passes four phases:
//!
//! 1. **Import**: The attribute is extended over the traversed link, and the exporter is appended
//!    to the path. Turned-off links and invalid extensions yield the invalid route.
//! 2. **Learn**: If the path already contains the router, the route is a loop. The router asks
//!    its detection strategy whether the loop is a policy conflict, and turns off the link if it
//!    is. A loop is always learned as the invalid route.
//! 3. **Select**: The learned route replaces the previous route of the exporter in the route table.
//! 4. **Export**: If the selection changed, the new route is sent to all in-neighbors.

use std::rc::Rc;

use log::*;

use crate::{
    detection::Conflict,
    event::{Message, Scheduler},
    export::Exporter,
    notifier::{EventNotifier, Notification},
    policy::Policy,
    route::Route,
    topology::{Link, Router, Topology},
    types::{RouterId, SimulationError, Time, TopologyError},
};

/// Process the message at the receiving router.
pub(crate) fn process<P: Policy>(
    topology: &mut Topology<P>,
    scheduler: &mut Scheduler<P::Attribute>,
    notifier: &mut EventNotifier<P::Attribute>,
    message: Message<P::Attribute>,
) -> Result<(), SimulationError> {
    let (source, target) = message.link;
    let now = message.time;
    let edge = topology
        .graph
        .find_edge(source, target)
        .ok_or(TopologyError::LinkNotFound(source, target))?;
    let router = topology
        .routers
        .get_mut(&source)
        .ok_or(TopologyError::RouterNotFound(source))?;

    // import
    let imported = import::<P>(&topology.graph[edge], &message.route());
    notifier.notify(Notification::Imported {
        route: imported.clone(),
        link: message.link,
    });

    // learn
    let learned = if imported.is_valid() && imported.path().contains(source) {
        let alternative = router.table.get_alternative_route(target);
        let conflict = Conflict {
            router: source,
            link: message.link,
            learned: imported.as_ref(),
            alternative: &alternative,
            selected: router.table.get_selection(),
        };
        if router.detection.is_policy_conflict(&conflict) {
            debug!(
                "Router {} detected a policy conflict: turn off {} -> {}",
                source.index(),
                source.index(),
                target.index()
            );
            topology.graph[edge].turn_off();
            notifier.notify(Notification::Detected {
                router: source,
                link: message.link,
                learned: imported.clone(),
                alternative: alternative.route.clone(),
                cycle: imported.path().cycle_through(source).unwrap_or_default(),
            });
        }
        Rc::new(Route::invalid())
    } else {
        imported
    };
    notifier.notify(Notification::Learned {
        route: learned.clone(),
        link: message.link,
    });

    // select and export
    let mut exporter: Exporter<'_, P> = Exporter {
        graph: &topology.graph,
        scheduler,
        notifier,
    };
    select_and_export(router, target, learned, &mut exporter, now);
    Ok(())
}

/// Extend the exported route over the link.
pub(crate) fn import<P: Policy>(
    link: &Link<P::Label>,
    exported: &Route<P::Attribute>,
) -> Rc<Route<P::Attribute>> {
    if link.is_turned_off() {
        return Rc::new(Route::invalid());
    }
    Rc::new(exported.extend(link.extend(exported.attribute()), link.target()))
}

/// Store the route learned from `neighbor`, and export the selected route if it changed. Returns
/// `true` if the selection changed.
pub(crate) fn select_and_export<P: Policy>(
    router: &mut Router<P>,
    neighbor: RouterId,
    learned: Rc<Route<P::Attribute>>,
    exporter: &mut Exporter<'_, P>,
    now: Time,
) -> bool {
    let previous = router.table.get_selected_route();
    router.table.set_route(neighbor, learned);
    if !router.table.selected_new_route() {
        return false;
    }

    let router_id = router.router_id();
    let new = router.table.get_selected_route();
    debug!(
        "Router {} selects {} (previously {})",
        router_id.index(),
        new,
        previous
    );
    exporter.notifier.notify(Notification::Selected {
        router: router_id,
        previous,
        new: new.clone(),
    });
    exporter.export(router_id, &mut router.timer, new, now);
    true
}
