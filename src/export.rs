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

//! # Export
//!
//! When a router selects a new route, it sends it to all its in-neighbors. The MRAI timer of the
//! router limits how often it advertises: all routes selected within one MRAI window are
//! coalesced, and only the last one is delivered when the window expires. Withdrawals (routes
//! that become invalid when extended over a link) are never delayed by the timer.

use std::{collections::HashSet, rc::Rc};

use log::*;

use crate::{
    event::Scheduler,
    notifier::{EventNotifier, Notification},
    policy::{Attribute, Policy},
    route::{Path, Route, RouteReference},
    topology::{in_links, LinkGraph},
    types::{RouterId, Time},
};

/// Minimum route advertisement interval timer of a router.
///
/// The timer is either idle or armed. A request on an idle timer arms it until `now + period`,
/// and creates a new [`RouteReference`] shared by all advertisements of that window. A request on
/// an armed timer replaces the route behind that reference, so that every pending advertisement
/// delivers the latest route.
#[derive(Debug, Clone)]
pub struct MraiTimer<A> {
    period: Time,
    expiration: Time,
    reference: Option<RouteReference<A>>,
    pending: HashSet<RouterId>,
}

impl<A: Attribute> MraiTimer<A> {
    /// Create an idle timer. A period of `0` disables batching.
    pub fn new(period: Time) -> Self {
        Self {
            period,
            expiration: 0,
            reference: None,
            pending: HashSet::new(),
        }
    }

    /// The MRAI period.
    pub fn period(&self) -> Time {
        self.period
    }

    /// Returns `true` if the window started by the last request is still open at `now`.
    pub fn is_armed(&self, now: Time) -> bool {
        self.reference.is_some() && now < self.expiration
    }

    /// Time at which the current (or last) window expires.
    pub fn expiration(&self) -> Time {
        self.expiration
    }

    /// The route that will be advertised when the current window expires.
    pub fn pending_route(&self) -> Option<Rc<Route<A>>> {
        self.reference.as_ref().map(|r| r.get())
    }

    /// Neighbors that already have an advertisement of the current window scheduled.
    pub fn pending_neighbors(&self) -> &HashSet<RouterId> {
        &self.pending
    }

    /// Handle a new route at time `now`. Returns the reference shared by all advertisements of
    /// the window, and `true` if a new window was started.
    pub(crate) fn request(&mut self, now: Time, route: Rc<Route<A>>) -> (RouteReference<A>, bool) {
        if self.is_armed(now) {
            if let Some(reference) = self.reference.as_ref() {
                reference.replace(route);
                return (reference.clone(), false);
            }
        }
        let reference = RouteReference::new(route);
        self.expiration = now + self.period;
        self.reference = Some(reference.clone());
        self.pending.clear();
        (reference, true)
    }

    /// Remember that `neighbor` has an advertisement of the current window scheduled. Returns
    /// `false` if it already had one.
    pub(crate) fn mark_pending(&mut self, neighbor: RouterId) -> bool {
        self.pending.insert(neighbor)
    }

    /// Stop the timer.
    pub fn reset(&mut self) {
        self.expiration = 0;
        self.reference = None;
        self.pending.clear();
    }
}

/// Schedules the messages of a router that selected a new route.
pub(crate) struct Exporter<'a, P: Policy> {
    pub(crate) graph: &'a LinkGraph<P::Label>,
    pub(crate) scheduler: &'a mut Scheduler<P::Attribute>,
    pub(crate) notifier: &'a mut EventNotifier<P::Attribute>,
}

impl<'a, P: Policy> Exporter<'a, P> {
    /// Send `route` to all in-neighbors of `router`, honoring its MRAI timer. Returns the number
    /// of scheduled messages.
    pub(crate) fn export(
        &mut self,
        router: RouterId,
        timer: &mut MraiTimer<P::Attribute>,
        route: Rc<Route<P::Attribute>>,
        now: Time,
    ) -> usize {
        let (shared, new_window) = timer.request(now, route.clone());
        if !new_window {
            debug!(
                "Router {} coalesces {} into the window until {}",
                router.index(),
                route,
                timer.expiration()
            );
        }

        let mut scheduled = 0;
        for link in in_links(self.graph, router) {
            let (departure, reference) = if !link.extend(route.attribute()).is_valid() {
                (now, RouteReference::new(route.clone()))
            } else if timer.mark_pending(link.source()) {
                (timer.expiration(), shared.clone())
            } else {
                continue;
            };
            let time = self.scheduler.send(departure, link.id(), reference.clone());
            self.notifier.notify(Notification::Exported {
                route: reference.get(),
                link: link.id(),
                time,
            });
            scheduled += 1;
        }

        if new_window {
            self.notifier.notify(Notification::Advertised {
                router,
                time: timer.expiration(),
            });
        }
        scheduled
    }

    /// Send the route of the destination to all its in-neighbors at time `now`. The destination
    /// does not wait for its timer.
    pub(crate) fn advertise_self(&mut self, destination: RouterId, now: Time) -> usize {
        let route = RouteReference::new(Rc::new(Route::new(P::self_attribute(), Path::new())));
        let mut scheduled = 0;
        for link in in_links(self.graph, destination) {
            self.scheduler.send(now, link.id(), route.clone());
            scheduled += 1;
        }
        self.notifier.notify(Notification::Advertised {
            router: destination,
            time: now,
        });
        scheduled
    }
}
