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

//! Module containing the route table of a router and the route selection.
//!
//! The route with the most preferred attribute is selected. If two neighbors offer routes with the
//! same attribute, the route of the neighbor with the lowest id is selected.

use std::{cmp::Ordering, collections::BTreeMap, rc::Rc};

use crate::{policy::Attribute, route::Route, types::RouterId};

/// A route together with the neighbor it was learned from. If the route is invalid, `neighbor`
/// is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<A> {
    /// Neighbor from which the route was learned.
    pub neighbor: Option<RouterId>,
    /// The route itself.
    pub route: Rc<Route<A>>,
}

impl<A: Attribute> Selection<A> {
    /// Selection without any valid route.
    pub fn none() -> Self {
        Self {
            neighbor: None,
            route: Rc::new(Route::invalid()),
        }
    }

    /// Returns `true` if the route learned from `neighbor` would be selected over `self`.
    pub fn is_beaten_by(&self, neighbor: RouterId, route: &Route<A>) -> bool {
        if !route.is_valid() {
            return false;
        }
        let current = match self.neighbor {
            Some(n) if self.route.is_valid() => n,
            _ => return true,
        };
        match route.attribute().cmp(self.route.attribute()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => neighbor < current,
        }
    }
}

/// Route table, storing the last route learned from each neighbor.
#[derive(Debug, Clone)]
pub struct RouteTable<A> {
    routes: BTreeMap<RouterId, Rc<Route<A>>>,
    selected: Selection<A>,
    changed: bool,
}

impl<A: Attribute> Default for RouteTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Attribute> RouteTable<A> {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
            selected: Selection::none(),
            changed: false,
        }
    }

    /// Store the route learned from `neighbor`, overwriting the previous one, and update the
    /// selection.
    pub fn set_route(&mut self, neighbor: RouterId, route: Rc<Route<A>>) {
        self.routes.insert(neighbor, route);
        let selected = self.best(None);
        self.changed = selected != self.selected;
        self.selected = selected;
    }

    /// Get the route learned from `neighbor` (if any was learned so far).
    pub fn get_route(&self, neighbor: RouterId) -> Option<&Rc<Route<A>>> {
        self.routes.get(&neighbor)
    }

    /// The selected route (the invalid route if no valid route is known).
    pub fn get_selected_route(&self) -> Rc<Route<A>> {
        self.selected.route.clone()
    }

    /// The selected route together with the neighbor it was learned from.
    pub fn get_selection(&self) -> &Selection<A> {
        &self.selected
    }

    /// Returns `true` if the last call to [`RouteTable::set_route`] changed the selected neighbor
    /// or the selected route.
    pub fn selected_new_route(&self) -> bool {
        self.changed
    }

    /// The best route among all neighbors except `exclude`.
    pub fn get_alternative_route(&self, exclude: RouterId) -> Selection<A> {
        self.best(Some(exclude))
    }

    /// Iterate over all stored routes, ordered by neighbor.
    pub fn iter(&self) -> impl Iterator<Item = (RouterId, &Rc<Route<A>>)> {
        self.routes.iter().map(|(n, r)| (*n, r))
    }

    /// Number of neighbors with a stored route.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is stored.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Remove all routes.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.selected = Selection::none();
        self.changed = false;
    }

    fn best(&self, exclude: Option<RouterId>) -> Selection<A> {
        let mut best = Selection::none();
        for (neighbor, route) in self.routes.iter() {
            if Some(*neighbor) == exclude {
                continue;
            }
            if best.is_beaten_by(*neighbor, route) {
                best = Selection {
                    neighbor: Some(*neighbor),
                    route: route.clone(),
                };
            }
        }
        best
    }
}
