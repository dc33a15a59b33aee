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

//! Module containing the definitions of routes and their paths.

use std::{cell::RefCell, rc::Rc};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{policy::Attribute, types::RouterId};

/// Sequence of routers a route has traversed. Similar to the AS-PATH, the router that exported the
/// route last comes first, and the destination comes last. The router that learned the route is
/// not part of its path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    /// Routers, stored from the destination towards the last exporter.
    routers: Vec<RouterId>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of routers on the path.
    pub fn len(&self) -> usize {
        self.routers.len()
    }

    /// Returns `true` if the path contains no router.
    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Add a router at the front of the path (the router that exported the route last).
    pub fn append(&mut self, router: RouterId) {
        self.routers.push(router)
    }

    /// Returns `true` if the router is on the path.
    pub fn contains(&self, router: RouterId) -> bool {
        self.routers.contains(&router)
    }

    /// The router that exported the route last.
    pub fn next_hop(&self) -> Option<RouterId> {
        self.routers.last().copied()
    }

    /// Iterate over the path, starting with the last exporter and ending at the destination.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = RouterId> + ExactSizeIterator + '_ {
        self.routers.iter().rev().copied()
    }

    /// Part of the path that follows `router` (towards the destination), or `None` if `router` is
    /// not on the path. This is the path of the route `router` had selected when it exported the
    /// route.
    pub fn sub_path_after(&self, router: RouterId) -> Option<Path> {
        let pos = self.routers.iter().position(|r| *r == router)?;
        Some(Path {
            routers: self.routers[..pos].to_vec(),
        })
    }

    /// Part of the path up to and including `router`, i.e., the routers forming the cycle through
    /// `router`. The result is ordered like [`Path::iter`]. Returns `None` if `router` is not on
    /// the path.
    pub fn cycle_through(&self, router: RouterId) -> Option<Vec<RouterId>> {
        let pos = self.routers.iter().position(|r| *r == router)?;
        Some(self.routers[pos..].iter().rev().copied().collect())
    }
}

impl FromIterator<RouterId> for Path {
    /// Collect a path from routers ordered like [`Path::iter`] (last exporter first).
    fn from_iter<T: IntoIterator<Item = RouterId>>(iter: T) -> Self {
        let mut routers: Vec<RouterId> = iter.into_iter().collect();
        routers.reverse();
        Self { routers }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.iter().map(|r| r.index()).join(", "))
    }
}

/// Route, consisting of its attribute and its path. Routes are immutable; extending a route
/// creates a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route<A> {
    attribute: A,
    path: Path,
}

impl<A: Attribute> Route<A> {
    /// Create a new route.
    pub fn new(attribute: A, path: Path) -> Self {
        Self { attribute, path }
    }

    /// The invalid route, with the invalid attribute and an empty path.
    pub fn invalid() -> Self {
        Self {
            attribute: A::invalid(),
            path: Path::new(),
        }
    }

    /// Returns `true` if the attribute of the route is valid.
    pub fn is_valid(&self) -> bool {
        self.attribute.is_valid()
    }

    /// The attribute of the route.
    pub fn attribute(&self) -> &A {
        &self.attribute
    }

    /// The path of the route.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the route learned from `exporter` with the extended `attribute`. The path is copied,
    /// so `self` is never changed.
    pub fn extend(&self, attribute: A, exporter: RouterId) -> Self {
        if !attribute.is_valid() {
            return Self::invalid();
        }
        let mut path = self.path.clone();
        path.append(exporter);
        Self { attribute, path }
    }
}

impl<A: Attribute> std::fmt::Display for Route<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{} via {}", self.attribute, self.path)
        } else {
            write!(f, "{}", self.attribute)
        }
    }
}

/// Handle to a route that is shared by all messages of the same advertisement. The MRAI timer that
/// created the handle may replace the route as long as the messages are not yet delivered, so that
/// every receiver gets the latest route. The route itself is never modified.
#[derive(Debug, Clone)]
pub struct RouteReference<A>(Rc<RefCell<Rc<Route<A>>>>);

impl<A> RouteReference<A> {
    /// Create a new reference, pointing to `route`.
    pub fn new(route: Rc<Route<A>>) -> Self {
        Self(Rc::new(RefCell::new(route)))
    }

    /// Get the route the reference currently points to.
    pub fn get(&self) -> Rc<Route<A>> {
        self.0.borrow().clone()
    }

    /// Replace the route the reference points to.
    pub(crate) fn replace(&self, route: Rc<Route<A>>) {
        *self.0.borrow_mut() = route;
    }

    /// Returns `true` if both handles point to the same shared slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
