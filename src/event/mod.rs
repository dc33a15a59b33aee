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

//! Module for defining the messages exchanged between routers, and the scheduler ordering them.

use crate::{
    route::{Route, RouteReference},
    types::{LinkId, RouterId, Time},
};

use std::rc::Rc;

mod scheduler;
pub use scheduler::{Scheduler, Timing};

/// A route advertisement in flight over `link`. The message is delivered to the link source at
/// `time`.
#[derive(Debug, Clone)]
pub struct Message<A> {
    /// Arrival time of the message.
    pub time: Time,
    /// The traversed link. The target exported the route, the source receives it.
    pub link: LinkId,
    /// The exported route. All messages of the same advertisement share the same reference.
    pub route: RouteReference<A>,
}

impl<A> Message<A> {
    /// Create a new message.
    pub fn new(time: Time, link: LinkId, route: RouteReference<A>) -> Self {
        Self { time, link, route }
    }

    /// The router that exported the route.
    pub fn exporter(&self) -> RouterId {
        self.link.1
    }

    /// The router that receives the route.
    pub fn receiver(&self) -> RouterId {
        self.link.0
    }

    /// The exported route, as it is right now.
    pub fn route(&self) -> Rc<Route<A>> {
        self.route.get()
    }
}
