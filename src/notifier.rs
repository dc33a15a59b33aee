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

//! # Event notification
//!
//! The engine reports every step of the simulation to the listeners registered at its
//! [`EventNotifier`]. Listeners are called synchronously, in the order in which the steps happen:
//! for each message, the route is first imported, then learned, then selected, and finally
//! exported.
//!
//! Any closure taking a `&Notification` is a [`Listener`]:
//!
//! ```rust
//! use ssbgp::prelude::*;
//! use std::{cell::RefCell, rc::Rc};
//!
//! let mut notifier: EventNotifier<ShortestPathAttribute> = EventNotifier::new();
//! let count = Rc::new(RefCell::new(0));
//! let c = count.clone();
//! let id = notifier.add_listener(move |n: &Notification<ShortestPathAttribute>| {
//!     if matches!(n, Notification::Start { .. }) {
//!         *c.borrow_mut() += 1;
//!     }
//! });
//!
//! notifier.notify(Notification::Start { destination: RouterId::new(0) });
//! assert!(notifier.remove_listener(id));
//! notifier.notify(Notification::Start { destination: RouterId::new(0) });
//! assert_eq!(*count.borrow(), 1);
//! ```

use std::rc::Rc;

use crate::{
    route::Route,
    types::{LinkId, RouterId, Time},
};

/// Something that happened during the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<A> {
    /// The simulation towards `destination` was started.
    Start {
        /// The destination of the simulation
        destination: RouterId,
    },
    /// The link source imported a route over `link`, i.e., the attribute was extended over the
    /// link.
    Imported {
        /// The imported route
        route: Rc<Route<A>>,
        /// The traversed link
        link: LinkId,
    },
    /// The link source learned a route over `link`, after checking for loops.
    Learned {
        /// The learned route
        route: Rc<Route<A>>,
        /// The traversed link
        link: LinkId,
    },
    /// The router changed its selected route.
    Selected {
        /// The router selecting a new route
        router: RouterId,
        /// The previously selected route
        previous: Rc<Route<A>>,
        /// The newly selected route
        new: Rc<Route<A>>,
    },
    /// The link target scheduled a message carrying `route` over `link`. Only one event is
    /// emitted per scheduled message. If the router selects another route before the MRAI window
    /// of an advertisement expires, the message delivers that newer route instead, without a new
    /// `Exported` event. Withdrawals always deliver the route they were scheduled with.
    Exported {
        /// The exported route, as it was when the message was scheduled
        route: Rc<Route<A>>,
        /// The link over which the route is sent
        link: LinkId,
        /// Arrival time of the message
        time: Time,
    },
    /// The router detected a policy conflict and turned off `link`.
    Detected {
        /// The router that detected the conflict
        router: RouterId,
        /// The link that was turned off
        link: LinkId,
        /// The route that contained the loop
        learned: Rc<Route<A>>,
        /// The best route of the router, excluding the link target
        alternative: Rc<Route<A>>,
        /// The routers forming the loop, starting with the link target and ending at the router
        cycle: Vec<RouterId>,
    },
    /// The router started a new advertisement window. Its advertisements leave at `time`.
    Advertised {
        /// The advertising router
        router: RouterId,
        /// When the advertisements are sent.
        time: Time,
    },
    /// No more messages are in flight.
    End {
        /// Time of the last message
        time: Time,
    },
}

/// Receiver of notifications.
pub trait Listener<A> {
    /// Called for every notification, in the order in which they happen.
    fn notify(&mut self, notification: &Notification<A>);
}

impl<A, F> Listener<A> for F
where
    F: FnMut(&Notification<A>),
{
    fn notify(&mut self, notification: &Notification<A>) {
        self(notification)
    }
}

/// Handle of a registered listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

/// Hub distributing notifications to all registered listeners.
pub struct EventNotifier<A> {
    listeners: Vec<(ListenerId, Box<dyn Listener<A>>)>,
    next_id: usize,
}

impl<A> Default for EventNotifier<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for EventNotifier<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field(
                "listeners",
                &self.listeners.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<A> EventNotifier<A> {
    /// Create a notifier without any listener.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener. Listeners are notified in the order in which they were added.
    pub fn add_listener(&mut self, listener: impl Listener<A> + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if no listener with that id was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn num_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Send the notification to all listeners.
    pub fn notify(&mut self, notification: Notification<A>) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.notify(&notification);
        }
    }
}
