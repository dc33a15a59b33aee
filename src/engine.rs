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

//! # Engine
//!
//! The engine owns the topology and the scheduler, and runs the simulation towards one
//! destination. The destination advertises its own route to all its in-neighbors at time `0`.
//! Then, the engine processes one message after the other, until no message is in flight.
//!
//! ```rust
//! use ssbgp::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut topo: Topology<ShortestPath> = Topology::new();
//!     let r0 = topo.add_router(0, DetectionKind::Simple);
//!     let r1 = topo.add_router(0, DetectionKind::Simple);
//!     topo.add_link(r0, r1, CostLabel(1))?;
//!     topo.add_link(r1, r0, CostLabel(1))?;
//!
//!     let mut engine = Engine::new(topo);
//!     engine.simulate(r0)?;
//!
//!     let route = engine.selected_route(r1)?;
//!     assert_eq!(route.attribute(), &ShortestPathAttribute::Length(1));
//!     assert_eq!(route.path().iter().collect::<Vec<_>>(), vec![r0]);
//!     Ok(())
//! }
//! ```

use std::{collections::BTreeMap, rc::Rc};

use log::*;

use crate::{
    config::SimulationConfig,
    event::{Message, Scheduler},
    export::Exporter,
    notifier::{EventNotifier, Listener, ListenerId, Notification},
    policy::Policy,
    protocol,
    route::{Path, Route},
    topology::Topology,
    types::{RouterId, SimulationError, Time, TopologyError},
};

/// Simulation engine.
#[derive(Debug)]
pub struct Engine<P: Policy> {
    topology: Topology<P>,
    scheduler: Scheduler<P::Attribute>,
    notifier: EventNotifier<P::Attribute>,
    destination: Option<RouterId>,
    msg_limit: Option<usize>,
    steps: usize,
    finished: bool,
}

impl<P: Policy> Engine<P> {
    /// Create a new engine for the topology. Messages are delivered without delay.
    pub fn new(topology: Topology<P>) -> Self {
        Self::with_scheduler(topology, Scheduler::new())
    }

    /// Create a new engine with a custom scheduler.
    pub fn with_scheduler(topology: Topology<P>, scheduler: Scheduler<P::Attribute>) -> Self {
        Self {
            topology,
            scheduler,
            notifier: EventNotifier::new(),
            destination: None,
            msg_limit: None,
            steps: 0,
            finished: false,
        }
    }

    /// Apply the message limit and the timing model of the configuration. This resets the engine.
    pub fn configure(&mut self, config: &SimulationConfig) {
        self.set_msg_limit(config.msg_limit);
        self.scheduler.set_timing(config.timing, config.seed);
        self.reset();
    }

    /// Get a reference to the topology.
    pub fn topology(&self) -> &Topology<P> {
        &self.topology
    }

    /// Return the topology, dropping the engine.
    pub fn into_topology(self) -> Topology<P> {
        self.topology
    }

    /// Get a reference to the scheduler.
    pub fn scheduler(&self) -> &Scheduler<P::Attribute> {
        &self.scheduler
    }

    /// Register a listener that is notified of every step of the simulation.
    pub fn add_listener(
        &mut self,
        listener: impl Listener<P::Attribute> + 'static,
    ) -> ListenerId {
        self.notifier.add_listener(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.notifier.remove_listener(id)
    }

    /// Set the maximum number of messages a simulation may process. `None` removes the limit.
    pub fn set_msg_limit(&mut self, msg_limit: Option<usize>) {
        self.msg_limit = msg_limit;
    }

    /// The maximum number of messages a simulation may process.
    pub fn msg_limit(&self) -> Option<usize> {
        self.msg_limit
    }

    /// The destination of the current simulation.
    pub fn destination(&self) -> Option<RouterId> {
        self.destination
    }

    /// Number of messages processed since the simulation was started.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Arrival time of the last processed message.
    pub fn current_time(&self) -> Time {
        self.scheduler.current_time()
    }

    /// Returns `true` if the simulation was started and no message is in flight anymore.
    pub fn is_converged(&self) -> bool {
        self.destination.is_some() && self.scheduler.is_empty()
    }

    /// Reset the engine, and advertise the route of `destination`. No message is processed yet.
    pub fn start(&mut self, destination: RouterId) -> Result<(), SimulationError> {
        self.topology.get_router(destination)?;
        self.reset();
        info!("Start the simulation towards router {}", destination.index());
        self.destination = Some(destination);
        self.notifier.notify(Notification::Start { destination });

        let route = Rc::new(Route::new(P::self_attribute(), Path::new()));
        self.topology
            .routers
            .get_mut(&destination)
            .ok_or(TopologyError::RouterNotFound(destination))?
            .table
            .set_route(destination, route);

        let mut exporter: Exporter<'_, P> = Exporter {
            graph: &self.topology.graph,
            scheduler: &mut self.scheduler,
            notifier: &mut self.notifier,
        };
        exporter.advertise_self(destination, 0);
        Ok(())
    }

    /// Process the next message and return it. Returns `Ok(None)` if no message is in flight.
    pub fn simulate_step(&mut self) -> Result<Option<Message<P::Attribute>>, SimulationError> {
        if self.destination.is_none() {
            return Err(SimulationError::NotStarted);
        }
        let message = match self.scheduler.next() {
            Some(message) => message,
            None => {
                self.finish();
                return Ok(None);
            }
        };
        trace!(
            "t={}: {} -> {}: {}",
            message.time,
            message.exporter().index(),
            message.receiver().index(),
            message.route()
        );
        protocol::process(
            &mut self.topology,
            &mut self.scheduler,
            &mut self.notifier,
            message.clone(),
        )?;
        self.steps += 1;
        if self.scheduler.is_empty() {
            self.finish();
        }
        Ok(Some(message))
    }

    /// Process messages until no message is in flight, or until the message limit is reached.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        if self.destination.is_none() {
            return Err(SimulationError::NotStarted);
        }
        loop {
            if let Some(limit) = self.msg_limit {
                if self.steps >= limit && !self.scheduler.is_empty() {
                    warn!(
                        "Simulation did not converge after {} messages ({} in flight)",
                        self.steps,
                        self.scheduler.len()
                    );
                    return Err(SimulationError::NoConvergence(self.steps));
                }
            }
            if self.simulate_step()?.is_none() {
                return Ok(());
            }
        }
    }

    /// Start the simulation towards `destination` and run it.
    pub fn simulate(&mut self, destination: RouterId) -> Result<(), SimulationError> {
        self.start(destination)?;
        self.run()
    }

    /// Forget all routes, remove all messages, and turn on all links again.
    pub fn reset(&mut self) {
        self.topology.reset();
        self.scheduler.reset();
        self.destination = None;
        self.steps = 0;
        self.finished = false;
    }

    /// Remove the link from `source` to `target`. Messages in flight over the link are dropped.
    /// If the simulation is running, the source forgets the route it learned over the link.
    pub fn remove_link(
        &mut self,
        source: RouterId,
        target: RouterId,
    ) -> Result<(), SimulationError> {
        self.topology.remove_link(source, target)?;
        let dropped = self.scheduler.remove_messages_on((source, target));
        debug!(
            "Dropped {} messages in flight over {} -> {}",
            dropped,
            source.index(),
            target.index()
        );
        if self.destination.is_none() {
            return Ok(());
        }

        let router = self
            .topology
            .routers
            .get_mut(&source)
            .ok_or(TopologyError::RouterNotFound(source))?;
        if router.table.get_route(target).is_none() {
            return Ok(());
        }
        let mut exporter: Exporter<'_, P> = Exporter {
            graph: &self.topology.graph,
            scheduler: &mut self.scheduler,
            notifier: &mut self.notifier,
        };
        let now = exporter.scheduler.current_time();
        let invalid = Rc::new(Route::invalid());
        protocol::select_and_export(router, target, invalid, &mut exporter, now);
        if !self.scheduler.is_empty() {
            self.finished = false;
        }
        Ok(())
    }

    /// The route currently selected by `router`.
    pub fn selected_route(
        &self,
        router: RouterId,
    ) -> Result<Rc<Route<P::Attribute>>, TopologyError> {
        Ok(self.topology.get_router(router)?.table().get_selected_route())
    }

    /// The routes currently selected by all routers.
    pub fn selected_routes(&self) -> BTreeMap<RouterId, Rc<Route<P::Attribute>>> {
        self.topology
            .routers
            .iter()
            .map(|(id, r)| (*id, r.table().get_selected_route()))
            .collect()
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let time = self.scheduler.current_time();
        info!(
            "Simulation finished after {} messages at time {}",
            self.steps, time
        );
        self.notifier.notify(Notification::End { time });
    }
}
