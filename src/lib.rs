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

#![deny(missing_docs, missing_debug_implementations)]

//! # SsBgp
//!
//! This is a library for simulating policy-based routing (similar to BGP) towards a single
//! destination, and for studying how oscillation detection lets protocols converge that would
//! otherwise oscillate forever.
//!
//! ## Model
//!
//! A [`topology::Topology`] consists of routers connected by directed, labeled links. A link
//! `source -> target` carries the routes of `target` to `source`. A [`policy::Policy`] defines
//! how preferred a route is (its [`policy::Attribute`]), and how a link changes the attribute of a
//! route traversing it (its [`policy::Label`]). Two policies are available:
//! [`policy::ShortestPath`] and [`policy::GaoRexford`].
//!
//! The [`engine::Engine`] simulates the protocol with a discrete-event scheduler. The destination
//! advertises its own route, and every router selects the most preferred route it learned from its
//! neighbors, and advertises it to all neighbors that learn from it. Routers limit the rate of
//! their advertisements with an MRAI timer.
//!
//! ## Oscillation detection
//!
//! Routes that contain a loop are always discarded. Before discarding a loop, a router asks its
//! [`detection::Detection`] strategy whether the loop indicates a policy conflict. If it does, the
//! link over which the loop was learned is turned off. See [`detection`] for the available
//! strategies.
//!
//! ## Example
//!
//! ```rust
//! use ssbgp::prelude::*;
//! use ssbgp::builder::provider_cycle;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Without detection, the gadget oscillates forever.
//!     let mut engine = Engine::new(provider_cycle(DetectionKind::Dummy, 0)?);
//!     engine.set_msg_limit(Some(1000));
//!     assert!(engine.simulate(RouterId::new(3)).is_err());
//!
//!     // With detection, the routers turn off the links of the cycle.
//!     let mut engine = Engine::new(provider_cycle(DetectionKind::Simple, 0)?);
//!     engine.set_msg_limit(Some(1000));
//!     engine.simulate(RouterId::new(3))?;
//!     assert_eq!(engine.topology().turned_off_links().len(), 3);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod detection;
pub mod engine;
pub mod event;
pub mod export;
pub mod notifier;
pub mod policy;
pub mod prelude;
mod protocol;
pub mod route;
pub mod route_table;
pub mod topology;
pub mod types;

#[cfg(test)]
mod test;
