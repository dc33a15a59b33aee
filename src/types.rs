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

//! Module containing all type definitions

use petgraph::prelude::*;
use thiserror::Error;

pub(crate) type IndexType = u32;
/// Router Identification (and index into the graph)
pub type RouterId = NodeIndex<IndexType>;

/// Identification of a directed link, given as `(source, target)`. Routes travel from the target
/// to the source, i.e., the source learns the routes exported by the target.
pub type LinkId = (RouterId, RouterId);

/// Logical simulation time.
pub type Time = u64;

/// Errors raised while building or modifying the topology.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    /// Router is not present in the topology
    #[error("Router was not found in the topology: {0:?}")]
    RouterNotFound(RouterId),
    /// Link is not present in the topology
    #[error("Link does not exist: {0:?} -> {1:?}")]
    LinkNotFound(RouterId, RouterId),
    /// Link was added twice
    #[error("Link already exists: {0:?} -> {1:?}")]
    LinkExists(RouterId, RouterId),
    /// A link must connect two different routers
    #[error("Link from {0:?} to itself is not allowed")]
    SelfLoop(RouterId),
}

/// Errors that abort a simulation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SimulationError {
    /// The topology does not match the simulation.
    #[error("Topology Error: {0}")]
    Topology(#[from] TopologyError),
    /// A step was requested before a destination was chosen.
    #[error("The simulation was not started! Call `Engine::start` first.")]
    NotStarted,
    /// The message limit was hit while messages were still enqueued.
    #[error("Simulation did not converge within {0} messages!")]
    NoConvergence(usize),
}

/// Errors raised while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed json
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// The configuration describes an invalid topology
    #[error("Topology Error: {0}")]
    Topology(#[from] TopologyError),
}
