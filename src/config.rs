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

//! # Configuration
//!
//! Serializable description of a topology and of a simulation run. A [`TopologyConfig`] lists the
//! routers (router `i` of the list becomes [`RouterId`] `i`) and the labeled links between them.
//!
//! ```rust
//! use ssbgp::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config: TopologyConfig<GaoRexfordLabel> = TopologyConfig::from_json(
//!         r#"{
//!             "routers": [{"mrai": 0, "detection": "path"}, {}],
//!             "links": [
//!                 {"source": 0, "target": 1, "label": "customer"},
//!                 {"source": 1, "target": 0, "label": "provider"}
//!             ]
//!         }"#,
//!     )?;
//!     let topo: Topology<GaoRexford> = config.build()?;
//!     assert_eq!(topo.num_routers(), 2);
//!     assert_eq!(topo.num_links(), 2);
//!     Ok(())
//! }
//! ```

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    detection::DetectionKind,
    event::Timing,
    policy::Policy,
    topology::Topology,
    types::{ConfigError, IndexType, RouterId, Time, TopologyError},
};

/// Configuration of a single router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Minimum route advertisement interval. `0` disables batching.
    #[serde(default)]
    pub mrai: Time,
    /// Oscillation detection strategy.
    #[serde(default)]
    pub detection: DetectionKind,
}

/// Configuration of a link `source -> target`. The source learns the routes of the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig<L> {
    /// Index of the learning router.
    pub source: usize,
    /// Index of the exporting router.
    pub target: usize,
    /// Label of the link.
    pub label: L,
}

/// Configuration of a whole topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig<L> {
    /// All routers.
    pub routers: Vec<RouterConfig>,
    /// All links.
    #[serde(default = "Vec::new")]
    pub links: Vec<LinkConfig<L>>,
}

impl<L> Default for TopologyConfig<L> {
    fn default() -> Self {
        Self {
            routers: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl<L> TopologyConfig<L> {
    /// Parse the configuration from json.
    pub fn from_json(s: &str) -> Result<Self, ConfigError>
    where
        L: DeserializeOwned,
    {
        Ok(serde_json::from_str(s)?)
    }

    /// Write the configuration as json.
    pub fn to_json(&self) -> Result<String, ConfigError>
    where
        L: Serialize,
    {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Create the topology. Fails if a link references an unknown router, if a link is given
    /// twice, or if a link connects a router with itself.
    pub fn build<P>(&self) -> Result<Topology<P>, TopologyError>
    where
        P: Policy<Label = L>,
        L: Clone,
    {
        let mut topo = Topology::new();
        for router in self.routers.iter() {
            topo.add_router(router.mrai, router.detection);
        }
        for link in self.links.iter() {
            let (source, target) = (router_id(link.source), router_id(link.target));
            topo.get_router(source)?;
            topo.get_router(target)?;
            topo.add_link(source, target, link.label.clone())?;
        }
        Ok(topo)
    }
}

/// Configuration of a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Index of the destination router.
    pub destination: usize,
    /// Maximum number of processed messages. `None` means no limit.
    #[serde(default)]
    pub msg_limit: Option<usize>,
    /// Delay model of the links.
    #[serde(default)]
    pub timing: Timing,
    /// Seed of the delay model.
    #[serde(default)]
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a configuration for `destination`, without message limit and without link delay.
    pub fn new(destination: usize) -> Self {
        Self {
            destination,
            ..Default::default()
        }
    }

    /// The destination router.
    pub fn destination(&self) -> RouterId {
        router_id(self.destination)
    }

    /// Parse the configuration from json.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Router with index `i`. Indices that do not fit into a [`RouterId`] map to `RouterId::end()`,
/// which is never part of a topology.
fn router_id(i: usize) -> RouterId {
    IndexType::try_from(i)
        .map(RouterId::from)
        .unwrap_or_else(|_| RouterId::end())
}
