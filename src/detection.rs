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

//! # Oscillation detection
//!
//! When a router learns a route whose path already contains itself, the route is discarded. Before
//! that, the router asks its [`Detection`] strategy whether the loop reveals a policy conflict. If
//! it does, the router turns off the link over which it learned the loop. A policy conflict means
//! that, without the loop, the router would have selected the route, which is how a policy-induced
//! oscillation starts.
//!
//! "Would have selected" follows the route selection: the route is valid, and its attribute is
//! either strictly preferred over the attribute of the alternative, or equal to it while the link
//! target has a lower id than the neighbor of the alternative.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    policy::Attribute,
    route::Route,
    route_table::Selection,
    types::{LinkId, RouterId},
};

/// Situation in which a router learned a route containing a loop.
#[derive(Debug, Clone)]
pub struct Conflict<'a, A> {
    /// The router that learned the route.
    pub router: RouterId,
    /// The link over which the route was learned. The link target exported the route.
    pub link: LinkId,
    /// The route as it was imported, including the loop.
    pub learned: &'a Route<A>,
    /// The best route of the router if the link target is ignored.
    pub alternative: &'a Selection<A>,
    /// The route currently selected by the router.
    pub selected: &'a Selection<A>,
}

impl<'a, A: Attribute> Conflict<'a, A> {
    /// The router that exported the learned route.
    pub fn exporter(&self) -> RouterId {
        self.link.1
    }

    /// Returns `true` if the learned route would have been selected over the alternative.
    pub fn learned_is_preferred(&self) -> bool {
        self.alternative.is_beaten_by(self.exporter(), self.learned)
    }
}

/// Strategy deciding whether a learned loop is a policy conflict.
pub trait Detection<A>: std::fmt::Debug {
    /// Returns `true` if the link of the conflict must be turned off.
    fn is_policy_conflict(&self, conflict: &Conflict<'_, A>) -> bool;

    /// Name of the strategy
    fn name(&self) -> &'static str;
}

/// Never detects anything.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DummyDetection;

impl<A: Attribute> Detection<A> for DummyDetection {
    fn is_policy_conflict(&self, _conflict: &Conflict<'_, A>) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "dummy"
    }
}

/// Detects a conflict if the learned route would have been selected over the alternative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimpleDetection;

impl<A: Attribute> Detection<A> for SimpleDetection {
    fn is_policy_conflict(&self, conflict: &Conflict<'_, A>) -> bool {
        conflict.learned_is_preferred()
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

/// Like [`SimpleDetection`], but additionally requires that the part of the learned path after the
/// router equals the path of the alternative. Then, the loop was caused by the alternative route
/// itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PathDetection;

impl<A: Attribute> Detection<A> for PathDetection {
    fn is_policy_conflict(&self, conflict: &Conflict<'_, A>) -> bool {
        conflict.learned_is_preferred()
            && conflict.learned.path().sub_path_after(conflict.router).as_ref()
                == Some(conflict.alternative.route.path())
    }

    fn name(&self) -> &'static str {
        "path"
    }
}

/// Like [`SimpleDetection`], but ignores loops learned from the currently selected neighbor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NeighborDetection;

impl<A: Attribute> Detection<A> for NeighborDetection {
    fn is_policy_conflict(&self, conflict: &Conflict<'_, A>) -> bool {
        conflict.learned_is_preferred() && conflict.selected.neighbor != Some(conflict.exporter())
    }

    fn name(&self) -> &'static str {
        "neighbor"
    }
}

/// Selects one of the available detection strategies, e.g., in a configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionKind {
    /// [`DummyDetection`]
    Dummy,
    /// [`SimpleDetection`]
    #[default]
    Simple,
    /// [`PathDetection`]
    Path,
    /// [`NeighborDetection`]
    Neighbor,
}

impl DetectionKind {
    /// All strategies.
    pub const ALL: [DetectionKind; 4] = [Self::Dummy, Self::Simple, Self::Path, Self::Neighbor];

    /// Create the strategy.
    pub fn build<A: Attribute>(&self) -> Box<dyn Detection<A>> {
        match self {
            Self::Dummy => Box::new(DummyDetection),
            Self::Simple => Box::new(SimpleDetection),
            Self::Path => Box::new(PathDetection),
            Self::Neighbor => Box::new(NeighborDetection),
        }
    }
}

impl std::fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dummy => write!(f, "dummy"),
            Self::Simple => write!(f, "simple"),
            Self::Path => write!(f, "path"),
            Self::Neighbor => write!(f, "neighbor"),
        }
    }
}

impl FromStr for DetectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dummy" | "d0" => Ok(Self::Dummy),
            "simple" | "d1" => Ok(Self::Simple),
            "path" | "d2" => Ok(Self::Path),
            "neighbor" => Ok(Self::Neighbor),
            _ => Err(format!("Unknown detection strategy: {s}")),
        }
    }
}
