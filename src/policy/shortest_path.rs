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

//! Shortest path policy: every link has a cost, and routes with a lower total cost are preferred.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Attribute, Label, Policy};
use crate::types::LinkId;

/// Shortest path routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortestPath;

impl Policy for ShortestPath {
    type Attribute = ShortestPathAttribute;
    type Label = CostLabel;

    fn self_attribute() -> Self::Attribute {
        ShortestPathAttribute::Length(0)
    }
}

/// Total cost of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortestPathAttribute {
    /// Valid route with the given length.
    Length(u32),
    /// No route.
    Invalid,
}

impl ShortestPathAttribute {
    /// Get the length of the route, or `None` if the attribute is invalid.
    pub fn length(&self) -> Option<u32> {
        match self {
            Self::Length(l) => Some(*l),
            Self::Invalid => None,
        }
    }
}

impl Ord for ShortestPathAttribute {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Invalid, Self::Invalid) => Ordering::Equal,
            (Self::Invalid, Self::Length(_)) => Ordering::Less,
            (Self::Length(_), Self::Invalid) => Ordering::Greater,
            // shorter routes are preferred
            (Self::Length(a), Self::Length(b)) => b.cmp(a),
        }
    }
}

impl PartialOrd for ShortestPathAttribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Attribute for ShortestPathAttribute {
    fn invalid() -> Self {
        Self::Invalid
    }
}

impl std::fmt::Display for ShortestPathAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Length(l) => write!(f, "length {l}"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Label adding a constant cost to the length of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostLabel(pub u32);

impl Label for CostLabel {
    type Attribute = ShortestPathAttribute;

    fn extend(&self, _link: LinkId, attribute: &ShortestPathAttribute) -> ShortestPathAttribute {
        match attribute {
            ShortestPathAttribute::Length(l) => l
                .checked_add(self.0)
                .map(ShortestPathAttribute::Length)
                .unwrap_or(ShortestPathAttribute::Invalid),
            ShortestPathAttribute::Invalid => ShortestPathAttribute::Invalid,
        }
    }
}

impl std::fmt::Display for CostLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cost {}", self.0)
    }
}

impl From<u32> for CostLabel {
    fn from(x: u32) -> Self {
        Self(x)
    }
}
