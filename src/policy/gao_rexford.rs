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

//! # Gao-Rexford policy
//!
//! Routes are ranked by the business relationship with the neighbor they are learned from:
//! customer routes are preferred over peer routes, which are preferred over provider routes. A
//! router exports customer routes (and its own route) to everyone, but routes learned from peers
//! or providers only to its customers.
//!
//! A link label names the relationship of the link source (the router that learns the route)
//! towards the link target (the router that exports it):
//!
//! | label      | self / customer route | peer route | provider route |
//! |------------|-----------------------|------------|----------------|
//! | `Customer` | `Provider`            | `Provider` | `Provider`     |
//! | `Peer`     | `Peer`                | invalid    | invalid        |
//! | `Provider` | `Customer`            | invalid    | invalid        |

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Attribute, Label, Policy};
use crate::types::LinkId;

/// Gao-Rexford routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GaoRexford;

impl Policy for GaoRexford {
    type Attribute = GaoRexfordAttribute;
    type Label = GaoRexfordLabel;

    fn self_attribute() -> Self::Attribute {
        GaoRexfordAttribute::SelfRoute
    }
}

/// Class of a route according to the relationship it was learned over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaoRexfordAttribute {
    /// Route originated by the router itself.
    #[serde(rename = "self")]
    SelfRoute,
    /// Route learned from a customer.
    Customer,
    /// Route learned from a peer.
    Peer,
    /// Route learned from a provider.
    Provider,
    /// No route.
    Invalid,
}

impl GaoRexfordAttribute {
    fn rank(&self) -> u8 {
        match self {
            Self::SelfRoute => 4,
            Self::Customer => 3,
            Self::Peer => 2,
            Self::Provider => 1,
            Self::Invalid => 0,
        }
    }

    /// Returns `true` if the route may be exported to peers and providers.
    fn is_exported_upstream(&self) -> bool {
        matches!(self, Self::SelfRoute | Self::Customer)
    }
}

impl Ord for GaoRexfordAttribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for GaoRexfordAttribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Attribute for GaoRexfordAttribute {
    fn invalid() -> Self {
        Self::Invalid
    }
}

impl std::fmt::Display for GaoRexfordAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfRoute => write!(f, "self"),
            Self::Customer => write!(f, "customer"),
            Self::Peer => write!(f, "peer"),
            Self::Provider => write!(f, "provider"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Relationship of the link source towards the link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaoRexfordLabel {
    /// The source is a customer of the target.
    Customer,
    /// The source and the target are peers.
    Peer,
    /// The source is a provider of the target.
    Provider,
}

impl GaoRexfordLabel {
    /// Label of the reverse link.
    pub fn reverse(&self) -> Self {
        match self {
            Self::Customer => Self::Provider,
            Self::Peer => Self::Peer,
            Self::Provider => Self::Customer,
        }
    }
}

impl Label for GaoRexfordLabel {
    type Attribute = GaoRexfordAttribute;

    fn extend(&self, _link: LinkId, attribute: &GaoRexfordAttribute) -> GaoRexfordAttribute {
        use GaoRexfordAttribute::*;
        if !attribute.is_valid() {
            return Invalid;
        }
        match self {
            // providers export everything to their customers
            GaoRexfordLabel::Customer => Provider,
            GaoRexfordLabel::Peer if attribute.is_exported_upstream() => Peer,
            GaoRexfordLabel::Provider if attribute.is_exported_upstream() => Customer,
            GaoRexfordLabel::Peer | GaoRexfordLabel::Provider => Invalid,
        }
    }
}

impl std::fmt::Display for GaoRexfordLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Peer => write!(f, "peer"),
            Self::Provider => write!(f, "provider"),
        }
    }
}
