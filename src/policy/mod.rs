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

//! # Routing policies
//!
//! A routing policy consists of an [`Attribute`] type (how preferred a route is) and a [`Label`]
//! type (how a link transforms the attribute of a route that traverses it). Both are plain values,
//! and the [`Policy`] trait ties them together.
//!
//! The order on attributes is the preference: `a > b` means that `a` is preferred over `b`. Every
//! attribute type has exactly one invalid value, which is less preferred than every valid value.

use std::{fmt::Debug, fmt::Display, hash::Hash};

use crate::types::LinkId;

pub mod gao_rexford;
pub mod shortest_path;

pub use gao_rexford::{GaoRexford, GaoRexfordAttribute, GaoRexfordLabel};
pub use shortest_path::{CostLabel, ShortestPath, ShortestPathAttribute};

/// Policy-specific preference of a route. The implementation of [`Ord`] must be a total order, in
/// which the invalid attribute is the minimum.
pub trait Attribute: Clone + Eq + Ord + Hash + Debug + Display {
    /// The invalid attribute of this policy.
    fn invalid() -> Self;

    /// Returns `true` if the attribute is not the invalid attribute.
    fn is_valid(&self) -> bool {
        *self != Self::invalid()
    }
}

/// Transformation applied to the attribute of a route when it traverses a link.
pub trait Label: Clone + Debug + Display {
    /// The attribute type this label operates on.
    type Attribute: Attribute;

    /// Extend the attribute over the link. This function must be pure: calling it twice with the
    /// same arguments yields the same result.
    fn extend(&self, link: LinkId, attribute: &Self::Attribute) -> Self::Attribute;
}

/// A routing policy, selecting the attribute and label implementations of a simulation.
pub trait Policy: Debug + 'static {
    /// Type of the attributes.
    type Attribute: Attribute;
    /// Type of the labels
    type Label: Label<Attribute = Self::Attribute>;

    /// The attribute of the route the destination advertises about itself.
    fn self_attribute() -> Self::Attribute;
}
