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

//! Module containing the scheduler, ordering messages by their arrival time.

use std::{cmp::Reverse, collections::HashMap};

use priority_queue::PriorityQueue;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::Message;
use crate::{
    route::RouteReference,
    types::{LinkId, Time},
};

/// Delay model of the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// Every message takes the same time.
    Constant(Time),
    /// The delay of each message is sampled uniformly from `min..=max`.
    Uniform {
        /// Minimum delay
        min: Time,
        /// Maximum delay
        max: Time,
    },
}

impl Default for Timing {
    fn default() -> Self {
        Self::Constant(0)
    }
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(d) => write!(f, "constant({d})"),
            Self::Uniform { min, max } => write!(f, "uniform({min}..={max})"),
        }
    }
}

/// Scheduler, returning the messages in the order of their arrival time. Messages with the same
/// arrival time are returned in the order in which they were scheduled.
///
/// Messages sent with [`Scheduler::send`] never overtake each other on the same link: they arrive
/// in the order in which they leave the exporter, whatever delays the timing model samples.
///
/// ```rust
/// use ssbgp::prelude::*;
/// use ssbgp::event::{Message, Scheduler};
/// use ssbgp::route::{Route, RouteReference};
/// use std::rc::Rc;
///
/// let mut scheduler: Scheduler<ShortestPathAttribute> = Scheduler::new();
/// let route = RouteReference::new(Rc::new(Route::invalid()));
/// let link = (RouterId::new(0), RouterId::new(1));
///
/// scheduler.schedule(Message::new(5, link, route.clone()));
/// scheduler.schedule(Message::new(2, link, route));
///
/// assert_eq!(scheduler.next().map(|m| m.time), Some(2));
/// assert_eq!(scheduler.current_time(), 2);
/// assert_eq!(scheduler.next().map(|m| m.time), Some(5));
/// assert!(scheduler.next().is_none());
/// ```
#[derive(Debug)]
pub struct Scheduler<A> {
    q: PriorityQueue<u64, Reverse<(Time, u64)>>,
    messages: HashMap<u64, Entry<A>>,
    /// Messages in flight over each link.
    sessions: HashMap<LinkId, Vec<u64>>,
    next_seq: u64,
    current_time: Time,
    timing: Timing,
    seed: u64,
    rng: StdRng,
}

#[derive(Debug)]
struct Entry<A> {
    message: Message<A>,
    departure: Time,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler without any link delay.
    pub fn new() -> Self {
        Self::with_timing(Timing::default(), 0)
    }

    /// Create an empty scheduler with the given delay model. The random delays are drawn from a
    /// generator seeded with `seed`.
    pub fn with_timing(timing: Timing, seed: u64) -> Self {
        Self {
            q: PriorityQueue::new(),
            messages: HashMap::new(),
            sessions: HashMap::new(),
            next_seq: 0,
            current_time: 0,
            timing,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The delay model of the scheduler.
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Enqueue a message. It will be returned once all messages with an earlier arrival time, and
    /// all messages with the same arrival time that were scheduled before it, are returned. The
    /// arrival time of the message is taken as is.
    pub fn schedule(&mut self, message: Message<A>) {
        let departure = message.time;
        self.push(departure, message);
    }

    /// Send `route` over `link`, leaving the exporter at `departure`, and return its arrival
    /// time. The message arrives after the link delay, but not before any message over the same
    /// link that left earlier. Messages over the same link that leave later, but were sent
    /// already, are postponed so that they still arrive after this one.
    pub fn send(&mut self, departure: Time, link: LinkId, route: RouteReference<A>) -> Time {
        let mut arrival = departure + self.delay(link);
        let in_flight: Vec<u64> = self.sessions.get(&link).cloned().unwrap_or_default();
        for entry in in_flight.iter().filter_map(|seq| self.messages.get(seq)) {
            if entry.departure <= departure {
                arrival = arrival.max(entry.message.time);
            }
        }
        let mut overtaken: Vec<(Time, u64)> = in_flight
            .iter()
            .filter_map(|seq| self.messages.get(seq).map(|e| (e, *seq)))
            .filter(|(e, _)| e.departure > departure && e.message.time <= arrival)
            .map(|(e, seq)| (e.message.time, seq))
            .collect();

        self.push(departure, Message::new(arrival, link, route));

        overtaken.sort();
        for (_, seq) in overtaken {
            if let Some(mut entry) = self.take(seq) {
                entry.message.time = arrival;
                self.push(entry.departure, entry.message);
            }
        }
        arrival
    }

    /// Sample the delay of a message over `link`.
    pub fn delay(&mut self, _link: LinkId) -> Time {
        match self.timing {
            Timing::Constant(d) => d,
            Timing::Uniform { min, max } if min >= max => min,
            Timing::Uniform { min, max } => self.rng.gen_range(min..=max),
        }
    }

    /// Pop the earliest message, and advance the current time to its arrival time.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Message<A>> {
        loop {
            let (seq, _) = self.q.pop()?;
            if let Some(entry) = self.messages.remove(&seq) {
                self.forget(entry.message.link, seq);
                self.current_time = entry.message.time;
                return Some(entry.message);
            }
        }
    }

    /// Arrival time of the next message.
    pub fn peek_time(&self) -> Option<Time> {
        self.q.peek().map(|(_, Reverse((time, _)))| *time)
    }

    /// Remove all messages in flight over `link`, and return how many were removed.
    pub fn remove_messages_on(&mut self, link: LinkId) -> usize {
        let removed = self.sessions.remove(&link).unwrap_or_default();
        for seq in removed.iter() {
            self.q.remove(seq);
            self.messages.remove(seq);
        }
        removed.len()
    }

    /// Arrival time of the last message that was returned, or `0` if none was returned yet.
    pub fn current_time(&self) -> Time {
        self.current_time
    }

    /// Remove all messages, set the time back to `0` and reseed the delay model.
    pub fn reset(&mut self) {
        self.q.clear();
        self.messages.clear();
        self.sessions.clear();
        self.next_seq = 0;
        self.current_time = 0;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Change the delay model and the seed. This also resets the scheduler.
    pub fn set_timing(&mut self, timing: Timing, seed: u64) {
        self.timing = timing;
        self.seed = seed;
        self.reset();
    }

    /// Number of messages in flight.
    pub fn len(&self) -> usize {
        self.q.len()
    }

    /// Returns `true` if no message is in flight.
    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    /// Iterate over all messages in flight, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Message<A>> {
        self.messages.values().map(|e| &e.message)
    }

    fn push(&mut self, departure: Time, message: Message<A>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.q.push(seq, Reverse((message.time, seq)));
        self.sessions.entry(message.link).or_default().push(seq);
        self.messages.insert(seq, Entry { message, departure });
    }

    fn take(&mut self, seq: u64) -> Option<Entry<A>> {
        self.q.remove(&seq);
        let entry = self.messages.remove(&seq)?;
        self.forget(entry.message.link, seq);
        Some(entry)
    }

    fn forget(&mut self, link: LinkId, seq: u64) {
        if let Some(in_flight) = self.sessions.get_mut(&link) {
            in_flight.retain(|s| *s != seq);
            if in_flight.is_empty() {
                self.sessions.remove(&link);
            }
        }
    }
}
