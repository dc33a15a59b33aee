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

use std::{cell::RefCell, collections::BTreeMap, fs::read_to_string, path::PathBuf, rc::Rc};

use clap::{Parser, ValueEnum};
use serde::Serialize;

use ssbgp::{builder, prelude::*};

/// Simulate a policy-based routing protocol with oscillation detection, and print a summary.
#[derive(Debug, Parser)]
struct Cli {
    /// Gadget to simulate. Ignored if a topology file is given.
    #[clap(short = 'g', long = "gadget", default_value = "provider-cycle")]
    gadget: Gadget,
    /// Json file containing the topology. Router `i` of the file has id `i`.
    #[clap(short = 't', long = "topology")]
    topology: Option<PathBuf>,
    /// Policy of the topology file.
    #[clap(short = 'p', long = "policy", default_value = "gao-rexford")]
    policy: PolicyKind,
    /// Destination router. Each gadget has its own default destination.
    #[clap(short = 'd', long = "destination")]
    destination: Option<usize>,
    /// Oscillation detection of all routers of the gadget (dummy, simple, path or neighbor).
    #[clap(short = 'D', long = "detection", default_value = "simple")]
    detection: DetectionKind,
    /// MRAI of all routers of the gadget.
    #[clap(short = 'm', long = "mrai", default_value = "0")]
    mrai: Time,
    /// Delay of each message. If `--max-delay` is given, this is the minimum delay.
    #[clap(long = "delay", default_value = "0")]
    delay: Time,
    /// Maximum delay of each message. Delays are sampled uniformly between `--delay` and this.
    #[clap(long = "max-delay")]
    max_delay: Option<Time>,
    /// Seed for sampling the message delays.
    #[clap(short = 's', long = "seed", default_value = "0")]
    seed: u64,
    /// Stop the simulation after this many messages.
    #[clap(short = 'l', long = "msg-limit")]
    msg_limit: Option<usize>,
    /// Print the summary as json.
    #[clap(long)]
    json: bool,
}

/// Gadgets with known behavior.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, ValueEnum)]
enum Gadget {
    /// Two routers with shortest path routing, destination `0`.
    ShortestPathPair,
    /// Router `1` is provider of `0` and `2`, destination `1`.
    CustomerChain,
    /// Three routers in a dispute around destination `3`.
    ProviderCycle,
    /// Three routers in a cycle, only router `0` is connected to destination `3`.
    ProviderTriangle,
}

/// Policy used to read a topology file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, ValueEnum)]
enum PolicyKind {
    /// Links are labeled with their cost (integers).
    ShortestPath,
    /// Links are labeled with `customer`, `peer` or `provider`.
    GaoRexford,
}

/// Result of a simulation
#[derive(Debug, Default, Serialize)]
struct Summary {
    converged: bool,
    messages: usize,
    exports: usize,
    detections: usize,
    time: Time,
    turned_off: Vec<(usize, usize)>,
    selected: BTreeMap<usize, String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let summary = match (&args.topology, args.policy) {
        (Some(file), PolicyKind::ShortestPath) => {
            let config: TopologyConfig<CostLabel> =
                TopologyConfig::from_json(&read_to_string(file)?)?;
            simulate(config.build::<ShortestPath>()?, &args, 0)?
        }
        (Some(file), PolicyKind::GaoRexford) => {
            let config: TopologyConfig<GaoRexfordLabel> =
                TopologyConfig::from_json(&read_to_string(file)?)?;
            simulate(config.build::<GaoRexford>()?, &args, 0)?
        }
        (None, _) => match args.gadget {
            Gadget::ShortestPathPair => {
                simulate(builder::shortest_path_pair(args.detection)?, &args, 0)?
            }
            Gadget::CustomerChain => simulate(builder::customer_chain(args.detection)?, &args, 1)?,
            Gadget::ProviderCycle => {
                simulate(builder::provider_cycle(args.detection, args.mrai)?, &args, 3)?
            }
            Gadget::ProviderTriangle => {
                simulate(builder::provider_triangle(args.detection, args.mrai)?, &args, 3)?
            }
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} after {} messages (time {}): {} exports, {} detections",
            if summary.converged { "Converged" } else { "Stopped" },
            summary.messages,
            summary.time,
            summary.exports,
            summary.detections
        );
        for (s, t) in summary.turned_off.iter() {
            println!("turned off: {s} -> {t}");
        }
        for (router, route) in summary.selected.iter() {
            println!("router {router}: {route}");
        }
    }

    Ok(())
}

/// Run the simulation and collect the summary.
fn simulate<P: Policy>(
    topo: Topology<P>,
    args: &Cli,
    default_destination: usize,
) -> Result<Summary, SimulationError> {
    let timing = match args.max_delay {
        Some(max) => Timing::Uniform {
            min: args.delay,
            max,
        },
        None => Timing::Constant(args.delay),
    };
    let config = SimulationConfig {
        destination: args.destination.unwrap_or(default_destination),
        msg_limit: args.msg_limit,
        timing,
        seed: args.seed,
    };

    let mut engine = Engine::new(topo);
    engine.configure(&config);

    let counts = Rc::new(RefCell::new((0usize, 0usize)));
    let c = counts.clone();
    engine.add_listener(move |n: &Notification<P::Attribute>| match n {
        Notification::Exported { .. } => c.borrow_mut().0 += 1,
        Notification::Detected { .. } => c.borrow_mut().1 += 1,
        _ => {}
    });

    let converged = match engine.simulate(config.destination()) {
        Ok(()) => true,
        Err(SimulationError::NoConvergence(_)) => false,
        Err(e) => return Err(e),
    };

    let (exports, detections) = *counts.borrow();
    Ok(Summary {
        converged,
        messages: engine.steps(),
        exports,
        detections,
        time: engine.current_time(),
        turned_off: engine
            .topology()
            .turned_off_links()
            .into_iter()
            .map(|(s, t)| (s.index(), t.index()))
            .collect(),
        selected: engine
            .selected_routes()
            .into_iter()
            .map(|(r, route)| (r.index(), route.to_string()))
            .collect(),
    })
}
