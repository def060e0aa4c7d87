// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locating a small robot fleet through an existence oracle.
//!
//! Walks through the main entry points:
//! - raw probes against the fleet,
//! - capped and uncapped searches with quadrisection and bisection,
//! - probe counts compared against an exhaustive scan,
//! - the empty, boundary and single-target cases.
//!
//! Run:
//! - `cargo run -p understory_locate_demos --example locate_fleet`
//! - `RUST_LOG=understory_locate=debug cargo run -p understory_locate_demos --example locate_fleet`

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use understory_locate::oracles::{CountingOracle, PointSet};
use understory_locate::{
    Coordinate, Domain, LocateError, Locator, Oracle, SearchConfig, Split, brute_force_scan,
};

fn print_hits(title: &str, hits: &[Coordinate]) {
    println!("{title}: {} found", hits.len());
    for (i, h) in hits.iter().enumerate() {
        println!("  robot {}: ({:.6}, {:.6})", i + 1, h.lat, h.lon);
    }
}

fn main() -> Result<(), LocateError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fleet = PointSet::from_iter([
        Coordinate::new(0.0, 0.0),
        Coordinate::new(100.0, 50.0),
        Coordinate::new(-50.0, -30.0),
        Coordinate::new(75.0, 75.0),
        Coordinate::new(-100.0, 100.0),
    ]);

    println!("== probes ==");
    for (lat, lon, radius) in [(0.0, 0.0, 10.0), (0.0, 0.0, 5.0), (100.0, 50.0, 100.0)] {
        let answer = fleet.exists(Coordinate::new(lat, lon), radius);
        println!("  target within {radius} of ({lat}, {lon}): {answer:?}");
    }

    // Targets on cell edges are reported by every neighbouring cell; merge them.
    let merged = SearchConfig::default().with_merge_duplicates(true);
    let mut locator = Locator::new(CountingOracle::new(fleet));

    println!("\n== quadrisection, raw ==");
    print_hits("all robots", &locator.find_all()?);

    locator.set_config(merged);
    println!("\n== quadrisection, merged ==");
    print_hits("first robot", &locator.find_at_most(1)?);
    let outcome = locator.search(None)?;
    print_hits("all robots", &outcome.hits);
    println!("  {:?}", outcome.stats);

    println!("\n== bisection ==");
    locator.set_config(merged.with_split(Split::Bisect));
    let outcome = locator.search(None)?;
    print_hits("all robots", &outcome.hits);
    println!("  {:?}", outcome.stats);

    println!("\n== probe budget at precision 1.0 ==");
    let coarse = merged.with_precision(1.0);
    locator.set_config(coarse);
    locator.oracle().reset();
    let found = locator.find_all()?.len();
    let divide = locator.oracle().calls();
    locator.oracle().reset();
    let scanned = brute_force_scan(locator.oracle(), &coarse, None)?.len();
    let brute = locator.oracle().calls();
    println!("  divide and conquer: {found} robots, {divide} probes");
    println!("  exhaustive scan:    {scanned} robots, {brute} probes");

    println!("\n== edge cases ==");
    let mut locator = Locator::with_config(PointSet::new(), merged);
    println!("  empty domain: {} found (expected 0)", locator.find_all()?.len());

    let domain = Domain::default();
    locator.oracle_mut().extend([
        Coordinate::new(domain.lat_min, domain.lon_min),
        Coordinate::new(domain.lat_max - 0.1, domain.lon_max - 0.1),
    ]);
    println!("  boundary robots: {} found (expected 2)", locator.find_all()?.len());

    locator.oracle_mut().clear();
    locator.oracle_mut().push(Coordinate::new(50.0, 50.0));
    println!("  single robot: {} found (expected 1)", locator.find_all()?.len());

    Ok(())
}
