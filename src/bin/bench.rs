use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;
use tracing::*;

use ridepool::data::{gen, Request, Time, Vehicle};
use ridepool::init_logging;
use ridepool::plan;

mod common;
use common::OutputOptions;

pub const SUITE_STRINGS: [&str; 6] = ["quick", "full", "requests", "vehicles", "capacity", "deadline"];

#[derive(Debug, Copy, Clone)]
enum Suite {
  Quick,
  Full,
  Requests,
  Vehicles,
  Capacity,
  Deadline,
}

impl FromStr for Suite {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return match s {
      "quick" => Ok(Self::Quick),
      "full" => Ok(Self::Full),
      "requests" => Ok(Self::Requests),
      "vehicles" => Ok(Self::Vehicles),
      "capacity" => Ok(Self::Capacity),
      "deadline" => Ok(Self::Deadline),
      _ => Err(format!("invalid string: {}", s)),
    };
  }
}

#[derive(Debug, StructOpt)]
struct ClArgs {
  #[structopt(parse(try_from_str), possible_values = &SUITE_STRINGS)]
  suite: Suite,
  #[structopt(flatten)]
  output: OutputOptions,
}

struct Record {
  algorithm: &'static str,
  parameter: &'static str,
  value: u32,
  iteration: usize,
  millis: f64,
  revenue: f64,
  served: usize,
  requests: usize,
  vehicles: usize,
}

// The randomized strategy runs on a pinned seed so repeated sweeps measure
// the same work.
fn gas_o2_pinned(requests: &[Request], fleet: &mut [Vehicle]) {
  plan::plan_gas_o2_with_rng(requests, fleet, &mut StdRng::seed_from_u64(0));
}

fn run_all(records: &mut Vec<Record>, parameter: &'static str, value: u32, iteration: usize, requests: &[Request], fleet: &[Vehicle]) {
  let planners: [(&'static str, fn(&[Request], &mut [Vehicle])); 3] = [
    ("gas", plan::plan_gas),
    ("gas-o1", plan::plan_gas_o1),
    ("gas-o2", gas_o2_pinned),
  ];

  for &(algorithm, planner) in &planners {
    let mut fleet = fleet.to_vec();
    let start = Instant::now();
    planner(requests, &mut fleet);
    let millis = start.elapsed().as_secs_f64() * 1e3;

    let revenue = plan::total_payment(requests, &fleet);
    let served = plan::served_count(&fleet);
    debug!(algorithm, parameter, value, iteration, millis, revenue, "run finished");
    records.push(Record {
      algorithm,
      parameter,
      value,
      iteration,
      millis,
      revenue,
      served,
      requests: requests.len(),
      vehicles: fleet.len(),
    });
  }
}

fn sweep_requests(records: &mut Vec<Record>, counts: &[usize], n_vehicles: usize, capacity: usize, iterations: usize) {
  info!(?counts, "request variation");
  for &n in counts {
    for iter in 0..iterations {
      let requests = gen::random_requests(n, 50, 100, 10, gen::REQUEST_SEED + iter as u64);
      let fleet = gen::random_fleet(n_vehicles, capacity, 10, gen::FLEET_SEED + iter as u64);
      run_all(records, "requests", n as u32, iter, &requests, &fleet);
    }
  }
}

fn sweep_vehicles(records: &mut Vec<Record>, counts: &[usize], n_requests: usize, capacity: usize, iterations: usize) {
  info!(?counts, "vehicle variation");
  for &m in counts {
    for iter in 0..iterations {
      let requests = gen::random_requests(n_requests, 50, 100, 10, gen::REQUEST_SEED + iter as u64);
      let fleet = gen::random_fleet(m, capacity, 10, gen::FLEET_SEED + iter as u64);
      run_all(records, "vehicles", m as u32, iter, &requests, &fleet);
    }
  }
}

fn sweep_capacity(records: &mut Vec<Record>, capacities: &[usize], n_requests: usize, n_vehicles: usize, iterations: usize) {
  info!(?capacities, "capacity variation");
  for &cap in capacities {
    for iter in 0..iterations {
      let requests = gen::random_requests(n_requests, 50, 100, 10, gen::REQUEST_SEED + iter as u64);
      let fleet = gen::random_fleet(n_vehicles, cap, 10, gen::FLEET_SEED + iter as u64);
      run_all(records, "capacity", cap as u32, iter, &requests, &fleet);
    }
  }
}

fn sweep_deadline(records: &mut Vec<Record>, spans: &[u32], n_requests: usize, n_vehicles: usize, capacity: usize, iterations: usize) {
  info!(?spans, "deadline variation");
  for &span in spans {
    for iter in 0..iterations {
      let mut requests = gen::random_requests(n_requests, 50, 100, 10, gen::REQUEST_SEED + iter as u64);
      for r in &mut requests {
        r.deadline = r.release + span as Time;
      }
      let fleet = gen::random_fleet(n_vehicles, capacity, 10, gen::FLEET_SEED + iter as u64);
      run_all(records, "deadline", span, iter, &requests, &fleet);
    }
  }
}

fn run_quick(records: &mut Vec<Record>) {
  sweep_requests(records, &[20, 40, 60, 80], 10, 3, 2);
  sweep_vehicles(records, &[5, 10, 15, 20], 50, 3, 2);
  sweep_capacity(records, &[2, 3, 4], 50, 10, 2);
  sweep_deadline(records, &[30, 60, 90, 120], 50, 10, 3, 2);
}

fn run_full(records: &mut Vec<Record>) {
  sweep_requests(records, &[50, 100, 150, 200, 250, 300], 25, 3, 1);
  sweep_vehicles(records, &[10, 20, 30, 40, 50], 150, 3, 1);
  sweep_capacity(records, &[2, 3, 4, 5, 6], 150, 25, 1);
  sweep_deadline(records, &[30, 45, 60, 90, 120, 150], 150, 25, 3, 1);
}

fn write_csv(records: &[Record], path: &Path) -> Result<()> {
  let mut out = BufWriter::new(File::create(path)?);
  writeln!(out, "algorithm,parameter,value,iteration,time_ms,revenue,served,requests,vehicles")?;
  for r in records {
    writeln!(
      out,
      "{},{},{},{},{:.3},{},{},{},{}",
      r.algorithm, r.parameter, r.value, r.iteration, r.millis, r.revenue, r.served, r.requests, r.vehicles
    )?;
  }
  return Ok(());
}

fn main() -> Result<()> {
  let args: ClArgs = StructOpt::from_args();
  let _g = init_logging(args.output.log.clone());
  debug!(?args);

  let mut records = Vec::new();
  match args.suite {
    Suite::Quick => run_quick(&mut records),
    Suite::Full => run_full(&mut records),
    Suite::Requests => sweep_requests(&mut records, &[20, 40, 60, 80], 10, 3, 5),
    Suite::Vehicles => sweep_vehicles(&mut records, &[5, 10, 15, 20], 50, 3, 5),
    Suite::Capacity => sweep_capacity(&mut records, &[2, 3, 4], 50, 10, 5),
    Suite::Deadline => sweep_deadline(&mut records, &[30, 60, 90, 120], 50, 10, 3, 5),
  }

  let path = args
    .output
    .file
    .unwrap_or_else(|| PathBuf::from("benchmark_results.csv"));
  write_csv(&records, &path)?;
  info!(records = records.len(), path = %path.display(), "benchmark report written");
  return Ok(());
}
