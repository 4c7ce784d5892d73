use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;
use tracing::*;

use ridepool::data::{self, Request, Vehicle};
use ridepool::init_logging;
use ridepool::plan::{self, plan_gas, plan_gas_o1, plan_gas_o2, plan_gas_o2_with_rng};

mod common;
use common::*;

pub const STRATEGY_STRINGS: [&str; 4] = ["gas", "gas-o1", "gas-o2", "all"];

#[derive(Debug, Copy, Clone, PartialEq)]
enum Strategy {
  Gas,
  GasO1,
  GasO2,
  All,
}

impl FromStr for Strategy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return match s {
      "gas" => Ok(Self::Gas),
      "gas-o1" => Ok(Self::GasO1),
      "gas-o2" => Ok(Self::GasO2),
      "all" => Ok(Self::All),
      _ => Err(format!("invalid string: {}", s)),
    };
  }
}

impl Strategy {
  fn name(self) -> &'static str {
    match self {
      Strategy::Gas => "gas",
      Strategy::GasO1 => "gas-o1",
      Strategy::GasO2 => "gas-o2",
      Strategy::All => "all",
    }
  }

  fn selected(self) -> Vec<Strategy> {
    match self {
      Strategy::All => vec![Strategy::Gas, Strategy::GasO1, Strategy::GasO2],
      s => vec![s],
    }
  }
}

#[derive(Debug, StructOpt)]
struct ClArgs {
  #[structopt(parse(from_os_str))]
  instance: Option<PathBuf>,
  #[structopt(long, short = "s", default_value = "all", possible_values = &STRATEGY_STRINGS)]
  strategy: Strategy,
  #[structopt(long)]
  seed: Option<u64>,
  #[structopt(flatten)]
  output: OutputOptions,
}

fn fleet_record(requests: &[Request], fleet: &[Vehicle]) -> json::JsonValue {
  let vehicles: Vec<json::JsonValue> = fleet
    .iter()
    .map(|v| {
      json::object! {
        id: v.id,
        assigned: v.assigned.clone(),
        route: v.route.iter().map(|&(x, y)| json::array![x, y]).collect::<Vec<_>>(),
      }
    })
    .collect();
  return json::object! {
    vehicles: vehicles,
    total_payment: plan::total_payment(requests, fleet),
    served: plan::served_count(fleet),
  };
}

fn main() -> Result<()> {
  let args: ClArgs = StructOpt::from_args();
  let _g = init_logging(args.output.log.clone());
  debug!(?args);

  let payload = match &args.instance {
    Some(path) => fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?,
    None => {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
      buf
    }
  };
  let (requests, vehicles) = data::parse_instance(&payload)?;
  info!(requests = requests.len(), vehicles = vehicles.len(), "instance loaded");

  let mut report = json::JsonValue::new_object();
  for strategy in args.strategy.selected() {
    let mut fleet = vehicles.clone();
    info!(strategy = strategy.name(), "planning");
    match strategy {
      Strategy::Gas => plan_gas(&requests, &mut fleet),
      Strategy::GasO1 => plan_gas_o1(&requests, &mut fleet),
      Strategy::GasO2 => match args.seed {
        Some(seed) => plan_gas_o2_with_rng(&requests, &mut fleet, &mut StdRng::seed_from_u64(seed)),
        None => plan_gas_o2(&requests, &mut fleet),
      },
      Strategy::All => unreachable!(),
    }
    report[strategy.name()] = fleet_record(&requests, &fleet);
  }

  write_json(&report, args.output.file.as_deref())?;
  return Ok(());
}
