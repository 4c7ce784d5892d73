use itertools::Itertools;
use tracing::*;

use super::{commit, slack};
use crate::data::{Money, ReqId, Request, Vehicle};
use crate::Set;

/// Brute-force baseline. Every subset of the pool up to the fleet's maximum
/// capacity is enumerated once, with no feasibility pruning at generation
/// time; each vehicle then greedily takes the highest-payment remaining
/// subset it can serve. Candidate generation is binomial in the pool size.
#[instrument(level = "debug", skip(requests, vehicles), fields(requests = requests.len(), vehicles = vehicles.len()))]
pub fn plan_gas(requests: &[Request], vehicles: &mut [Vehicle]) {
  let max_cap = vehicles.iter().map(|v| v.capacity).max().unwrap_or(0);

  let mut candidates: Vec<Vec<&Request>> = Vec::new();
  for k in 1..=max_cap {
    candidates.extend(requests.iter().combinations(k));
  }
  debug!(candidates = candidates.len(), max_cap, "subsets enumerated");

  let mut assigned: Set<ReqId> = Set::default();
  for vehicle in vehicles.iter_mut() {
    let mut best: Option<(usize, Money)> = None;
    for (ix, group) in candidates.iter().enumerate() {
      if group.iter().any(|r| assigned.contains(&r.id)) {
        continue;
      }
      if !slack::is_feasible(group, vehicle) {
        continue;
      }
      let profit: Money = group.iter().map(|r| r.payment).sum();
      match best {
        // ties keep the earlier candidate in enumeration order
        Some((_, p)) if profit <= p => {}
        _ => best = Some((ix, profit)),
      }
    }
    if let Some((ix, _)) = best {
      commit(vehicle, &candidates[ix], &mut assigned);
    }
  }
}
