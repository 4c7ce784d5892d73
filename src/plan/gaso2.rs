use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use tracing::*;

use super::commit;
use super::lattice::Lattice;
use crate::data::{euclidean, Pool, ReqId, Request, Vehicle};
use crate::Set;

/// Coarse reachability prefilter: keep unassigned requests whose pickup lies
/// within the trip's own time window from the vehicle. Looser than the full
/// slack check; it only bounds the pool a local lattice is built from.
fn reachable<'a>(vehicle: &Vehicle, pool: &Pool<'a>, assigned: &Set<ReqId>) -> Vec<&'a Request> {
  return pool
    .iter()
    .filter(|r| !assigned.contains(&r.id))
    .filter(|r| euclidean(vehicle.location, r.origin) <= r.deadline - r.release)
    .collect();
}

/// Localised-lattice strategy with a fresh entropy seed. Use
/// [`plan_gas_o2_with_rng`] to pin the vehicle processing order.
pub fn plan_gas_o2(requests: &[Request], vehicles: &mut [Vehicle]) {
  plan_gas_o2_with_rng(requests, vehicles, &mut thread_rng());
}

/// Localised-lattice strategy. Vehicles are processed in a shuffled order;
/// each one filters the unassigned pool down to reachable requests, builds a
/// private lattice bounded by its own capacity, and takes the best node that
/// survives a final feasibility check against the full request records.
/// Scoping the lattice to the reachable pool keeps its size bounded by local
/// demand rather than the fleet-wide request count.
#[instrument(level = "debug", skip(requests, vehicles, rng), fields(requests = requests.len(), vehicles = vehicles.len()))]
pub fn plan_gas_o2_with_rng<R: Rng>(requests: &[Request], vehicles: &mut [Vehicle], rng: &mut R) {
  let pool = Pool::new(requests);

  // shuffle an index permutation; the caller's fleet order is left alone
  let mut order: Vec<usize> = (0..vehicles.len()).collect();
  order.shuffle(rng);

  let mut assigned = Set::default();
  for &vi in &order {
    let vehicle = &mut vehicles[vi];

    let candidates = reachable(vehicle, &pool, &assigned);
    if candidates.is_empty() {
      debug!(vehicle = vehicle.id, "no reachable requests");
      continue;
    }

    let local = Pool::from_refs(candidates);
    let tree = Lattice::build(&local, vehicle.capacity, Some(vehicle.location));
    trace!(vehicle = vehicle.id, pool = local.len(), nodes = tree.len(), "local lattice");

    if let Some(ix) = tree.best_within(&pool, vehicle, &assigned) {
      let group = pool.group(&tree.node(ix).ids);
      commit(vehicle, &group, &mut assigned);
    }
  }
}
