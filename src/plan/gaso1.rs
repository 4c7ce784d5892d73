use tracing::*;

use super::commit;
use super::lattice::Lattice;
use crate::data::{Pool, Request, Vehicle};
use crate::Set;

/// Shared-lattice strategy. One lattice is built over the whole pool and
/// reused for every vehicle; each vehicle scans it for the best group it can
/// still serve. The capacity bound comes from the actual fleet maximum; a
/// fixed constant here would starve any vehicle with a larger capacity.
#[instrument(level = "debug", skip(requests, vehicles), fields(requests = requests.len(), vehicles = vehicles.len()))]
pub fn plan_gas_o1(requests: &[Request], vehicles: &mut [Vehicle]) {
  let pool = Pool::new(requests);
  let max_cap = vehicles.iter().map(|v| v.capacity).max().unwrap_or(0);
  let tree = Lattice::build(&pool, max_cap, None);
  debug!(nodes = tree.len(), max_cap, "shared lattice built");

  let mut assigned = Set::default();
  for vehicle in vehicles.iter_mut() {
    if let Some(ix) = tree.best_within(&pool, vehicle, &assigned) {
      let group = pool.group(&tree.node(ix).ids);
      commit(vehicle, &group, &mut assigned);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::testutil::*;
  use super::*;

  #[test]
  fn assigns_best_pair() {
    let requests = pair_on_a_line();
    let mut fleet = vec![Vehicle::new(1, (0.0, 0.0), 2)];
    plan_gas_o1(&requests, &mut fleet);
    assert_eq!(fleet[0].assigned, vec![1, 2]);
    assert_eq!(
      fleet[0].route,
      vec![(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)]
    );
  }

  #[test]
  fn falls_back_to_best_single() {
    let mut requests = pair_on_a_line();
    requests[1].deadline = 1.0;
    let mut fleet = vec![Vehicle::new(1, (0.0, 0.0), 2)];
    plan_gas_o1(&requests, &mut fleet);
    assert_eq!(fleet[0].assigned, vec![1]);
  }

  #[test]
  fn splits_disjoint_requests_across_fleet() {
    let requests = vec![
      request(1, (0.0, 0.0), (1.0, 0.0), 0.0, 5.0, 10.0),
      request(2, (10.0, 0.0), (11.0, 0.0), 0.0, 5.0, 8.0),
    ];
    let mut fleet = vec![
      Vehicle::new(1, (0.0, 0.0), 1),
      Vehicle::new(2, (10.0, 0.0), 1),
    ];
    plan_gas_o1(&requests, &mut fleet);
    assert_eq!(fleet[0].assigned, vec![1]);
    assert_eq!(fleet[1].assigned, vec![2]);
  }

  #[test]
  fn bound_follows_fleet_capacity() {
    // a capacity-4 vehicle must be offered size-4 groups
    let requests = chain(4);
    let mut fleet = vec![Vehicle::new(1, (0.0, 0.0), 4)];
    plan_gas_o1(&requests, &mut fleet);
    assert_eq!(fleet[0].assigned, vec![1, 2, 3, 4]);
  }

  #[test]
  fn later_vehicle_gets_the_remainder() {
    let requests = chain(3);
    let mut fleet = vec![
      Vehicle::new(1, (0.0, 0.0), 2),
      Vehicle::new(2, (0.0, 0.0), 2),
    ];
    plan_gas_o1(&requests, &mut fleet);
    // first vehicle takes the most profitable pair {2,3}; the second is
    // left with the singleton {1}
    assert_eq!(fleet[0].assigned, vec![2, 3]);
    assert_eq!(fleet[1].assigned, vec![1]);
  }

  #[test]
  fn repeated_runs_agree() {
    use crate::data::gen;
    let requests = gen::random_requests(12, 30, 60, 10, gen::REQUEST_SEED);
    let fleet = gen::random_fleet(4, 2, 10, gen::FLEET_SEED);

    let mut first = fleet.clone();
    plan_gas_o1(&requests, &mut first);
    let mut second = fleet;
    plan_gas_o1(&requests, &mut second);

    for (a, b) in first.iter().zip(second.iter()) {
      assert_eq!(a.assigned, b.assigned);
      assert_eq!(a.route, b.route);
    }
  }

  #[test]
  fn degenerate_inputs_are_noops() {
    let mut fleet = vec![Vehicle::new(1, (0.0, 0.0), 2)];
    plan_gas_o1(&[], &mut fleet);
    assert!(fleet[0].assigned.is_empty());

    let requests = pair_on_a_line();
    plan_gas_o1(&requests, &mut []);

    let mut zero_cap = vec![Vehicle::new(1, (0.0, 0.0), 0)];
    plan_gas_o1(&requests, &mut zero_cap);
    assert!(zero_cap[0].assigned.is_empty());
  }
}
