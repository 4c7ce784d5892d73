//! Seeded synthetic instances for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Pt, ReqId, Request, Time, VehId, Vehicle};

pub const REQUEST_SEED: u64 = 42;
pub const FLEET_SEED: u64 = 7;

/// Uniform requests on a `max_coord` square. Release times fall in the first
/// half of `max_time`; each deadline sits 10 to 40 time units after release.
pub fn random_requests(n: usize, max_coord: u32, max_time: u32, max_payment: u32, seed: u64) -> Vec<Request> {
  let mut rng = StdRng::seed_from_u64(seed);
  let coord = |rng: &mut StdRng| -> Pt {
    (rng.gen_range(0, max_coord + 1) as f64, rng.gen_range(0, max_coord + 1) as f64)
  };

  let mut requests = Vec::with_capacity(n);
  for id in 1..=(n as ReqId) {
    let origin = coord(&mut rng);
    let dest = coord(&mut rng);
    let release = rng.gen_range(0, max_time / 2 + 1) as Time;
    let slack = rng.gen_range(10, 41) as Time;
    let payment = rng.gen_range(1, max_payment + 1) as f64;
    requests.push(Request { id, origin, dest, release, deadline: release + slack, payment });
  }
  return requests;
}

/// A fleet of `m` identical-capacity vehicles scattered on a `max_coord`
/// square near the origin.
pub fn random_fleet(m: usize, capacity: usize, max_coord: u32, seed: u64) -> Vec<Vehicle> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut fleet = Vec::with_capacity(m);
  for id in 1..=(m as VehId) {
    let location = (rng.gen_range(0, max_coord + 1) as f64, rng.gen_range(0, max_coord + 1) as f64);
    fleet.push(Vehicle::new(id, location, capacity));
  }
  return fleet;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn requests_are_reproducible() {
    let a = random_requests(20, 50, 100, 10, REQUEST_SEED);
    let b = random_requests(20, 50, 100, 10, REQUEST_SEED);
    assert_eq!(a, b);
    let c = random_requests(20, 50, 100, 10, REQUEST_SEED + 1);
    assert_ne!(a, c);
  }

  #[test]
  fn requests_respect_bounds() {
    for r in random_requests(100, 50, 100, 10, 3) {
      assert!(r.origin.0 <= 50.0 && r.origin.1 <= 50.0);
      assert!(r.dest.0 <= 50.0 && r.dest.1 <= 50.0);
      assert!(r.release >= 0.0 && r.release <= 50.0);
      let span = r.deadline - r.release;
      assert!(span >= 10.0 && span <= 40.0);
      assert!(r.payment >= 1.0 && r.payment <= 10.0);
    }
  }

  #[test]
  fn fleet_ids_and_capacity() {
    let fleet = random_fleet(5, 3, 10, FLEET_SEED);
    assert_eq!(fleet.len(), 5);
    for (k, v) in fleet.iter().enumerate() {
      assert_eq!(v.id as usize, k + 1);
      assert_eq!(v.capacity, 3);
      assert!(v.assigned.is_empty() && v.route.is_empty());
    }
  }
}
