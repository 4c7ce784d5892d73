use itertools::Itertools;
use tracing::*;

use crate::data::{Money, Pool, ReqId, Request, Time, Vehicle};
use crate::Set;

pub mod gas;
pub mod gaso1;
pub mod gaso2;
pub mod lattice;

pub use gas::plan_gas;
pub use gaso1::plan_gas_o1;
pub use gaso2::{plan_gas_o2, plan_gas_o2_with_rng};

/// Safety margin on the tightest deadline, in travel-time units. A group is
/// only accepted when its minimum slack reaches this value; exactly 1.0
/// passes, anything below does not.
pub const MIN_SLACK: Time = 1.0;

pub mod slack {
  use super::*;
  use crate::data::{euclidean, Pt};

  /// Simulates serving `group` in the given order, pickup then drop-off for
  /// each request, starting from `location` at time zero. Travel time is the
  /// Euclidean distance; the vehicle waits at a pickup until its release.
  /// Returns the smallest deadline margin seen, or `None` as soon as any
  /// deadline is missed. An empty group has infinite slack.
  ///
  /// Callers pass groups in ascending-id order. That fixed visit order is a
  /// known simplification; there is no route optimisation here.
  pub fn min_slack(location: Pt, group: &[&Request]) -> Option<Time> {
    let mut time: Time = 0.0;
    let mut loc = location;
    let mut min = Time::INFINITY;

    for r in group {
      time += euclidean(loc, r.origin);
      if time < r.release {
        time = r.release; // wait for the pickup window to open
      }
      time += euclidean(r.origin, r.dest);

      let slack = r.deadline - time;
      if slack < 0.0 {
        return None;
      }
      min = min.min(slack);
      loc = r.dest;
    }
    return Some(min);
  }

  /// Capacity check plus the minimum-slack threshold.
  pub fn is_feasible(group: &[&Request], vehicle: &Vehicle) -> bool {
    if group.len() > vehicle.capacity {
      return false;
    }
    return match min_slack(vehicle.location, group) {
      Some(s) => s >= MIN_SLACK,
      None => false,
    };
  }
}

/// Records a selected group on the vehicle: ids appended in group order, the
/// shared assigned set extended, the route projection rebuilt, and the
/// assignment report line emitted.
pub(crate) fn commit(vehicle: &mut Vehicle, group: &[&Request], assigned: &mut Set<ReqId>) {
  debug_assert!(!group.is_empty());
  let profit: Money = group.iter().map(|r| r.payment).sum();

  for r in group {
    vehicle.assigned.push(r.id);
    assigned.insert(r.id);
  }

  vehicle.route.clear();
  vehicle.route.push(vehicle.location);
  for r in group {
    vehicle.route.push(r.origin);
    vehicle.route.push(r.dest);
  }

  info!(
    "Vehicle {} assigned requests: {} | Total Payment: {}",
    vehicle.id,
    group.iter().map(|r| r.id).join(" "),
    profit
  );
}

/// Sum of payments over every assigned request in the fleet.
pub fn total_payment(requests: &[Request], vehicles: &[Vehicle]) -> Money {
  let pool = Pool::new(requests);
  return vehicles
    .iter()
    .flat_map(|v| v.assigned.iter())
    .filter_map(|&id| pool.get(id))
    .map(|r| r.payment)
    .sum();
}

pub fn served_count(vehicles: &[Vehicle]) -> usize {
  return vehicles.iter().map(|v| v.assigned.len()).sum();
}
