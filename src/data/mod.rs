use anyhow::{anyhow, Context, Result};
use json::JsonValue;
use std::fs;
use std::path::Path;
use tracing::*;

use crate::Map;

pub mod gen;

pub type Time = f64;
pub type Money = f64;
pub type ReqId = u32;
pub type VehId = u32;
pub type Pt = (f64, f64);

#[inline]
pub fn euclidean(a: Pt, b: Pt) -> f64 {
  return (a.0 - b.0).hypot(a.1 - b.1);
}

/// A ride request. Read-only for the whole of a planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  pub id: ReqId,
  pub origin: Pt,
  pub dest: Pt,
  pub release: Time,
  pub deadline: Time,
  pub payment: Money,
}

/// A vehicle. Planners append to `assigned` and rebuild `route`; `location`
/// and `capacity` are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
  pub id: VehId,
  pub location: Pt,
  pub capacity: usize,
  pub assigned: Vec<ReqId>,
  /// Reporting projection of the assignment: start location, then the
  /// origin/destination pair of each assigned request in selection order.
  /// Echoes the selection, not a distance-optimal path.
  pub route: Vec<Pt>,
}

impl Vehicle {
  pub fn new(id: VehId, location: Pt, capacity: usize) -> Self {
    return Vehicle { id, location, capacity, assigned: Vec::new(), route: Vec::new() };
  }
}

/// Request pool with an id lookup, so groups of ids can be materialised
/// without scanning the whole request slice each time.
pub struct Pool<'a> {
  requests: Vec<&'a Request>,
  by_id: Map<ReqId, &'a Request>,
}

impl<'a> Pool<'a> {
  pub fn new(requests: &'a [Request]) -> Self {
    return Self::from_refs(requests.iter().collect());
  }

  pub fn from_refs(requests: Vec<&'a Request>) -> Self {
    let by_id = requests.iter().map(|&r| (r.id, r)).collect();
    return Pool { requests, by_id };
  }

  pub fn len(&self) -> usize {
    self.requests.len()
  }

  pub fn is_empty(&self) -> bool {
    self.requests.is_empty()
  }

  pub fn iter<'b>(&'b self) -> impl Iterator<Item = &'a Request> + 'b {
    self.requests.iter().copied()
  }

  pub fn get(&self, id: ReqId) -> Option<&'a Request> {
    self.by_id.get(&id).copied()
  }

  /// Materialise a group of ids, preserving their order. Ids must belong to
  /// this pool.
  pub fn group(&self, ids: &[ReqId]) -> Vec<&'a Request> {
    return ids.iter().map(|id| self.by_id[id]).collect();
  }
}

fn parse_pt(v: &JsonValue) -> Result<Pt> {
  let x = v[0].as_f64().ok_or_else(|| anyhow!("bad coordinate pair: {}", v))?;
  let y = v[1].as_f64().ok_or_else(|| anyhow!("bad coordinate pair: {}", v))?;
  return Ok((x, y));
}

pub fn parse_requests(arr: &JsonValue) -> Result<Vec<Request>> {
  let mut requests = Vec::new();
  for r in arr.members() {
    let id = r["id"].as_u32().ok_or_else(|| anyhow!("request missing id: {}", r))?;
    requests.push(Request {
      id,
      origin: parse_pt(&r["pick"]).with_context(|| format!("request {}", id))?,
      dest: parse_pt(&r["drop"]).with_context(|| format!("request {}", id))?,
      release: r["release"]
        .as_f64()
        .ok_or_else(|| anyhow!("request {} missing release", id))?,
      deadline: r["deadline"]
        .as_f64()
        .ok_or_else(|| anyhow!("request {} missing deadline", id))?,
      payment: r["payment"].as_f64().unwrap_or(0.0),
    });
  }
  return Ok(requests);
}

pub fn parse_vehicles(arr: &JsonValue) -> Result<Vec<Vehicle>> {
  let mut vehicles = Vec::new();
  for v in arr.members() {
    let id = v["id"].as_u32().ok_or_else(|| anyhow!("vehicle missing id: {}", v))?;
    vehicles.push(Vehicle::new(
      id,
      parse_pt(&v["start"]).with_context(|| format!("vehicle {}", id))?,
      v["capacity"]
        .as_usize()
        .ok_or_else(|| anyhow!("vehicle {} missing capacity", id))?,
    ));
  }
  return Ok(vehicles);
}

/// Parses an instance payload of the form
/// `{"requests": [{id, pick, drop, release, deadline, payment}, ..],
///   "vehicles": [{id, start, capacity}, ..]}`.
pub fn parse_instance(text: &str) -> Result<(Vec<Request>, Vec<Vehicle>)> {
  let payload = json::parse(text).context("instance is not valid json")?;
  if payload["requests"].is_null() {
    warn!("no 'requests' array in instance payload");
  }
  if payload["vehicles"].is_null() {
    warn!("no 'vehicles' array in instance payload");
  }
  let requests = parse_requests(&payload["requests"])?;
  let vehicles = parse_vehicles(&payload["vehicles"])?;
  return Ok((requests, vehicles));
}

pub fn read_instance(path: impl AsRef<Path>) -> Result<(Vec<Request>, Vec<Vehicle>)> {
  let path = path.as_ref();
  let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
  return parse_instance(&text);
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAYLOAD: &str = r#"{
    "requests": [
      {"id": 1, "pick": [0, 0], "drop": [1, 0], "release": 0, "deadline": 5, "payment": 10},
      {"id": 2, "pick": [1, 0], "drop": [2, 0], "release": 0, "deadline": 5}
    ],
    "vehicles": [
      {"id": 7, "start": [3, 4], "capacity": 2}
    ]
  }"#;

  #[test]
  fn parse_payload() -> Result<()> {
    let (requests, vehicles) = parse_instance(PAYLOAD)?;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].id, 1);
    assert_eq!(requests[0].origin, (0.0, 0.0));
    assert_eq!(requests[0].dest, (1.0, 0.0));
    assert_eq!(requests[0].deadline, 5.0);
    assert_eq!(requests[0].payment, 10.0);
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].id, 7);
    assert_eq!(vehicles[0].location, (3.0, 4.0));
    assert_eq!(vehicles[0].capacity, 2);
    assert!(vehicles[0].assigned.is_empty());
    return Ok(());
  }

  #[test]
  fn missing_payment_defaults_to_zero() -> Result<()> {
    let (requests, _) = parse_instance(PAYLOAD)?;
    assert_eq!(requests[1].payment, 0.0);
    return Ok(());
  }

  #[test]
  fn missing_id_is_an_error() {
    let bad = r#"{"requests": [{"pick": [0, 0], "drop": [1, 0], "release": 0, "deadline": 5}], "vehicles": []}"#;
    assert!(parse_instance(bad).is_err());
  }

  #[test]
  fn empty_payload_parses_to_empty_pools() -> Result<()> {
    let (requests, vehicles) = parse_instance("{}")?;
    assert!(requests.is_empty());
    assert!(vehicles.is_empty());
    return Ok(());
  }

  #[test]
  fn euclidean_is_hypot() {
    assert_eq!(euclidean((0.0, 0.0), (3.0, 4.0)), 5.0);
    assert_eq!(euclidean((1.0, 1.0), (1.0, 1.0)), 0.0);
  }

  #[test]
  fn pool_lookup() {
    let (requests, _) = parse_instance(PAYLOAD).unwrap();
    let pool = Pool::new(&requests);
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.get(2).map(|r| r.id), Some(2));
    assert!(pool.get(99).is_none());
    let group = pool.group(&[2, 1]);
    assert_eq!(group[0].id, 2);
    assert_eq!(group[1].id, 1);
  }
}
