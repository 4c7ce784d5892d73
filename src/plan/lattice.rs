use tracing::*;

use super::{slack, MIN_SLACK};
use crate::data::{Money, Pool, Pt, ReqId, Vehicle};
use crate::Set;

pub type NodeIx = usize;

pub const ROOT: NodeIx = 0;

/// One candidate group of request ids. A level-k node holds exactly k ids,
/// kept sorted ascending; `profit` is the exact sum of the member payments.
#[derive(Debug, Clone)]
pub struct Node {
  pub ids: Vec<ReqId>,
  pub profit: Money,
  pub parent: Option<NodeIx>,
  pub children: Vec<NodeIx>,
}

/// The additive tree of request groups, grown level by level up to a
/// capacity bound. Nodes live in an arena addressed by index; the arena owns
/// every node and is dropped as one unit with the planner call that built
/// it. A synthetic root at index 0 holds the empty id set and owns all
/// singletons.
pub struct Lattice {
  nodes: Vec<Node>,
}

impl Lattice {
  /// Builds the lattice over `pool`. Level 1 holds a singleton per request;
  /// level L is formed from unordered pairs of level-(L-1) nodes whose id
  /// union has exactly L elements, the new node parented under the earlier
  /// pair member. Identical unions reachable from several pairs are created
  /// once; a canonical sorted-id key filters the rest.
  ///
  /// `context` is the start location unions are slack-checked against while
  /// levels grow. `None` skips that prune: the shared-lattice strategy
  /// re-checks every node against each vehicle at query time, and pruning
  /// against any single location would discard groups some other vehicle
  /// could still serve.
  #[instrument(level = "debug", skip(pool, context), fields(pool = pool.len()))]
  pub fn build(pool: &Pool, bound: usize, context: Option<Pt>) -> Self {
    let mut nodes = vec![Node {
      ids: Vec::new(),
      profit: 0.0,
      parent: None,
      children: Vec::new(),
    }];

    if bound == 0 {
      return Lattice { nodes };
    }

    let mut level: Vec<NodeIx> = Vec::with_capacity(pool.len());
    for r in pool.iter() {
      let ix = nodes.len();
      nodes.push(Node {
        ids: vec![r.id],
        profit: r.payment,
        parent: Some(ROOT),
        children: Vec::new(),
      });
      nodes[ROOT].children.push(ix);
      level.push(ix);
    }

    for depth in 2..=bound {
      let mut next: Vec<NodeIx> = Vec::new();
      let mut seen: Set<Vec<ReqId>> = Set::default();

      for a in 0..level.len() {
        for b in a + 1..level.len() {
          let union = merge_ids(&nodes[level[a]].ids, &nodes[level[b]].ids);
          if union.len() != depth || seen.contains(&union) {
            continue;
          }
          let group = pool.group(&union);
          if let Some(loc) = context {
            match slack::min_slack(loc, &group) {
              Some(s) if s >= MIN_SLACK => {}
              _ => continue,
            }
          }
          let profit: Money = group.iter().map(|r| r.payment).sum();
          trace!(?union, profit, "group node");

          let ix = nodes.len();
          let parent = level[a];
          nodes.push(Node {
            ids: union.clone(),
            profit,
            parent: Some(parent),
            children: Vec::new(),
          });
          nodes[parent].children.push(ix);
          seen.insert(union);
          next.push(ix);
        }
      }
      if next.is_empty() {
        break;
      }
      level = next;
    }

    debug!(nodes = nodes.len(), "lattice built");
    return Lattice { nodes };
  }

  pub fn node(&self, ix: NodeIx) -> &Node {
    &self.nodes[ix]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Every node index, root included, in depth-first order. Used for
  /// scanning only; the order is not part of the contract.
  pub fn all_nodes(&self) -> Vec<NodeIx> {
    let mut out = Vec::with_capacity(self.nodes.len());
    let mut stack = vec![ROOT];
    while let Some(ix) = stack.pop() {
      out.push(ix);
      stack.extend(self.nodes[ix].children.iter().copied());
    }
    return out;
  }

  /// Highest-profit non-empty node that fits within `vehicle`'s capacity,
  /// avoids `assigned`, and passes a fresh feasibility check from the
  /// vehicle's own location. Ties go to the node met first in traversal
  /// order. The stored build-time feasibility is not trusted here; it was
  /// evaluated against whatever context the lattice was built with.
  pub fn best_within(&self, pool: &Pool, vehicle: &Vehicle, assigned: &Set<ReqId>) -> Option<NodeIx> {
    let mut best: Option<(NodeIx, Money)> = None;
    for ix in self.all_nodes() {
      let node = &self.nodes[ix];
      if node.ids.is_empty() || node.ids.len() > vehicle.capacity {
        continue;
      }
      if let Some((_, p)) = best {
        // not an improvement, skip before the slack simulation
        if node.profit <= p {
          continue;
        }
      }
      if node.ids.iter().any(|id| assigned.contains(id)) {
        continue;
      }
      let group = pool.group(&node.ids);
      if !slack::is_feasible(&group, vehicle) {
        continue;
      }
      best = Some((ix, node.profit));
    }
    return best.map(|(ix, _)| ix);
  }
}

/// Union of two ascending id lists, kept ascending.
fn merge_ids(a: &[ReqId], b: &[ReqId]) -> Vec<ReqId> {
  let mut out = Vec::with_capacity(a.len() + 1);
  let (mut i, mut j) = (0, 0);
  while i < a.len() && j < b.len() {
    if a[i] < b[j] {
      out.push(a[i]);
      i += 1;
    } else if b[j] < a[i] {
      out.push(b[j]);
      j += 1;
    } else {
      out.push(a[i]);
      i += 1;
      j += 1;
    }
  }
  out.extend_from_slice(&a[i..]);
  out.extend_from_slice(&b[j..]);
  return out;
}
