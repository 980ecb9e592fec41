//! Counts distinct responses until a quorum is reached.

use std::collections::HashMap;

use paxos_pb::NodeID;

/// Accumulates one response per node until a quorum of `need` distinct nodes has replied.
/// Duplicate replies from the same node are ignored rather than counted twice: a retransmitted
/// `Prepare`/`Accept` must not let a single slow node's duplicate answer masquerade as two votes.
pub struct QuorumAccumulator<T> {
    need: usize,
    responses: HashMap<NodeID, T>,
}

impl<T> QuorumAccumulator<T> {
    pub fn new(need: usize) -> Self {
        Self {
            need,
            responses: HashMap::new(),
        }
    }

    /// Records `response` from `node`.  Returns true the first time the quorum is reached; once
    /// reached, later calls return false even though the quorum remains satisfied.
    pub fn record(&mut self, node: NodeID, response: T) -> bool {
        let had_quorum = self.responses.len() >= self.need;
        self.responses.insert(node, response);
        !had_quorum && self.responses.len() >= self.need
    }

    pub fn has_quorum(&self) -> bool {
        self.responses.len() >= self.need
    }

    pub fn responses(&self) -> impl Iterator<Item = (&NodeID, &T)> {
        self.responses.iter()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
