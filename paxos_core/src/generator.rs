//! Proposal-number generators.
//!
//! Every generator must produce numbers that are strictly increasing across calls on the same
//! node, and globally unique across nodes, so that no two nodes can ever issue the same proposal
//! id.  Both generators below pack the node's index into the low bits to guarantee uniqueness
//! across nodes; they differ in how they choose the high bits.

use std::time::{SystemTime, UNIX_EPOCH};

use paxos_pb::NodeID;

const NODE_BITS: u32 = 16;
const NODE_MASK: u64 = (1 << NODE_BITS) - 1;

/// Produces proposal numbers for one node.  Implementations must never produce the same number
/// twice, and must never produce a number at or below a given floor.
pub trait ProposalGenerator: Send {
    /// Return a proposal number strictly greater than every number this generator has returned
    /// before, and strictly greater than `floor` (typically the highest number this node has
    /// seen nacked or promised by a peer).
    fn next(&mut self, floor: u64) -> u64;
}

fn pack(sequence: u64, node: NodeID) -> u64 {
    (sequence << NODE_BITS) | (node.index() as u64 & NODE_MASK)
}

fn sequence_of(id: u64) -> u64 {
    id >> NODE_BITS
}

/// Increments a counter by one on every call.  Deterministic and the default choice for tests
/// and for clusters that have no use for wall-clock-correlated ids.
pub struct Incremental {
    node: NodeID,
    sequence: u64,
}

impl Incremental {
    pub fn new(node: NodeID) -> Self {
        Self { node, sequence: 0 }
    }
}

impl ProposalGenerator for Incremental {
    fn next(&mut self, floor: u64) -> u64 {
        let floor_sequence = sequence_of(floor);
        self.sequence = self.sequence.max(floor_sequence).saturating_add(1);
        pack(self.sequence, self.node)
    }
}

/// Derives its sequence from the current wall-clock time in milliseconds, so that proposal
/// numbers issued later in real time sort after those issued earlier, even across a process
/// restart.  Hardened against clock regression: it remembers the highest sequence it has ever
/// issued and never issues a lower one, whether the wall clock moves backwards or the process
/// restarts with `last_issued` recovered from a snapshot.
pub struct TimeAware {
    node: NodeID,
    last_issued: u64,
}

impl TimeAware {
    pub fn new(node: NodeID) -> Self {
        Self {
            node,
            last_issued: 0,
        }
    }

    /// Reconstructs a generator that will never issue a sequence at or below `last_issued`, as
    /// recovered from persisted state.  Used on restart so a proposer never reuses a number it
    /// issued in a previous life of the process.
    pub fn recover(node: NodeID, last_issued: u64) -> Self {
        Self { node, last_issued }
    }

    /// The highest sequence issued so far.  Callers persist this alongside a snapshot so
    /// `recover` can rebuild an equivalent generator after a restart.
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl ProposalGenerator for TimeAware {
    fn next(&mut self, floor: u64) -> u64 {
        let floor_sequence = sequence_of(floor);
        let candidate = Self::now_millis().max(self.last_issued + 1).max(floor_sequence + 1);
        self.last_issued = candidate;
        pack(candidate, self.node)
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
