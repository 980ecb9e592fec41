//! The per-key server: one instance of single-decree Paxos, multiplexed by an opaque key.
//! `dictionary` owns one of these per key and is the only thing that drives it.

use paxos_pb::{Decree, Message, NodeID};

use crate::generator::ProposalGenerator;
use crate::roles::{Acceptor, Learner, Proposer};

/// One outgoing message, addressed to a specific peer.
pub struct Outbound {
    pub dest: NodeID,
    pub message: Message,
}

impl Outbound {
    fn to(dest: NodeID, message: Message) -> Self {
        Self { dest, message }
    }
}

/// Composes the acceptor, learner, and proposer roles that together decide a single value. One
/// [PerKeyServer] runs all three roles at once, the way every node in a Paxos cluster is
/// simultaneously a proposer, an acceptor, and a learner for every key.
pub struct PerKeyServer {
    acceptor: Acceptor,
    learner: Learner,
    proposer: Proposer,
}

impl PerKeyServer {
    pub fn new(generator: Box<dyn ProposalGenerator>) -> Self {
        Self {
            acceptor: Acceptor::new(),
            learner: Learner::new(),
            proposer: Proposer::new(generator),
        }
    }

    /// Rehydrates a server that already learned its value from a snapshot. No further proposer
    /// activity is expected, but the server remains fully functional: acceptors and learners
    /// restored this way answer `Prepare`/`Query` exactly as if they had reached consensus the
    /// ordinary way.
    pub fn with_consensus(id: u64, value: Vec<u8>, generator: Box<dyn ProposalGenerator>) -> Self {
        Self {
            acceptor: Acceptor::with_accepted(id, value.clone()),
            learner: Learner::with_consensus(value),
            proposer: Proposer::new(generator),
        }
    }

    pub fn consensus(&self) -> Option<&Vec<u8>> {
        self.learner.consensus()
    }

    pub fn accepted(&self) -> Option<&Decree> {
        self.acceptor.accepted()
    }

    /// Starts a new proposal round for `value`. A no-op (in terms of protocol correctness, not
    /// liveness) if consensus has already been reached: the broadcast `Prepare` will always lose
    /// to the acceptors' already-promised watermark, and the learner ignores any `Accepted` that
    /// might still result.
    pub fn propose(&mut self, nodes: &[NodeID], quorum_size: usize, value: Vec<u8>) -> Vec<Outbound> {
        let prepare = self.proposer.propose(quorum_size, value);
        broadcast(nodes, prepare)
    }

    /// Broadcasts a `Query` to every peer, used to catch up a learner that has not yet reached
    /// consensus on this key.
    pub fn query(&self, nodes: &[NodeID]) -> Vec<Outbound> {
        broadcast(nodes, Message::Query {})
    }

    /// Dispatches one inbound message from `from`, returning every outbound message it
    /// provokes. Returns whether this call newly reached consensus, so the caller can decide to
    /// wake up anyone blocked waiting on this key.
    pub fn handle(
        &mut self,
        from: NodeID,
        nodes: &[NodeID],
        quorum_size: usize,
        message: Message,
    ) -> (Vec<Outbound>, bool) {
        match message {
            Message::Prepare { id } => {
                let reply = self.acceptor.handle_prepare(id);
                (vec![Outbound::to(from, reply)], false)
            }
            Message::Accept { id, value } => {
                let reply = self.acceptor.handle_accept(id, value);
                let mut out = vec![Outbound::to(from, reply.clone())];
                if let Message::Accepted { .. } = &reply {
                    out.extend(broadcast(nodes, reply));
                }
                (out, false)
            }
            Message::Promise { id, prev } => {
                let accept = self
                    .proposer
                    .handle_promise(from, id, prev, quorum_size);
                match accept {
                    Some(accept) => (broadcast(nodes, accept), false),
                    None => (Vec::new(), false),
                }
            }
            Message::Nack { id } => {
                if let Some(value) = self.proposer.handle_nack(id) {
                    (self.propose(nodes, quorum_size, value), false)
                } else {
                    (Vec::new(), false)
                }
            }
            Message::Accepted { id, value } => {
                let newly_learned =
                    self.learner
                        .handle_accepted(from, id, value.clone(), quorum_size);
                // The proposer tracks its own accept round independently, so it can notice a
                // quorum even when this node is not (yet) in the learner's own accumulator.
                self.proposer.handle_accepted(from, id);
                (Vec::new(), newly_learned)
            }
            Message::Query {} => {
                let reply = self.learner.handle_query();
                (vec![Outbound::to(from, reply)], false)
            }
            Message::QueryResponse { value } => {
                let newly_learned = self.learner.handle_query_response(value);
                (Vec::new(), newly_learned)
            }
            Message::Consensus { .. } | Message::Request { .. } => {
                // `Consensus` is announced implicitly via `consensus()`/the `newly_learned` flag
                // above; `Request` is handled by `propose`, not `handle`. Neither ever arrives
                // over the wire.
                (Vec::new(), false)
            }
        }
    }
}

fn broadcast(nodes: &[NodeID], message: Message) -> Vec<Outbound> {
    nodes
        .iter()
        .map(|node| Outbound::to(*node, message.clone()))
        .collect()
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
