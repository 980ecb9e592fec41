//! The four role behaviors that together implement single-decree Paxos for one key: proposer,
//! acceptor, learner, and questioner.  Each role is a small state machine that only knows about
//! [Message]s and [Decree]s; `server` composes the four into the per-key server that the
//! dictionary actually drives.

use paxos_pb::{Decree, Message, NodeID};

use crate::generator::ProposalGenerator;
use crate::quorum::QuorumAccumulator;

/// The acceptor is the durable memory of the protocol: it promises not to accept proposals below
/// a watermark, and remembers the highest-numbered value it has actually accepted.
#[derive(Default)]
pub struct Acceptor {
    promised: u64,
    accepted: Option<Decree>,
}

impl Acceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates an acceptor that already learned a value, e.g. via [super::dictionary]
    /// snapshot restore. `id` becomes both the promised watermark and the accepted decree's id.
    pub fn with_accepted(id: u64, value: Vec<u8>) -> Self {
        Self {
            promised: id,
            accepted: Some(Decree::new(id, value)),
        }
    }

    pub fn accepted(&self) -> Option<&Decree> {
        self.accepted.as_ref()
    }

    /// Handles an incoming `Prepare{id}`, returning the reply to send back to the proposer.
    pub fn handle_prepare(&mut self, id: u64) -> Message {
        if id >= self.promised {
            self.promised = id;
            Message::Promise {
                id,
                prev: self.accepted.clone(),
            }
        } else {
            Message::Nack { id: self.promised }
        }
    }

    /// Handles an incoming `Accept{id, value}`, returning the reply to send back to the
    /// proposer.  Acceptors also broadcast `Accepted` to every learner; `server` does that
    /// broadcast when this returns an `Accepted` message.
    pub fn handle_accept(&mut self, id: u64, value: Vec<u8>) -> Message {
        if id >= self.promised {
            self.promised = id;
            self.accepted = Some(Decree::new(id, value.clone()));
            Message::Accepted { id, value }
        } else {
            Message::Nack { id: self.promised }
        }
    }
}

/// The learner watches for a quorum of `Accepted` messages carrying the same id, at which point
/// the value is fixed forever.  It also answers `Query` gossip from learners that have not yet
/// reached consensus.
#[derive(Default)]
pub struct Learner {
    leading: Option<(u64, QuorumAccumulator<()>)>,
    consensus: Option<Vec<u8>>,
}

impl Learner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consensus(value: Vec<u8>) -> Self {
        Self {
            leading: None,
            consensus: Some(value),
        }
    }

    pub fn consensus(&self) -> Option<&Vec<u8>> {
        self.consensus.as_ref()
    }

    /// Handles an `Accepted{id, value}` from `from`.  Once consensus has been reached, later
    /// `Accepted` messages are no-ops: the value the learner already fixed can never change.
    /// Returns true the instant consensus is newly reached.
    pub fn handle_accepted(
        &mut self,
        from: NodeID,
        id: u64,
        value: Vec<u8>,
        quorum_size: usize,
    ) -> bool {
        if self.consensus.is_some() {
            return false;
        }
        let fresh = match &self.leading {
            Some((leading_id, _)) => id > *leading_id,
            None => true,
        };
        if fresh {
            self.leading = Some((id, QuorumAccumulator::new(quorum_size)));
        }
        let Some((leading_id, quorum)) = &mut self.leading else {
            return false;
        };
        if *leading_id != id {
            // A message for a lower id than the one we're tracking; the proposer that issued it
            // lost a race and this learner already moved on.
            return false;
        }
        let reached = quorum.record(from, ());
        if reached {
            self.consensus = Some(value);
        }
        reached
    }

    /// Handles a `Query` from a peer learner, returning the response to send back.
    pub fn handle_query(&self) -> Message {
        Message::QueryResponse {
            value: self.consensus.clone(),
        }
    }

    /// Handles a `QueryResponse` learned via gossip.  Returns true if this newly fixes
    /// consensus for this learner.
    pub fn handle_query_response(&mut self, value: Option<Vec<u8>>) -> bool {
        if self.consensus.is_none() {
            if let Some(value) = value {
                self.consensus = Some(value);
                return true;
            }
        }
        false
    }
}

/// The proposer drives a value towards consensus: it runs a prepare/promise round to learn of
/// any value already partially accepted, then an accept/accepted round to fix a value. A `Nack`
/// at either stage restarts the proposer at a higher proposal number.
pub enum ProposerPhase {
    Idle,
    Preparing {
        id: u64,
        value: Vec<u8>,
        quorum: QuorumAccumulator<Option<Decree>>,
    },
    Accepting {
        id: u64,
        value: Vec<u8>,
        quorum: QuorumAccumulator<()>,
    },
}

pub struct Proposer {
    generator: Box<dyn ProposalGenerator>,
    floor: u64,
    phase: ProposerPhase,
}

impl Proposer {
    pub fn new(generator: Box<dyn ProposalGenerator>) -> Self {
        Self {
            generator,
            floor: 0,
            phase: ProposerPhase::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ProposerPhase::Idle)
    }

    /// Starts (or restarts) a prepare round for `value`, returning the `Prepare` to broadcast.
    pub fn propose(&mut self, quorum_size: usize, value: Vec<u8>) -> Message {
        let id = self.generator.next(self.floor);
        self.phase = ProposerPhase::Preparing {
            id,
            value,
            quorum: QuorumAccumulator::new(quorum_size),
        };
        Message::Prepare { id }
    }

    /// Handles a `Promise{id, prev}`.  Returns `Some(Accept)` to broadcast the instant a quorum
    /// of promises has been gathered. `quorum_size` must be the same size the matching
    /// `propose` call used; it seeds the accept-phase accumulator.
    pub fn handle_promise(
        &mut self,
        from: NodeID,
        id: u64,
        prev: Option<Decree>,
        quorum_size: usize,
    ) -> Option<Message> {
        let ProposerPhase::Preparing {
            id: current_id,
            value,
            quorum,
        } = &mut self.phase
        else {
            return None;
        };
        if *current_id != id {
            return None;
        }
        let reached = quorum.record(from, prev);
        if !reached {
            return None;
        }
        // Paxos safety: if any acceptor already accepted a value under a lower proposal, the
        // proposer must adopt the highest-numbered one instead of its own, so a value already
        // partially accepted can never be overwritten by a disjoint value.
        let adopted = quorum
            .responses()
            .filter_map(|(_, prev)| prev.clone())
            .max_by_key(|decree| decree.id)
            .map(|decree| decree.value)
            .unwrap_or_else(|| value.clone());
        let accept_id = *current_id;
        self.phase = ProposerPhase::Accepting {
            id: accept_id,
            value: adopted.clone(),
            quorum: QuorumAccumulator::new(quorum_size),
        };
        Some(Message::Accept {
            id: accept_id,
            value: adopted,
        })
    }

    /// Handles an `Accepted{id, value}` addressed back to this proposer (as opposed to the
    /// broadcast copy every learner also receives). Returns true the instant a quorum of accepts
    /// has been gathered, at which point the proposer returns to idle: the learner role is the
    /// one that remembers the fixed value from here on.
    pub fn handle_accepted(&mut self, from: NodeID, id: u64) -> bool {
        let ProposerPhase::Accepting {
            id: current_id,
            quorum,
            ..
        } = &mut self.phase
        else {
            return false;
        };
        if *current_id != id {
            return false;
        }
        let reached = quorum.record(from, ());
        if reached {
            self.phase = ProposerPhase::Idle;
        }
        reached
    }

    /// Handles a `Nack{id}`.  `id` is the acceptor's current promise watermark, which becomes
    /// the new floor: the next `propose` call is guaranteed to pick a higher number. Returns the
    /// in-flight value so the caller can immediately retry, if this proposer had one in flight.
    pub fn handle_nack(&mut self, id: u64) -> Option<Vec<u8>> {
        self.floor = self.floor.max(id);
        match std::mem::replace(&mut self.phase, ProposerPhase::Idle) {
            ProposerPhase::Idle => None,
            ProposerPhase::Preparing { value, .. } => Some(value),
            ProposerPhase::Accepting { value, .. } => Some(value),
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Incremental;

    #[test]
    fn acceptor_promises_increasing_ids() {
        let mut acceptor = Acceptor::new();
        assert!(matches!(
            acceptor.handle_prepare(5),
            Message::Promise { id: 5, prev: None }
        ));
        assert!(matches!(
            acceptor.handle_prepare(3),
            Message::Nack { id: 5 }
        ));
    }

    #[test]
    fn acceptor_accepts_at_or_above_promise() {
        let mut acceptor = Acceptor::new();
        acceptor.handle_prepare(5);
        let reply = acceptor.handle_accept(5, b"v".to_vec());
        assert!(matches!(reply, Message::Accepted { id: 5, .. }));
        assert_eq!(Some(5), acceptor.accepted().map(|d| d.id));
    }

    #[test]
    fn acceptor_rejects_accept_below_promise() {
        let mut acceptor = Acceptor::new();
        acceptor.handle_prepare(5);
        let reply = acceptor.handle_accept(3, b"v".to_vec());
        assert!(matches!(reply, Message::Nack { id: 5 }));
    }

    #[test]
    fn learner_reaches_consensus_on_quorum() {
        let mut learner = Learner::new();
        assert!(!learner.handle_accepted(NodeID::new(0), 1, b"v".to_vec(), 2));
        assert!(learner.handle_accepted(NodeID::new(1), 1, b"v".to_vec(), 2));
        assert_eq!(Some(&b"v".to_vec()), learner.consensus());
    }

    #[test]
    fn learner_ignores_late_accepted_after_consensus() {
        let mut learner = Learner::with_consensus(b"fixed".to_vec());
        assert!(!learner.handle_accepted(NodeID::new(0), 99, b"other".to_vec(), 2));
        assert_eq!(Some(&b"fixed".to_vec()), learner.consensus());
    }

    #[test]
    fn learner_resets_quorum_when_a_higher_id_appears() {
        let mut learner = Learner::new();
        assert!(!learner.handle_accepted(NodeID::new(0), 1, b"v1".to_vec(), 2));
        assert!(!learner.handle_accepted(NodeID::new(0), 2, b"v2".to_vec(), 2));
        assert!(learner.handle_accepted(NodeID::new(1), 2, b"v2".to_vec(), 2));
        assert_eq!(Some(&b"v2".to_vec()), learner.consensus());
    }

    #[test]
    fn proposer_adopts_highest_previously_accepted_value() {
        let mut proposer = Proposer::new(Box::new(Incremental::new(NodeID::new(0))));
        let Message::Prepare { id } = proposer.propose(2, b"mine".to_vec()) else {
            panic!("expected Prepare");
        };
        assert!(proposer
            .handle_promise(NodeID::new(0), id, Some(Decree::new(1, b"theirs".to_vec())), 2)
            .is_none());
        let accept = proposer
            .handle_promise(NodeID::new(1), id, None, 2)
            .expect("quorum reached");
        assert!(matches!(accept, Message::Accept { value, .. } if value == b"theirs"));
    }

    #[test]
    fn proposer_nack_advances_floor_and_yields_in_flight_value() {
        let mut proposer = Proposer::new(Box::new(Incremental::new(NodeID::new(0))));
        proposer.propose(2, b"v".to_vec());
        let retry = proposer.handle_nack(1000);
        assert_eq!(Some(b"v".to_vec()), retry);
        assert!(proposer.is_idle());
    }
}
