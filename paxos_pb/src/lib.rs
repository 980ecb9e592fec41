#![doc = include_str!("../README.md")]

use prototk_derive::Message;

use one_two_eight::{generate_id, generate_id_prototk};

use zerror_core::ErrorCore;

///////////////////////////////////////////// Constants ////////////////////////////////////////////

/// The default interval, in milliseconds, between chaos-killer strikes.  Not used by the protocol
/// itself; exported so that binaries share one default.
pub const DEFAULT_KILL_INTERVAL_MS: u64 = 30_000;

//////////////////////////////////////////////// IDs ///////////////////////////////////////////////

generate_id!(RunID, "run:");
generate_id_prototk!(RunID);

generate_id!(ElectionID, "election:");
generate_id_prototk!(ElectionID);

/////////////////////////////////////////////// NodeID //////////////////////////////////////////////

/// A [NodeID] is a dense, nonnegative integer.  It is the index of a node's address in the sorted
/// list of addresses that make up the cluster; it is never generated randomly and never reused for
/// a different address within the same cluster configuration.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Message, Ord, PartialEq, PartialOrd)]
pub struct NodeID {
    #[prototk(1, uint32)]
    pub index: u32,
}

impl NodeID {
    /// Construct a [NodeID] from a raw index.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// The index of this node within the sorted address list.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for NodeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node:{}", self.index)
    }
}

impl From<u32> for NodeID {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// Errors shared by every layer of the consensus stack: wire encoding, transport, and the
/// persistence of per-key server state.
#[derive(Clone, Message, zerror_derive::Z)]
pub enum Error {
    #[prototk(663552, message)]
    Success {
        #[prototk(1, message)]
        core: ErrorCore,
    },
    #[prototk(663553, message)]
    SerializationError {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, message)]
        what: prototk::Error,
    },
    #[prototk(663554, message)]
    TransportFailure {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
    #[prototk(663555, message)]
    PersistenceFailure {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
    #[prototk(663556, message)]
    Corruption {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
}

impl Default for Error {
    fn default() -> Self {
        Self::Success {
            core: ErrorCore::default(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(what: std::io::Error) -> Self {
        Self::TransportFailure {
            core: ErrorCore::default(),
            what: what.to_string(),
        }
    }
}

impl From<prototk::Error> for Error {
    fn from(what: prototk::Error) -> Self {
        Self::SerializationError {
            core: ErrorCore::default(),
            what,
        }
    }
}

zerror::iotoz! {Error}

///////////////////////////////////////////// Decree ///////////////////////////////////////////////

/// A [Decree] binds a proposal number to a value.  It is the wire representation of what spec.md
/// calls an `Accepted{id, value}` pair: it shows up both as a standalone message and nested inside
/// a `Promise` (as the acceptor's previously-accepted decree, if any).
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct Decree {
    #[prototk(1, uint64)]
    pub id: u64,
    #[prototk(2, bytes)]
    pub value: Vec<u8>,
}

impl Decree {
    pub fn new(id: u64, value: Vec<u8>) -> Self {
        Self { id, value }
    }
}

////////////////////////////////////////////// Message /////////////////////////////////////////////

/// The eight message variants exchanged between proposer, acceptor, and learner roles, plus the
/// `Request` trigger used only for the in-process application -> proposer edge (never put on the
/// wire, but included here so every role can match over one closed type).
#[derive(Clone, Debug, Eq, Message, PartialEq)]
pub enum Message {
    /// proposer -> acceptors: requests a promise for proposal number `id`.
    #[prototk(1, message)]
    Prepare {
        #[prototk(1, uint64)]
        id: u64,
    },
    /// acceptor -> proposer: promises not to accept anything numbered below `id`.  `prev` carries
    /// the acceptor's previously-accepted decree, if it has one.
    #[prototk(2, message)]
    Promise {
        #[prototk(1, uint64)]
        id: u64,
        #[prototk(2, message)]
        prev: Option<Decree>,
    },
    /// acceptor -> proposer: refuses `id` because a higher number has already been promised.
    #[prototk(3, message)]
    Nack {
        #[prototk(1, uint64)]
        id: u64,
    },
    /// proposer -> acceptors: requests binding of `value` at proposal number `id`.
    #[prototk(4, message)]
    Accept {
        #[prototk(1, uint64)]
        id: u64,
        #[prototk(2, bytes)]
        value: Vec<u8>,
    },
    /// acceptor -> learners: `value` has been bound at proposal number `id` on this acceptor.
    #[prototk(5, message)]
    Accepted {
        #[prototk(1, uint64)]
        id: u64,
        #[prototk(2, bytes)]
        value: Vec<u8>,
    },
    /// learner -> learner: gossip request used for catch-up.
    #[prototk(6, message)]
    Query {},
    /// learner -> learner: gossip response; `value` is `None` if this learner has not yet reached
    /// consensus.
    #[prototk(7, message)]
    QueryResponse {
        #[prototk(1, bytes)]
        value: Option<Vec<u8>>,
    },
    /// learner -> proposer: announces that a quorum of `Accepted` has been observed for `value`.
    #[prototk(8, message)]
    Consensus {
        #[prototk(1, bytes)]
        value: Vec<u8>,
    },
    /// application -> proposer: local-only trigger requesting that `value` be proposed.  Never
    /// serialized onto the wire; included here purely so dispatch code can match one type.
    #[prototk(9, message)]
    Request {
        #[prototk(1, bytes)]
        value: Vec<u8>,
    },
}

impl Default for Message {
    fn default() -> Self {
        Message::Query {}
    }
}

impl Message {
    /// A short, stable name for metrics and log labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Prepare { .. } => "prepare",
            Message::Promise { .. } => "promise",
            Message::Nack { .. } => "nack",
            Message::Accept { .. } => "accept",
            Message::Accepted { .. } => "accepted",
            Message::Query {} => "query",
            Message::QueryResponse { .. } => "query_response",
            Message::Consensus { .. } => "consensus",
            Message::Request { .. } => "request",
        }
    }
}

///////////////////////////////////////////// Payload //////////////////////////////////////////////

/// The envelope that multiplexes every per-key Paxos instance over one physical transport.  `key`
/// is an opaque, length-prefixed blob: the generic [Message] layer never interprets it, but the
/// multi-paxos dictionary uses it verbatim as a map key and the replicated-state-machine layer
/// encodes `(prefix, watermark)` pairs into it.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct Payload {
    #[prototk(1, message)]
    pub sender: NodeID,
    #[prototk(2, bytes)]
    pub key: Vec<u8>,
    #[prototk(3, message)]
    pub message: Message,
}

impl Payload {
    pub fn new(sender: NodeID, key: Vec<u8>, message: Message) -> Self {
        Self {
            sender,
            key,
            message,
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use buffertk::{stack_pack, Unpackable};

    use super::*;

    fn round_trip(m: Message) {
        let buf = stack_pack(&m).to_vec();
        let (got, rem) = Message::unpack(&buf).unwrap();
        assert!(rem.is_empty());
        assert_eq!(m, got);
    }

    #[test]
    fn prepare_round_trips() {
        round_trip(Message::Prepare { id: 7 });
    }

    #[test]
    fn promise_without_prev_round_trips() {
        round_trip(Message::Promise { id: 7, prev: None });
    }

    #[test]
    fn promise_with_prev_round_trips() {
        round_trip(Message::Promise {
            id: 7,
            prev: Some(Decree::new(3, b"hello".to_vec())),
        });
    }

    #[test]
    fn accept_round_trips() {
        round_trip(Message::Accept {
            id: 7,
            value: b"world".to_vec(),
        });
    }

    #[test]
    fn query_response_empty_round_trips() {
        round_trip(Message::QueryResponse { value: None });
    }

    #[test]
    fn payload_round_trips() {
        let p = Payload::new(
            NodeID::new(2),
            b"some-key".to_vec(),
            Message::Nack { id: 42 },
        );
        let buf = stack_pack(&p).to_vec();
        let (got, rem) = Payload::unpack(&buf).unwrap();
        assert!(rem.is_empty());
        assert_eq!(p, got);
    }

    #[test]
    fn node_id_orders_by_index() {
        assert!(NodeID::new(0) < NodeID::new(1));
        assert_eq!(NodeID::new(3), NodeID::from(3u32));
    }

    #[test]
    fn message_kind_labels() {
        assert_eq!("prepare", Message::Prepare { id: 0 }.kind());
        assert_eq!("consensus", Message::Consensus { value: vec![] }.kind());
    }
}
