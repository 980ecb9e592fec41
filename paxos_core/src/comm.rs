//! The seam between role behaviors and a concrete transport.

use paxos_pb::{Message, NodeID};

/// Delivers [Message]s to peers and reports the addressable cluster membership.  A concrete
/// implementation (see `paxos_udp`) turns `send` into a network write; tests substitute an
/// in-process fake that records or drops payloads so quorum math can be exercised without
/// sockets.
pub trait Communicator: Send + Sync {
    /// This node's own index into the cluster.
    fn this_node(&self) -> NodeID;

    /// Every node in the cluster, including `this_node()`, in the same order used to derive
    /// [NodeID] indices.
    fn nodes(&self) -> Vec<NodeID>;

    /// The number of nodes that constitute a majority of the cluster.
    fn quorum_size(&self) -> usize {
        self.nodes().len() / 2 + 1
    }

    /// Best-effort delivery of `message` under `key` to `dest`.  Implementations absorb
    /// transport errors; the protocol is built to make progress when some deliveries are lost,
    /// so callers never receive a synchronous failure here.
    fn send(&self, dest: NodeID, key: &[u8], message: Message);

    /// Best-effort delivery of `message` under `key` to every node, including `this_node()`.
    fn broadcast(&self, key: &[u8], message: Message) {
        for node in self.nodes() {
            self.send(node, key, message.clone());
        }
    }
}

/// In-process [Communicator] fakes shared by this crate's tests and by downstream crates (e.g.
/// `paxos_rsm`) that need to drive a [crate::dictionary::Dictionary] without a real socket. Not
/// `cfg(test)`-gated: a dependent crate's test build compiles this crate outside of its own test
/// profile, so the module has to exist in ordinary builds to be reachable from there.
pub mod tests_support {
    use std::sync::{Mutex, Weak};

    use super::*;

    /// Records every send instead of transmitting it; never delivers anything back. Useful for
    /// exercising quorum math in isolation, and for tests that want to prove a call times out
    /// rather than hangs forever (a dictionary with no path to consensus has to give up
    /// eventually).
    pub struct FakeCommunicator {
        this_node: NodeID,
        nodes: Vec<NodeID>,
        pub sent: Mutex<Vec<(NodeID, Vec<u8>, Message)>>,
    }

    impl FakeCommunicator {
        pub fn new(this_node: NodeID, nodes: Vec<NodeID>) -> Self {
            Self {
                this_node,
                nodes,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl Communicator for FakeCommunicator {
        fn this_node(&self) -> NodeID {
            self.this_node
        }

        fn nodes(&self) -> Vec<NodeID> {
            self.nodes.clone()
        }

        fn send(&self, dest: NodeID, key: &[u8], message: Message) {
            self.sent.lock().unwrap().push((dest, key.to_vec(), message));
        }
    }

    /// A single-node [Communicator] that loops a send for `this_node()` back into the
    /// [crate::dictionary::Dictionary] it's wired to, synchronously, instead of going over a
    /// socket. Construction is two steps because the dictionary holds an `Arc` of its
    /// communicator and so can't exist before the communicator does: build the `LoopbackCommunicator`,
    /// wrap it in an `Arc`, build the `Dictionary` from that `Arc`, then call [Self::wire] with the
    /// dictionary so later sends have somewhere to land. Only meaningful for a cluster of one;
    /// nothing here attempts to model message loss or multi-node delivery.
    pub struct LoopbackCommunicator {
        this_node: NodeID,
        dictionary: Mutex<Weak<crate::dictionary::Dictionary<LoopbackCommunicator>>>,
    }

    impl LoopbackCommunicator {
        pub fn new(this_node: NodeID) -> Self {
            Self {
                this_node,
                dictionary: Mutex::new(Weak::new()),
            }
        }

        /// Late-binds the dictionary this communicator delivers into. Must be called before any
        /// `send` whose outcome matters; a send before wiring is silently dropped, same as a send
        /// to a peer that never answers.
        pub fn wire(&self, dictionary: &std::sync::Arc<crate::dictionary::Dictionary<LoopbackCommunicator>>) {
            *self.dictionary.lock().unwrap() = std::sync::Arc::downgrade(dictionary);
        }
    }

    impl Communicator for LoopbackCommunicator {
        fn this_node(&self) -> NodeID {
            self.this_node
        }

        fn nodes(&self) -> Vec<NodeID> {
            vec![self.this_node]
        }

        fn send(&self, dest: NodeID, key: &[u8], message: Message) {
            if dest != self.this_node {
                return;
            }
            let Some(dictionary) = self.dictionary.lock().unwrap().upgrade() else {
                return;
            };
            dictionary.deliver(self.this_node, key, message);
        }
    }
}
