//! Owns everything about a paxos cluster that isn't a replica itself: spawning and restarting
//! worker processes, injecting chaos by killing them, probing for a live leader and forcing a new
//! election when one goes missing, and keeping a front-end gateway pointed at whoever is leading.
//!
//! [worker] is the process-lifecycle primitive every other module here is built on.  [killer]
//! drives that lifecycle either at random ([killer::RandomKiller]) or on operator command
//! ([killer::InteractiveKiller]).  [prober] watches for a dead leader and re-runs the election.
//! [gateway] reacts to a new leader by rewriting a front-end's config and telling it to reload.

pub mod gateway;
pub mod killer;
pub mod prober;
pub mod worker;

use zerror_core::ErrorCore;

pub use worker::WorkerProcess;

pub static COLLECTOR: indicio::Collector = indicio::Collector::new();

pub fn register_biometrics(collector: &biometrics::Collector) {
    worker::register_biometrics(collector);
    killer::register_biometrics(collector);
    prober::register_biometrics(collector);
    gateway::register_biometrics(collector);
}

pub fn register_monitors(hey_listen: &mut tatl::HeyListen) {
    prober::register_monitors(hey_listen);
}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// Errors native to this crate: spawning a worker, signaling it, rendering a gateway template, or
/// reaching a worker over RPC all fail in ways that aren't a ledger or paxos error. RPC failures
/// reaching a worker are wrapped here rather than propagated as [paxos_rpc::WorkerError] because
/// the supervisor is a caller of that surface, not an implementor of it.
#[derive(zerror_derive::Z)]
pub enum Error {
    Success {
        core: ErrorCore,
    },
    Io {
        core: ErrorCore,
        what: String,
    },
    UnknownNode {
        core: ErrorCore,
        node_id: u32,
    },
    Rpc {
        core: ErrorCore,
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

zerror::iotoz! {Error}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            core: ErrorCore::default(),
            what: err.to_string(),
        }
    }
}

impl From<shvar::Error> for Error {
    fn from(err: shvar::Error) -> Self {
        Self::Io {
            core: ErrorCore::default(),
            what: format!("{err:?}"),
        }
    }
}

impl From<rpc_pb::Error> for Error {
    fn from(err: rpc_pb::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: err.to_string(),
        }
    }
}
