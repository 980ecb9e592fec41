//! The typed request/response bodies carried by [crate::WorkerControlService], plus the one error
//! type shared by every RPC on that service.

use ledger::LedgerError;

use prototk_derive::Message;

use zerror_core::ErrorCore;

use paxos_pb::{ElectionID, NodeID};

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// The service-level error channel for [crate::WorkerControlService]. Domain failures from the
/// ledger (unknown account, insufficient funds) are carried verbatim via [WorkerError::Ledger];
/// [WorkerError::ElectionFailed] covers the one other way a worker RPC can fail for a reason the
/// caller should see; [WorkerError::Rpc] wraps whatever the underlying [rpc_pb] machinery
/// couldn't deliver as a typed response of its own.
#[derive(Clone, Message, zerror_derive::Z)]
pub enum WorkerError {
    #[prototk(780032, message)]
    Success {
        #[prototk(1, message)]
        core: ErrorCore,
    },
    #[prototk(780033, message)]
    Ledger {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, message)]
        err: LedgerError,
    },
    #[prototk(780034, message)]
    ElectionFailed {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
    #[prototk(780035, message)]
    Rpc {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
}

impl Default for WorkerError {
    fn default() -> Self {
        Self::Success {
            core: ErrorCore::default(),
        }
    }
}

impl From<LedgerError> for WorkerError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger {
            core: ErrorCore::default(),
            err,
        }
    }
}

impl From<rpc_pb::Error> for WorkerError {
    fn from(err: rpc_pb::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: err.to_string(),
        }
    }
}

impl From<buffertk::Error> for WorkerError {
    fn from(err: buffertk::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: format!("{err:?}"),
        }
    }
}

impl From<paxos_pb::Error> for WorkerError {
    fn from(err: paxos_pb::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: err.to_string(),
        }
    }
}

zerror::iotoz! {WorkerError}

/////////////////////////////////////////////// health_check ///////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct HealthCheckRequest {}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct HealthCheckResponse {}

/////////////////////////////////////////////// elect_leader ///////////////////////////////////////

/// Requests that this node participate in a leader-election round identified by `election_id`,
/// proposing `candidate` (almost always the caller's own [NodeID]) as the leader. The RPC blocks
/// until this node's own Paxos instance for the election's key reaches consensus.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct ElectLeaderRequest {
    #[prototk(1, message)]
    pub election_id: ElectionID,
    #[prototk(2, message)]
    pub candidate: NodeID,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct ElectLeaderResponse {
    #[prototk(1, message)]
    pub leader: NodeID,
}

/////////////////////////////////////////////// open_account ///////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct OpenAccountRequest {}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct OpenAccountResponse {
    #[prototk(1, uint64)]
    pub uid: u64,
}

///////////////////////////////////////////////// deposit //////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct DepositRequest {
    #[prototk(1, uint64)]
    pub uid: u64,
    #[prototk(2, uint64)]
    pub amount: u64,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct DepositResponse {
    #[prototk(1, uint64)]
    pub balance: u64,
}

///////////////////////////////////////////////// withdraw /////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct WithdrawRequest {
    #[prototk(1, uint64)]
    pub uid: u64,
    #[prototk(2, uint64)]
    pub amount: u64,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct WithdrawResponse {
    #[prototk(1, uint64)]
    pub balance: u64,
}

///////////////////////////////////////////////// transfer /////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct TransferRequest {
    #[prototk(1, uint64)]
    pub from: u64,
    #[prototk(2, uint64)]
    pub to: u64,
    #[prototk(3, uint64)]
    pub amount: u64,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct TransferResponse {}

/////////////////////////////////////////////// get_account /////////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct GetAccountRequest {
    #[prototk(1, uint64)]
    pub uid: u64,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct GetAccountResponse {
    #[prototk(1, uint64)]
    pub balance: u64,
}

/////////////////////////////////////////// SupervisorError //////////////////////////////////////

/// The service-level error channel for [crate::SupervisorControlService]: an operator directive
/// against a node the supervisor never spawned, or an `rpc_pb` failure reaching the worker it
/// would otherwise have acted against.
#[derive(Clone, Message, zerror_derive::Z)]
pub enum SupervisorError {
    #[prototk(780040, message)]
    Success {
        #[prototk(1, message)]
        core: ErrorCore,
    },
    #[prototk(780041, message)]
    UnknownNode {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, uint32)]
        node_id: u32,
    },
    #[prototk(780042, message)]
    Rpc {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, string)]
        what: String,
    },
}

impl Default for SupervisorError {
    fn default() -> Self {
        Self::Success {
            core: ErrorCore::default(),
        }
    }
}

impl From<rpc_pb::Error> for SupervisorError {
    fn from(err: rpc_pb::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: err.to_string(),
        }
    }
}

impl From<buffertk::Error> for SupervisorError {
    fn from(err: buffertk::Error) -> Self {
        Self::Rpc {
            core: ErrorCore::default(),
            what: format!("{err:?}"),
        }
    }
}

zerror::iotoz! {SupervisorError}

//////////////////////////////////////////////// kill_worker ///////////////////////////////////////

/// Directs the supervisor to kill the given node's worker process as though the chaos killer had
/// picked it, without waiting for a respawn.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct KillWorkerRequest {
    #[prototk(1, uint32)]
    pub node_id: u32,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct KillWorkerResponse {}

/////////////////////////////////////////////// respawn_worker /////////////////////////////////////

/// Directs the supervisor to respawn the given node's worker process if it is not already alive.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct RespawnWorkerRequest {
    #[prototk(1, uint32)]
    pub node_id: u32,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct RespawnWorkerResponse {}

//////////////////////////////////////////////// list_workers //////////////////////////////////////

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct WorkerStatus {
    #[prototk(1, uint32)]
    pub node_id: u32,
    #[prototk(2, bool)]
    pub alive: bool,
}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct ListWorkersRequest {}

#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct ListWorkersResponse {
    #[prototk(1, message)]
    pub workers: Vec<WorkerStatus>,
}
