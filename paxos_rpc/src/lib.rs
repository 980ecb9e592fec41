//! The worker control surface: a typed RPC contract (`WorkerControlService`) over a plain,
//! blocking TCP transport, standing in for the teacher's TLS-mandating `busyrpc` where this
//! system needs only a handful of trusted callers (the supervisor, `paxos-repl`, peers electing a
//! leader) rather than an internet-facing service mesh.
//!
//! `messages` carries the request/response pairs and the one error type every RPC shares;
//! `service` generates the trait/client/server triad from them via [rpc_pb::service!];
//! `transport` frames and ships them over a `TcpStream`.

pub mod messages;
pub mod service;
pub mod transport;

pub use messages::{
    DepositRequest, DepositResponse, ElectLeaderRequest, ElectLeaderResponse, GetAccountRequest,
    GetAccountResponse, HealthCheckRequest, HealthCheckResponse, KillWorkerRequest,
    KillWorkerResponse, ListWorkersRequest, ListWorkersResponse, OpenAccountRequest,
    OpenAccountResponse, RespawnWorkerRequest, RespawnWorkerResponse, SupervisorError,
    TransferRequest, TransferResponse, WithdrawRequest, WithdrawResponse, WorkerError, WorkerStatus,
};
pub use service::{
    SupervisorControlClient, SupervisorControlServer, SupervisorControlService,
    WorkerControlClient, WorkerControlServer, WorkerControlService,
};
pub use transport::{TcpClient, TcpServer};

pub static COLLECTOR: indicio::Collector = indicio::Collector::new();

pub fn register_biometrics(collector: &biometrics::Collector) {
    transport::register_biometrics(collector);
}

pub fn register_monitors(_hey_listen: &mut tatl::HeyListen) {}
