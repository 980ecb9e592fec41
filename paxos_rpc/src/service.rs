//! The typed service contract: one trait (`WorkerControlService`), one client
//! (`WorkerControlClient`), one server wrapper (`WorkerControlServer<S>`), generated by
//! [rpc_pb::service!].

use crate::messages::{
    DepositRequest, DepositResponse, ElectLeaderRequest, ElectLeaderResponse, GetAccountRequest,
    GetAccountResponse, HealthCheckRequest, HealthCheckResponse, KillWorkerRequest,
    KillWorkerResponse, ListWorkersRequest, ListWorkersResponse, OpenAccountRequest,
    OpenAccountResponse, RespawnWorkerRequest, RespawnWorkerResponse, SupervisorError,
    TransferRequest, TransferResponse, WithdrawRequest, WithdrawResponse, WorkerError,
};

rpc_pb::service! {
    name = WorkerControlService;
    server = WorkerControlServer;
    client = WorkerControlClient;
    error = WorkerError;

    rpc health_check(HealthCheckRequest) -> HealthCheckResponse;
    rpc elect_leader(ElectLeaderRequest) -> ElectLeaderResponse;
    rpc open_account(OpenAccountRequest) -> OpenAccountResponse;
    rpc deposit(DepositRequest) -> DepositResponse;
    rpc withdraw(WithdrawRequest) -> WithdrawResponse;
    rpc transfer(TransferRequest) -> TransferResponse;
    rpc get_account(GetAccountRequest) -> GetAccountResponse;
}

/// The operator-facing surface a supervisor process exposes alongside the chaos killer: explicit
/// kill/respawn directives for a given node, and a snapshot of which nodes are currently alive.
/// Only meaningful when the supervisor was started with an interactive killer (§4.10); a random
/// killer drives worker lifecycle itself and never binds this service.
rpc_pb::service! {
    name = SupervisorControlService;
    server = SupervisorControlServer;
    client = SupervisorControlClient;
    error = SupervisorError;

    rpc kill_worker(KillWorkerRequest) -> KillWorkerResponse;
    rpc respawn_worker(RespawnWorkerRequest) -> RespawnWorkerResponse;
    rpc list_workers(ListWorkersRequest) -> ListWorkersResponse;
}
