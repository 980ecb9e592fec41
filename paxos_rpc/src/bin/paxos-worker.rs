//! One replica of the ledger: a [paxos_udp::UdpCommunicator] for Paxos traffic, a
//! [paxos_core::dictionary::Dictionary] durable to a local snapshot file, a
//! [paxos_rsm::ReplicatedStateMachine] driving a [ledger::LedgerStateMachine], and a
//! [paxos_rpc::TcpServer] exposing all of it as a [paxos_rpc::WorkerControlService].

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arrrg::CommandLine;

use biometrics::{Collector as BiometricsCollector, PlainTextEmitter};

use buffertk::{stack_pack, Unpackable};

use indicio::{clue, stdio::StdioEmitter, ALWAYS, INFO};

use paxos_core::comm::Communicator;
use paxos_core::dictionary::{Dictionary, GeneratorKind};
use paxos_core::snapshot::{FileStorage, Storage};
use paxos_pb::NodeID;
use paxos_rpc::{
    DepositRequest, DepositResponse, ElectLeaderRequest, ElectLeaderResponse, GetAccountRequest,
    GetAccountResponse, HealthCheckRequest, HealthCheckResponse, OpenAccountRequest,
    OpenAccountResponse, TcpServer, TransferRequest, TransferResponse, WithdrawRequest,
    WithdrawResponse, WorkerControlServer, WorkerControlService, WorkerError,
};
use paxos_rsm::ReplicatedStateMachine;
use paxos_udp::UdpCommunicator;
use rpc_pb::{Context, ServerRegistry};

use ledger::{Command, LedgerStateMachine, Output, Outcome};

#[derive(Debug, Default, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Options {
    #[arrrg(required, "This node's index into --cluster.", "INDEX")]
    node_id: u32,
    #[arrrg(
        required,
        "Comma-separated host:port addresses for the full cluster, ordered by node index.",
        "HOST:PORT,..."
    )]
    cluster: String,
    #[arrrg(required, "Path to this node's ledger snapshot file.", "PATH")]
    ledger_file: String,
    #[arrrg(required, "Address to bind the worker control RPC surface to.", "HOST:PORT")]
    bind_control: String,
    #[arrrg(
        optional,
        "Proposal-number generator to use: incremental or time_aware.",
        "GENERATOR"
    )]
    generator: String,
}

fn parse_cluster(cluster: &str) -> Vec<SocketAddr> {
    cluster
        .split(',')
        .map(|s| s.trim().parse().expect("--cluster must be a comma-separated list of host:port"))
        .collect()
}

/// Implements [WorkerControlService] over a single node's [ReplicatedStateMachine] and the
/// dictionary that underlies it; `elect_leader` bypasses the ledger's command log and proposes
/// directly into the dictionary, since an election outcome is not itself a ledger command.
struct Worker {
    this_node: NodeID,
    dictionary: Arc<Dictionary<UdpCommunicator>>,
    rsm: ReplicatedStateMachine<UdpCommunicator, LedgerStateMachine>,
}

fn run_command(
    worker: &Worker,
    command: Command,
) -> Result<Output, WorkerError> {
    let bytes = worker.rsm.execute(stack_pack(&command).to_vec())?;
    let (outcome, _rem) = Outcome::unpack(&bytes)?;
    Ok(Result::<Output, ledger::LedgerError>::from(outcome)?)
}

impl WorkerControlService for Worker {
    fn health_check(
        &self,
        _ctx: &Context,
        _req: HealthCheckRequest,
    ) -> Result<HealthCheckResponse, WorkerError> {
        Ok(HealthCheckResponse {})
    }

    fn elect_leader(
        &self,
        _ctx: &Context,
        req: ElectLeaderRequest,
    ) -> Result<ElectLeaderResponse, WorkerError> {
        let key = stack_pack(&req.election_id).to_vec();
        let candidate_bytes = stack_pack(&req.candidate).to_vec();
        self.dictionary.set(key.clone(), candidate_bytes)?;
        let decided = self.dictionary.get(&key).ok_or_else(|| WorkerError::ElectionFailed {
            core: Default::default(),
            what: "no quorum answered for the election key".to_string(),
        })?;
        let (leader, _rem) = <NodeID as Unpackable>::unpack(&decided)?;
        Ok(ElectLeaderResponse { leader })
    }

    fn open_account(
        &self,
        _ctx: &Context,
        _req: OpenAccountRequest,
    ) -> Result<OpenAccountResponse, WorkerError> {
        match run_command(self, Command::OpenAccount {})? {
            Output::Opened { uid } => Ok(OpenAccountResponse { uid }),
            other => unreachable!("open_account produced {other:?}"),
        }
    }

    fn deposit(&self, _ctx: &Context, req: DepositRequest) -> Result<DepositResponse, WorkerError> {
        match run_command(self, Command::Deposit { uid: req.uid, amount: req.amount })? {
            Output::Balance { balance } => Ok(DepositResponse { balance }),
            other => unreachable!("deposit produced {other:?}"),
        }
    }

    fn withdraw(&self, _ctx: &Context, req: WithdrawRequest) -> Result<WithdrawResponse, WorkerError> {
        match run_command(self, Command::Withdraw { uid: req.uid, amount: req.amount })? {
            Output::Balance { balance } => Ok(WithdrawResponse { balance }),
            other => unreachable!("withdraw produced {other:?}"),
        }
    }

    fn transfer(&self, _ctx: &Context, req: TransferRequest) -> Result<TransferResponse, WorkerError> {
        run_command(
            self,
            Command::Transfer { from: req.from, to: req.to, amount: req.amount },
        )?;
        Ok(TransferResponse {})
    }

    fn get_account(
        &self,
        _ctx: &Context,
        req: GetAccountRequest,
    ) -> Result<GetAccountResponse, WorkerError> {
        self.rsm.sync();
        let balance = self.rsm.state_machine().balance(req.uid)?;
        Ok(GetAccountResponse { balance })
    }
}

fn main() {
    minimal_signals::block();
    let (options, free) = Options::from_command_line("Usage: paxos-worker --node-id N --cluster ... --ledger-file PATH --bind-control HOST:PORT");
    if !free.is_empty() {
        eprintln!("paxos-worker takes no positional arguments");
        std::process::exit(1);
    }

    let emitter = Arc::new(StdioEmitter);
    paxos_rpc::COLLECTOR.register(emitter);
    paxos_rpc::COLLECTOR.set_verbosity(INFO);
    clue!(paxos_rpc::COLLECTOR, ALWAYS, {
        new_process: std::env::args().collect::<Vec<_>>(),
    });

    std::thread::spawn(|| {
        let mut collector = BiometricsCollector::new();
        paxos_core::register_biometrics(&collector);
        paxos_rsm::register_biometrics(&collector);
        paxos_udp::register_biometrics(&collector);
        ledger::register_biometrics(&collector);
        paxos_rpc::register_biometrics(&collector);
        let fout = std::fs::File::create("/dev/stdout").expect("open /dev/stdout");
        let mut emit = PlainTextEmitter::new(fout);
        loop {
            if let Err(err) = collector.emit(&mut emit) {
                eprintln!("biometrics collector error: {err}");
            }
            std::thread::sleep(std::time::Duration::from_millis(997));
        }
    });

    let addrs = parse_cluster(&options.cluster);
    let this_node = NodeID::new(options.node_id);
    let generator_kind = match options.generator.as_str() {
        "" | "incremental" => GeneratorKind::Incremental,
        "time_aware" => GeneratorKind::TimeAware,
        other => {
            eprintln!("unknown --generator: {other} (expected incremental or time_aware)");
            std::process::exit(64);
        }
    };

    let comm = UdpCommunicator::bind(this_node, addrs).expect("bind paxos udp socket");
    let recv_socket = comm.recv_socket().expect("clone paxos udp socket");

    let shutdown = Arc::new(AtomicBool::new(false));
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(options.ledger_file.clone()));
    let dictionary = Arc::new(Dictionary::with_storage(
        Arc::new(comm),
        generator_kind,
        Arc::clone(&shutdown),
        Arc::clone(&storage),
    ));
    paxos_core::snapshot::restore(&dictionary, storage.as_ref()).expect("restore ledger snapshot");

    let _recv_loop = paxos_udp::RecvLoop::spawn(recv_socket, Arc::clone(&dictionary), Arc::clone(&shutdown))
        .expect("spawn paxos recv loop");

    let rsm = ReplicatedStateMachine::new(Arc::clone(&dictionary), "ledger", LedgerStateMachine::new());
    rsm.sync();
    let worker = Worker { this_node, dictionary: Arc::clone(&dictionary), rsm };

    let bind_control: SocketAddr = options.bind_control.parse().expect("--bind-control must be host:port");
    let mut registry = ServerRegistry::new();
    registry.register("WorkerControlService", WorkerControlServer::bind(worker));
    let server = TcpServer::bind(bind_control, registry, Arc::clone(&shutdown)).expect("bind control rpc");
    let bound_at = server.local_addr().expect("local_addr");
    clue!(paxos_rpc::COLLECTOR, ALWAYS, { node: this_node.index(), control_bound_to: bound_at.to_string() });

    let shutdown_for_signals = Arc::clone(&shutdown);
    let signal_thread = std::thread::spawn(move || {
        let signal_set = minimal_signals::SignalSet::new().fill();
        minimal_signals::wait(signal_set);
        shutdown_for_signals.store(true, Ordering::Relaxed);
    });

    server.serve();
    let _ = signal_thread.join();

    clue!(paxos_rpc::COLLECTOR, ALWAYS, { goodbye: std::env::args().collect::<Vec<_>>() });
}
