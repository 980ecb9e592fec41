//! Launches a full paxos cluster as a set of `paxos-worker` child processes, then drives their
//! lifecycle: a chaos killer (random or operator-interactive), a prober that re-elects a leader
//! whenever the believed leader stops answering, and a gateway sink kept pointed at whoever wins.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arrrg::CommandLine;

use biometrics::{Collector as BiometricsCollector, PlainTextEmitter};

use indicio::{clue, stdio::StdioEmitter, ALWAYS, INFO};

use paxos_rpc::{SupervisorControlServer, TcpServer};

use paxos_supervisor::gateway::{FileGatewaySink, GatewaySink};
use paxos_supervisor::killer::{InteractiveKiller, RandomKiller, RandomKillerConfig};
use paxos_supervisor::prober::Prober;
use paxos_supervisor::worker::WorkerProcess;

use rpc_pb::ServerRegistry;

/// Rendered when no `--gateway-template` is given: an nginx-style reverse proxy config, listening
/// on `${GATEWAY_PORT}` and forwarding everything to whoever last won an election.
const DEFAULT_GATEWAY_TEMPLATE: &str = concat!(
    "upstream paxos_leader {\n",
    "    server ${LEADER_ADDR};\n",
    "}\n",
    "server {\n",
    "    listen ${GATEWAY_PORT};\n",
    "    location / {\n",
    "        proxy_pass http://paxos_leader;\n",
    "    }\n",
    "}\n",
);

#[derive(Debug, Default, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Options {
    #[arrrg(required, "Number of worker processes to launch.", "N")]
    num_workers: u32,
    #[arrrg(
        required,
        "Path prefix for each worker's ledger snapshot file; node i uses PREFIX.i.",
        "PREFIX"
    )]
    ledger_file: String,
    #[arrrg(optional, "Path to the paxos-worker binary.", "PATH")]
    worker_binary: String,
    #[arrrg(optional, "Base port for workers' paxos UDP traffic; node i binds BASE+i.", "PORT")]
    udp_base_port: u32,
    #[arrrg(optional, "Base port for workers' control RPC surface; node i binds BASE+i.", "PORT")]
    control_base_port: u32,
    #[arrrg(
        optional,
        "Proposal-number generator every worker uses: incremental or time_aware.",
        "GENERATOR"
    )]
    generator: String,
    #[arrrg(
        optional,
        "Chaos killer to run: random (free-running) or interactive (driven by SupervisorControlService).",
        "KILLER"
    )]
    killer_type: String,
    #[arrrg(optional, "Mean milliseconds between chaos-killer strikes (random killer only).", "MS")]
    kill_every_mean_ms: u64,
    #[arrrg(optional, "Deviation in milliseconds around --kill-every-mean-ms.", "MS")]
    kill_every_dev_ms: u64,
    #[arrrg(optional, "Mean milliseconds before a killed worker is respawned (random killer only).", "MS")]
    restart_after_mean_ms: Option<u64>,
    #[arrrg(optional, "Deviation in milliseconds around --restart-after-mean-ms.", "MS")]
    restart_after_dev_ms: u64,
    #[arrrg(optional, "Address SupervisorControlService binds to (interactive killer only).", "HOST:PORT")]
    control_bind: String,
    #[arrrg(optional, "Milliseconds between the prober's health checks.", "MS")]
    probe_period_ms: u64,
    #[arrrg(optional, "Port written into the rendered gateway config's listen directive.", "PORT")]
    gateway_port: u32,
    #[arrrg(optional, "Path the rendered gateway config is written to. Omit to disable the gateway sink.", "PATH")]
    gateway_config: String,
    #[arrrg(optional, "Template for the gateway config; ${LEADER_ADDR} and ${GATEWAY_PORT} are expanded.", "PATH")]
    gateway_template: String,
    #[arrrg(optional, "PID to send SIGHUP after rewriting --gateway-config.", "PID")]
    gateway_reload_pid: Option<i32>,
}

struct NullGatewaySink;

impl GatewaySink for NullGatewaySink {
    fn reload(&self, _leader: SocketAddr) -> Result<(), paxos_supervisor::Error> {
        Ok(())
    }
}

fn local_addrs(base_port: u32, num_workers: u32) -> Vec<SocketAddr> {
    (0..num_workers)
        .map(|i| SocketAddr::from(([127, 0, 0, 1], (base_port + i) as u16)))
        .collect()
}

fn run_with_gateway<G: GatewaySink + Send + Sync + 'static>(
    options: &Options,
    workers: Vec<Arc<WorkerProcess>>,
    control_addrs: Vec<SocketAddr>,
    shutdown: Arc<AtomicBool>,
    gateway: G,
) {
    let probe_period = Duration::from_millis(if options.probe_period_ms == 0 { 1_000 } else { options.probe_period_ms });
    let prober = Arc::new(Prober::new(control_addrs, probe_period, gateway, Arc::clone(&shutdown)));
    let _prober_thread = prober.spawn(1);

    match options.killer_type.as_str() {
        "" | "random" => {
            let config = RandomKillerConfig {
                kill_interval_mean: Duration::from_millis(if options.kill_every_mean_ms == 0 {
                    paxos_pb::DEFAULT_KILL_INTERVAL_MS
                } else {
                    options.kill_every_mean_ms
                }),
                kill_interval_dev: Duration::from_millis(options.kill_every_dev_ms),
                restart_after_mean: options.restart_after_mean_ms.map(Duration::from_millis),
                restart_after_dev: Duration::from_millis(options.restart_after_dev_ms),
            };
            let killer = Arc::new(RandomKiller::new(workers.clone(), config, Arc::clone(&shutdown)));
            let _killer_thread = killer.spawn(0);
            while !shutdown.load(Ordering::Relaxed) {
                std::thread::sleep(Duration::from_millis(200));
            }
        }
        "interactive" => {
            let bind: SocketAddr = if options.control_bind.is_empty() {
                "127.0.0.1:9900".parse().unwrap()
            } else {
                options.control_bind.parse().expect("--control-bind must be host:port")
            };
            let killer = InteractiveKiller::new(workers.clone());
            let mut registry = ServerRegistry::new();
            registry.register("SupervisorControlService", SupervisorControlServer::bind(killer));
            let server = TcpServer::bind(bind, registry, Arc::clone(&shutdown)).expect("bind supervisor control rpc");
            let bound_at = server.local_addr().expect("local_addr");
            clue!(paxos_supervisor::COLLECTOR, ALWAYS, { supervisor_control_bound_to: bound_at.to_string() });
            server.serve();
        }
        other => {
            eprintln!("unknown --killer-type: {other} (expected random or interactive)");
            std::process::exit(64);
        }
    }

    for worker in &workers {
        let _ = worker.kill();
    }
}

fn main() {
    minimal_signals::block();
    let (options, free) = Options::from_command_line(
        "Usage: paxos-supervisor --num-workers N --ledger-file PREFIX [options]",
    );
    if !free.is_empty() {
        eprintln!("paxos-supervisor takes no positional arguments");
        std::process::exit(1);
    }
    if options.num_workers == 0 {
        eprintln!("--num-workers must be at least 1");
        std::process::exit(64);
    }

    let emitter = Arc::new(StdioEmitter);
    paxos_supervisor::COLLECTOR.register(emitter);
    paxos_supervisor::COLLECTOR.set_verbosity(INFO);
    clue!(paxos_supervisor::COLLECTOR, ALWAYS, {
        new_process: std::env::args().collect::<Vec<_>>(),
    });

    std::thread::spawn(|| {
        let mut collector = BiometricsCollector::new();
        paxos_supervisor::register_biometrics(&collector);
        let fout = std::fs::File::create("/dev/stdout").expect("open /dev/stdout");
        let mut emit = PlainTextEmitter::new(fout);
        loop {
            if let Err(err) = collector.emit(&mut emit) {
                eprintln!("biometrics collector error: {err}");
            }
            std::thread::sleep(Duration::from_millis(997));
        }
    });
    let mut hey_listen = tatl::HeyListen::new();
    paxos_supervisor::register_monitors(&mut hey_listen);

    let worker_binary = if options.worker_binary.is_empty() {
        "paxos-worker".to_string()
    } else {
        options.worker_binary.clone()
    };
    let udp_base_port = if options.udp_base_port == 0 { 20_000 } else { options.udp_base_port };
    let control_base_port = if options.control_base_port == 0 { 21_000 } else { options.control_base_port };
    let udp_addrs = local_addrs(udp_base_port, options.num_workers);
    let control_addrs = local_addrs(control_base_port, options.num_workers);
    let cluster_arg = udp_addrs.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(",");

    let shutdown = Arc::new(AtomicBool::new(false));
    let mut workers = Vec::new();
    for node_id in 0..options.num_workers {
        let args = vec![
            "--node-id".to_string(),
            node_id.to_string(),
            "--cluster".to_string(),
            cluster_arg.clone(),
            "--ledger-file".to_string(),
            format!("{}.{}", options.ledger_file, node_id),
            "--bind-control".to_string(),
            control_addrs[node_id as usize].to_string(),
            "--generator".to_string(),
            options.generator.clone(),
        ];
        let worker = Arc::new(WorkerProcess::new(node_id, worker_binary.clone(), args));
        worker.spawn().expect("spawn paxos-worker");
        workers.push(worker);
    }

    let shutdown_for_signals = Arc::clone(&shutdown);
    let signal_thread = std::thread::spawn(move || {
        let signal_set = minimal_signals::SignalSet::new().fill();
        minimal_signals::wait(signal_set);
        shutdown_for_signals.store(true, Ordering::Relaxed);
    });

    if options.gateway_config.is_empty() {
        run_with_gateway(&options, workers, control_addrs, Arc::clone(&shutdown), NullGatewaySink);
    } else {
        let template = if options.gateway_template.is_empty() {
            DEFAULT_GATEWAY_TEMPLATE.to_string()
        } else {
            std::fs::read_to_string(&options.gateway_template).expect("read --gateway-template")
        };
        let fixed_vars = std::collections::HashMap::from([(
            "GATEWAY_PORT".to_string(),
            options.gateway_port.to_string(),
        )]);
        let gateway = FileGatewaySink::new(
            template,
            options.gateway_config.clone(),
            options.gateway_reload_pid,
            fixed_vars,
        );
        run_with_gateway(&options, workers, control_addrs, Arc::clone(&shutdown), gateway);
    }

    shutdown.store(true, Ordering::Relaxed);
    let _ = signal_thread.join();
    clue!(paxos_supervisor::COLLECTOR, ALWAYS, { goodbye: std::env::args().collect::<Vec<_>>() });
}
