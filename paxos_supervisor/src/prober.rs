//! Watches for a dead leader and forces a new election when one turns up missing.
//!
//! Grounded on the original deployment's `prober.py`: pick a random worker, health-check it; if
//! the worker believed to be leading fails a health check, run an election round by asking every
//! worker to `elect_leader`, in order, until one answers. The first worker to answer becomes the
//! new believed leader, and the gateway is told to point at it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use biometrics::{Counter, Gauge};

use guacamole::combinators::uniform;
use guacamole::Guacamole;

use indicio::clue;

use paxos_pb::{ElectionID, NodeID};

use paxos_rpc::{ElectLeaderRequest, HealthCheckRequest, TcpClient, WorkerControlClient, WorkerControlService};

use rpc_pb::Context;

use tatl::{HeyListen, Stationary};

use crate::gateway::GatewaySink;
use crate::COLLECTOR;

static PROBES_SENT: Counter = Counter::new("paxos_supervisor.prober.probes_sent");
static PROBES_FAILED: Counter = Counter::new("paxos_supervisor.prober.probes_failed");
static ELECTIONS_TRIGGERED: Counter = Counter::new("paxos_supervisor.prober.elections_triggered");
static ELECTIONS_FAILED: Counter = Counter::new("paxos_supervisor.prober.elections_failed");
static BELIEVED_LEADER: Gauge = Gauge::new("paxos_supervisor.prober.believed_leader");
static ELECTION_REPEATED_SAME_LEADER: Counter = Counter::new("paxos_supervisor.prober.election_repeated_same_leader");
static ELECTION_REPEATED_SAME_LEADER_MONITOR: Stationary = Stationary::new(
    "paxos_supervisor.prober.election_repeated_same_leader",
    &ELECTION_REPEATED_SAME_LEADER,
);

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&PROBES_SENT);
    collector.register_counter(&PROBES_FAILED);
    collector.register_counter(&ELECTIONS_TRIGGERED);
    collector.register_counter(&ELECTIONS_FAILED);
    collector.register_counter(&ELECTION_REPEATED_SAME_LEADER);
    collector.register_gauge(&BELIEVED_LEADER);
}

pub fn register_monitors(hey_listen: &mut HeyListen) {
    hey_listen.register_stationary(&ELECTION_REPEATED_SAME_LEADER_MONITOR);
}

const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

fn interruptible_sleep(total: Duration, shutdown: &AtomicBool) {
    let deadline = std::time::Instant::now() + total;
    while !shutdown.load(Ordering::Relaxed) {
        let now = std::time::Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(std::cmp::min(SHUTDOWN_POLL, deadline - now));
    }
}

fn call_health_check(addr: SocketAddr) -> bool {
    let Ok(stream) = TcpClient::connect(addr) else {
        return false;
    };
    let client = WorkerControlClient::new(Arc::new(stream));
    client.health_check(&Context::default(), HealthCheckRequest {}).is_ok()
}

fn call_elect_leader(addr: SocketAddr, election_id: ElectionID, candidate: NodeID) -> Option<NodeID> {
    let stream = TcpClient::connect(addr).ok()?;
    let client = WorkerControlClient::new(Arc::new(stream));
    let req = ElectLeaderRequest { election_id, candidate };
    client.elect_leader(&Context::default(), req).ok().map(|resp| resp.leader)
}

/// Periodically probes a random worker's health, and re-runs leader election whenever the
/// believed leader stops answering. `G` is the gateway sink told about the outcome of each
/// successful election, so a front end stays pointed at whoever is currently leading.
pub struct Prober<G> {
    control_addrs: Vec<SocketAddr>,
    probe_period: Duration,
    believed_leader: Mutex<Option<NodeID>>,
    gateway: G,
    shutdown: Arc<AtomicBool>,
}

impl<G: GatewaySink + Send + Sync + 'static> Prober<G> {
    pub fn new(control_addrs: Vec<SocketAddr>, probe_period: Duration, gateway: G, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            control_addrs,
            probe_period,
            believed_leader: Mutex::new(None),
            gateway,
            shutdown,
        }
    }

    pub fn spawn(self: Arc<Self>, seed: u64) -> JoinHandle<()> {
        std::thread::spawn(move || self.run(seed))
    }

    fn run(&self, seed: u64) {
        let mut guac = Guacamole::new(seed);
        self.elect_leader();
        while !self.shutdown.load(Ordering::Relaxed) {
            self.probe_once(&mut guac);
            interruptible_sleep(self.probe_period, &self.shutdown);
        }
    }

    fn probe_once(&self, guac: &mut Guacamole) {
        if self.control_addrs.is_empty() {
            return;
        }
        let idx = uniform(0u64, self.control_addrs.len() as u64)(guac) as usize;
        let addr = self.control_addrs[idx];
        PROBES_SENT.click();
        let healthy = call_health_check(addr);
        if healthy {
            return;
        }
        PROBES_FAILED.click();
        clue!(COLLECTOR, indicio::WARNING, { health_check_failed: idx, addr: addr.to_string() });
        let believed = *self.believed_leader.lock().unwrap();
        if believed == Some(NodeID::new(idx as u32)) || believed.is_none() {
            self.elect_leader();
        }
    }

    /// Asks every worker in turn to elect a leader for a freshly generated election id, adopting
    /// the first one to answer. Exactly as the original prober does: a round of `elect_leader`
    /// calls, not a majority vote taken by the prober itself, because each worker's own call
    /// already blocks until its Paxos instance for the election key reaches consensus.
    fn elect_leader(&self) -> Option<NodeID> {
        let Some(election_id) = ElectionID::generate() else {
            ELECTIONS_FAILED.click();
            return None;
        };
        ELECTIONS_TRIGGERED.click();
        for (idx, addr) in self.control_addrs.iter().enumerate() {
            let candidate = NodeID::new(idx as u32);
            if let Some(leader) = call_elect_leader(*addr, election_id, candidate) {
                let mut believed = self.believed_leader.lock().unwrap();
                let changed = *believed != Some(leader);
                *believed = Some(leader);
                drop(believed);
                BELIEVED_LEADER.set(leader.index() as f64);
                if changed {
                    clue!(COLLECTOR, indicio::INFO, { new_leader: leader.index() });
                    if let Some(leader_addr) = self.control_addrs.get(leader.index() as usize) {
                        if let Err(err) = self.gateway.reload(*leader_addr) {
                            clue!(COLLECTOR, indicio::ERROR, { gateway_reload_failed: err.to_string() });
                        }
                    }
                } else {
                    ELECTION_REPEATED_SAME_LEADER.click();
                }
                return Some(leader);
            }
        }
        ELECTIONS_FAILED.click();
        clue!(COLLECTOR, indicio::ERROR, { election_failed: "no worker answered elect_leader" });
        None
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct RecordingGateway {
        reloads: AtomicUsize,
    }

    impl GatewaySink for RecordingGateway {
        fn reload(&self, _leader: SocketAddr) -> Result<(), crate::Error> {
            self.reloads.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn probe_with_no_addrs_is_a_no_op() {
        let prober = Prober::new(
            Vec::new(),
            Duration::from_millis(10),
            RecordingGateway { reloads: AtomicUsize::new(0) },
            Arc::new(AtomicBool::new(false)),
        );
        let mut guac = Guacamole::new(0);
        prober.probe_once(&mut guac);
    }

    #[test]
    fn election_with_no_live_workers_fails_cleanly() {
        let prober = Prober::new(
            vec!["127.0.0.1:1".parse().unwrap()],
            Duration::from_millis(10),
            RecordingGateway { reloads: AtomicUsize::new(0) },
            Arc::new(AtomicBool::new(false)),
        );
        assert_eq!(None, prober.elect_leader());
    }
}
