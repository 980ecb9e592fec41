//! A line-oriented REPL against a single worker's [paxos_rpc::WorkerControlService]: open, deposit,
//! withdraw, transfer, and inspect an account without writing a client of your own.
//!
//! Grounded on the original deployment's `repl.py`: one line in, one command out, `help` lists what's
//! available, `quit` (or EOF) exits. That REPL shelled out to HTTP; this one dials straight into a
//! worker's control RPC surface over TCP.

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use arrrg::CommandLine;

use paxos_rpc::{
    DepositRequest, GetAccountRequest, OpenAccountRequest, TcpClient, TransferRequest,
    WithdrawRequest, WorkerControlClient, WorkerControlService, WorkerError,
};

use rpc_pb::Context;

#[derive(Debug, Default, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Options {
    #[arrrg(required, "Address of the worker's control RPC surface.", "HOST:PORT")]
    control: String,
    #[arrrg(optional, "Run a single command non-interactively and exit.", "COMMAND")]
    exec: String,
}

const HELP: &str = "\
commands:
  account --create            open a new account, printing its uid
  account --status UID        print an account's balance
  deposit UID AMOUNT          deposit AMOUNT (minor units) into UID
  withdraw UID AMOUNT         withdraw AMOUNT (minor units) from UID
  transfer FROM TO AMOUNT     move AMOUNT (minor units) from FROM to TO
  help                        print this message
  quit                        exit the repl";

fn describe(err: WorkerError) -> String {
    err.to_string()
}

fn run_line(client: &WorkerControlClient, line: &str) -> Result<bool, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let ctx = Context::default();
    match words.as_slice() {
        [] => {}
        ["help"] => println!("{HELP}"),
        ["quit"] | ["exit"] => return Ok(true),
        ["account", "--create"] => {
            let resp = client
                .open_account(&ctx, OpenAccountRequest {})
                .map_err(describe)?;
            println!("created account #{}", resp.uid);
        }
        ["account", "--status", uid] => {
            let uid: u64 = uid.parse().map_err(|_| format!("not a uid: {uid}"))?;
            let resp = client
                .get_account(&ctx, GetAccountRequest { uid })
                .map_err(describe)?;
            println!("account #{uid}: {}", resp.balance);
        }
        ["deposit", uid, amount] => {
            let uid: u64 = uid.parse().map_err(|_| format!("not a uid: {uid}"))?;
            let amount: u64 = amount.parse().map_err(|_| format!("not an amount: {amount}"))?;
            let resp = client
                .deposit(&ctx, DepositRequest { uid, amount })
                .map_err(describe)?;
            println!("account #{uid} balance: {}", resp.balance);
        }
        ["withdraw", uid, amount] => {
            let uid: u64 = uid.parse().map_err(|_| format!("not a uid: {uid}"))?;
            let amount: u64 = amount.parse().map_err(|_| format!("not an amount: {amount}"))?;
            let resp = client
                .withdraw(&ctx, WithdrawRequest { uid, amount })
                .map_err(describe)?;
            println!("account #{uid} balance: {}", resp.balance);
        }
        ["transfer", from, to, amount] => {
            let from: u64 = from.parse().map_err(|_| format!("not a uid: {from}"))?;
            let to: u64 = to.parse().map_err(|_| format!("not a uid: {to}"))?;
            let amount: u64 = amount.parse().map_err(|_| format!("not an amount: {amount}"))?;
            client
                .transfer(&ctx, TransferRequest { from, to, amount })
                .map_err(describe)?;
            println!("transferred {amount} from #{from} to #{to}");
        }
        _ => println!("unrecognized command, try `help`"),
    }
    Ok(false)
}

fn main() {
    let (options, free) = Options::from_command_line(
        "Usage: paxos-repl --control HOST:PORT [--exec COMMAND]",
    );
    if !free.is_empty() {
        eprintln!("paxos-repl takes no positional arguments");
        std::process::exit(1);
    }
    let addr: SocketAddr = options.control.parse().expect("--control must be host:port");
    let stream = TcpClient::connect(addr).expect("connect to worker control rpc");
    let client = WorkerControlClient::new(Arc::new(stream));

    if !options.exec.is_empty() {
        if let Err(err) = run_line(&client, &options.exec) {
            eprintln!("{err}");
            std::process::exit(1);
        }
        return;
    }

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush().ok();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        match run_line(&client, &line) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => eprintln!("{err}"),
        }
        print!("> ");
        io::stdout().flush().ok();
    }
}
