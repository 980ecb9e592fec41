//! The ledger domain state machine: a bank of accounts, each holding funds in integer minor units
//! (cents), mutated by exactly four commands (`OpenAccount`, `Deposit`, `Withdraw`, `Transfer`).
//! Funds are integers rather than a floating or decimal type so that conservation — the sum of
//! every account's balance never changes except by deposit/withdraw — holds exactly, with no
//! rounding drift across however many replicas re-derive the same state from the same command
//! log.
//!
//! [Ledger] itself is a plain, non-replicated value; [LedgerStateMachine] is what makes it
//! replicated, by implementing [paxos_rsm::Apply] over a lock-protected [Ledger] and committing a
//! command's mutation only if applying it succeeds. A command that fails (unknown account,
//! insufficient funds) still consumes its log slot — the log is an ordered record of every command
//! ever proposed, not just the ones that succeeded — but leaves the ledger's state untouched.

use std::collections::HashMap;
use std::sync::Mutex;

use biometrics::Counter;

use buffertk::{stack_pack, Unpackable};

use indicio::clue;

use prototk_derive::Message;

use zerror_core::ErrorCore;

pub static COLLECTOR: indicio::Collector = indicio::Collector::new();

static LEDGER_ACCOUNTS_OPENED: Counter = Counter::new("ledger.accounts.opened");
static LEDGER_DEPOSITS: Counter = Counter::new("ledger.deposits");
static LEDGER_WITHDRAWALS: Counter = Counter::new("ledger.withdrawals");
static LEDGER_TRANSFERS: Counter = Counter::new("ledger.transfers");
static LEDGER_UNKNOWN_ACCOUNT: Counter = Counter::new("ledger.errors.unknown_account");
static LEDGER_INSUFFICIENT_FUNDS: Counter = Counter::new("ledger.errors.insufficient_funds");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&LEDGER_ACCOUNTS_OPENED);
    collector.register_counter(&LEDGER_DEPOSITS);
    collector.register_counter(&LEDGER_WITHDRAWALS);
    collector.register_counter(&LEDGER_TRANSFERS);
    collector.register_counter(&LEDGER_UNKNOWN_ACCOUNT);
    collector.register_counter(&LEDGER_INSUFFICIENT_FUNDS);
}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// A domain-level failure applying a [Command] to a [Ledger]. Unlike [paxos_pb::Error], this never
/// indicates a transport or persistence problem; it is returned to the RPC caller as a
/// service-level error and never rolls back the command's log slot (see `paxos_rpc`).
#[derive(Clone, Message, zerror_derive::Z)]
pub enum LedgerError {
    #[prototk(770048, message)]
    Success {
        #[prototk(1, message)]
        core: ErrorCore,
    },
    #[prototk(770049, message)]
    UnknownAccount {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, uint64)]
        uid: u64,
    },
    #[prototk(770050, message)]
    InsufficientFunds {
        #[prototk(1, message)]
        core: ErrorCore,
        #[prototk(2, uint64)]
        uid: u64,
        #[prototk(3, uint64)]
        requested: u64,
        #[prototk(4, uint64)]
        available: u64,
    },
}

impl Default for LedgerError {
    fn default() -> Self {
        Self::Success {
            core: ErrorCore::default(),
        }
    }
}

zerror::iotoz! {LedgerError}

fn unknown_account(uid: u64) -> LedgerError {
    LEDGER_UNKNOWN_ACCOUNT.click();
    LedgerError::UnknownAccount {
        core: ErrorCore::default(),
        uid,
    }
}

fn insufficient_funds(uid: u64, requested: u64, available: u64) -> LedgerError {
    LEDGER_INSUFFICIENT_FUNDS.click();
    LedgerError::InsufficientFunds {
        core: ErrorCore::default(),
        uid,
        requested,
        available,
    }
}

////////////////////////////////////////////// Command /////////////////////////////////////////////

/// One ledger operation, as it is proposed to the replicated state machine. `amount`/`funds`
/// throughout this crate are integer minor units (e.g. cents for a currency with two decimal
/// places); the wire format never carries a floating-point value.
#[derive(Clone, Debug, Eq, Message, PartialEq)]
pub enum Command {
    #[prototk(1, message)]
    OpenAccount {},
    #[prototk(2, message)]
    Deposit {
        #[prototk(1, uint64)]
        uid: u64,
        #[prototk(2, uint64)]
        amount: u64,
    },
    #[prototk(3, message)]
    Withdraw {
        #[prototk(1, uint64)]
        uid: u64,
        #[prototk(2, uint64)]
        amount: u64,
    },
    #[prototk(4, message)]
    Transfer {
        #[prototk(1, uint64)]
        from: u64,
        #[prototk(2, uint64)]
        to: u64,
        #[prototk(3, uint64)]
        amount: u64,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::OpenAccount {}
    }
}

///////////////////////////////////////////// Output ///////////////////////////////////////////////

/// What a successfully-applied [Command] produces.
#[derive(Clone, Debug, Eq, Message, PartialEq)]
pub enum Output {
    #[prototk(1, message)]
    Opened {
        #[prototk(1, uint64)]
        uid: u64,
    },
    #[prototk(2, message)]
    Balance {
        #[prototk(1, uint64)]
        balance: u64,
    },
    #[prototk(3, message)]
    Empty {},
}

impl Default for Output {
    fn default() -> Self {
        Output::Empty {}
    }
}

////////////////////////////////////////////// Outcome /////////////////////////////////////////////

/// The wire representation of a [Command]'s `Result<Output, LedgerError>`, used to carry a
/// command's outcome back out of [LedgerStateMachine::apply] without [paxos_rsm::Apply] needing to
/// know anything about this crate's error type.
#[derive(Clone, Message)]
pub enum Outcome {
    #[prototk(1, message)]
    Ok {
        #[prototk(1, message)]
        output: Output,
    },
    #[prototk(2, message)]
    Err {
        #[prototk(1, message)]
        err: LedgerError,
    },
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Ok {
            output: Output::default(),
        }
    }
}

impl From<Result<Output, LedgerError>> for Outcome {
    fn from(result: Result<Output, LedgerError>) -> Self {
        match result {
            Ok(output) => Outcome::Ok { output },
            Err(err) => Outcome::Err { err },
        }
    }
}

impl From<Outcome> for Result<Output, LedgerError> {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Ok { output } => Ok(output),
            Outcome::Err { err } => Err(err),
        }
    }
}

////////////////////////////////////////////// Ledger //////////////////////////////////////////////

/// The bank: every account's balance, and the next uid [Ledger::open_account] will hand out.
/// `uid`s are assigned densely starting at zero and, like dictionary keys, are never reused.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    accounts: HashMap<u64, u64>,
    next_uid: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, uid: u64) -> Result<u64, LedgerError> {
        self.accounts.get(&uid).copied().ok_or_else(|| unknown_account(uid))
    }

    fn open_account(&mut self) -> Output {
        let uid = self.next_uid;
        self.next_uid += 1;
        self.accounts.insert(uid, 0);
        LEDGER_ACCOUNTS_OPENED.click();
        Output::Opened { uid }
    }

    fn deposit(&mut self, uid: u64, amount: u64) -> Result<Output, LedgerError> {
        let funds = self.accounts.get_mut(&uid).ok_or_else(|| unknown_account(uid))?;
        *funds = funds
            .checked_add(amount)
            .expect("deposit overflowed a u64 balance");
        LEDGER_DEPOSITS.click();
        Ok(Output::Balance { balance: *funds })
    }

    fn withdraw(&mut self, uid: u64, amount: u64) -> Result<Output, LedgerError> {
        let funds = self.accounts.get_mut(&uid).ok_or_else(|| unknown_account(uid))?;
        if *funds < amount {
            return Err(insufficient_funds(uid, amount, *funds));
        }
        *funds -= amount;
        LEDGER_WITHDRAWALS.click();
        Ok(Output::Balance { balance: *funds })
    }

    fn transfer(&mut self, from: u64, to: u64, amount: u64) -> Result<Output, LedgerError> {
        if !self.accounts.contains_key(&to) {
            return Err(unknown_account(to));
        }
        self.withdraw(from, amount)?;
        let funds = self
            .accounts
            .get_mut(&to)
            .expect("checked above that the destination account exists");
        *funds = funds
            .checked_add(amount)
            .expect("transfer overflowed a u64 balance");
        LEDGER_TRANSFERS.click();
        Ok(Output::Empty {})
    }

    /// Applies `command`, mutating `self` only if the command succeeds. A failed command (unknown
    /// account, insufficient funds) leaves every account balance exactly as it was.
    pub fn apply(&mut self, command: Command) -> Result<Output, LedgerError> {
        match command {
            Command::OpenAccount {} => Ok(self.open_account()),
            Command::Deposit { uid, amount } => self.deposit(uid, amount),
            Command::Withdraw { uid, amount } => self.withdraw(uid, amount),
            Command::Transfer { from, to, amount } => self.transfer(from, to, amount),
        }
    }

    /// The sum of every account's balance. Invariant: this only ever changes by the net of
    /// deposits minus withdrawals across the whole command log; transfers never change it.
    pub fn total_funds(&self) -> u64 {
        self.accounts.values().sum()
    }
}

/////////////////////////////////////////// LedgerStateMachine ///////////////////////////////////////

/// Wraps a [Ledger] in a lock and exposes it as a [paxos_rsm::Apply]. Every mutation is attempted
/// against a scratch clone of the current state and only committed back on success, so a command
/// that returns a [LedgerError] is guaranteed to have had no partial effect.
pub struct LedgerStateMachine {
    ledger: Mutex<Ledger>,
}

impl LedgerStateMachine {
    pub fn new() -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
        }
    }

    /// Reads `uid`'s balance from the local in-memory ledger. Callers that need a linearizable
    /// read should call [paxos_rsm::ReplicatedStateMachine::sync] first so any commands decided
    /// elsewhere are reflected locally before reading.
    pub fn balance(&self, uid: u64) -> Result<u64, LedgerError> {
        self.ledger.lock().unwrap().balance(uid)
    }

    /// Runs `command` against the ledger without going through replication. Used directly only by
    /// tests; production callers always route commands through a
    /// [paxos_rsm::ReplicatedStateMachine] so every replica applies the same sequence.
    pub fn apply_command(&self, command: Command) -> Result<Output, LedgerError> {
        let mut guard = self.ledger.lock().unwrap();
        let mut scratch = guard.clone();
        let result = scratch.apply(command);
        if result.is_ok() {
            *guard = scratch;
        }
        result
    }

    pub fn total_funds(&self) -> u64 {
        self.ledger.lock().unwrap().total_funds()
    }
}

impl Default for LedgerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl paxos_rsm::Apply for LedgerStateMachine {
    fn apply(&self, command: &[u8]) -> Vec<u8> {
        let command = match Command::unpack(command) {
            Ok((command, _rem)) => command,
            Err(err) => {
                let what = err.to_string();
                clue!(COLLECTOR, indicio::ERROR, { corrupted_ledger_command: what });
                panic!("corrupted command bytes in replicated ledger log: {err}");
            }
        };
        let outcome: Outcome = self.apply_command(command).into();
        stack_pack(&outcome).to_vec()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_deposit_withdraw_round_trip() {
        let mut ledger = Ledger::new();
        let uid = match ledger.apply(Command::OpenAccount {}).unwrap() {
            Output::Opened { uid } => uid,
            other => panic!("unexpected output: {other:?}"),
        };
        assert_eq!(0, ledger.balance(uid).unwrap());

        let balance = ledger.apply(Command::Deposit { uid, amount: 500 }).unwrap();
        assert_eq!(Output::Balance { balance: 500 }, balance);

        let balance = ledger.apply(Command::Withdraw { uid, amount: 200 }).unwrap();
        assert_eq!(Output::Balance { balance: 300 }, balance);
    }

    #[test]
    fn withdraw_beyond_balance_is_a_domain_error_not_a_panic() {
        let mut ledger = Ledger::new();
        let uid = match ledger.apply(Command::OpenAccount {}).unwrap() {
            Output::Opened { uid } => uid,
            other => panic!("unexpected output: {other:?}"),
        };
        ledger.apply(Command::Deposit { uid, amount: 100 }).unwrap();
        let err = ledger.apply(Command::Withdraw { uid, amount: 200 }).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        // the failed withdrawal must not have touched the balance
        assert_eq!(100, ledger.balance(uid).unwrap());
    }

    #[test]
    fn transfer_conserves_total_funds() {
        let mut ledger = Ledger::new();
        let a = match ledger.apply(Command::OpenAccount {}).unwrap() {
            Output::Opened { uid } => uid,
            _ => unreachable!(),
        };
        let b = match ledger.apply(Command::OpenAccount {}).unwrap() {
            Output::Opened { uid } => uid,
            _ => unreachable!(),
        };
        ledger.apply(Command::Deposit { uid: a, amount: 1000 }).unwrap();
        let before = ledger.total_funds();
        ledger
            .apply(Command::Transfer {
                from: a,
                to: b,
                amount: 400,
            })
            .unwrap();
        assert_eq!(before, ledger.total_funds());
        assert_eq!(600, ledger.balance(a).unwrap());
        assert_eq!(400, ledger.balance(b).unwrap());
    }

    #[test]
    fn transfer_to_unknown_account_leaves_sender_untouched() {
        let mut ledger = Ledger::new();
        let a = match ledger.apply(Command::OpenAccount {}).unwrap() {
            Output::Opened { uid } => uid,
            _ => unreachable!(),
        };
        ledger.apply(Command::Deposit { uid: a, amount: 500 }).unwrap();
        let err = ledger
            .apply(Command::Transfer {
                from: a,
                to: 999,
                amount: 100,
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount { .. }));
        assert_eq!(500, ledger.balance(a).unwrap());
    }

    #[test]
    fn state_machine_round_trips_commands_through_wire_bytes() {
        use paxos_rsm::Apply;

        let sm = LedgerStateMachine::new();
        let open_bytes = stack_pack(&Command::OpenAccount {}).to_vec();
        let outcome_bytes = sm.apply(&open_bytes);
        let (outcome, rem) = Outcome::unpack(&outcome_bytes).unwrap();
        assert!(rem.is_empty());
        let uid = match Result::<Output, LedgerError>::from(outcome).unwrap() {
            Output::Opened { uid } => uid,
            other => panic!("unexpected output: {other:?}"),
        };

        let deposit_bytes = stack_pack(&Command::Deposit { uid, amount: 250 }).to_vec();
        let outcome_bytes = sm.apply(&deposit_bytes);
        let (outcome, _rem) = Outcome::unpack(&outcome_bytes).unwrap();
        assert_eq!(
            Ok(Output::Balance { balance: 250 }),
            Result::<Output, LedgerError>::from(outcome)
        );
        assert_eq!(250, sm.total_funds());
    }
}
