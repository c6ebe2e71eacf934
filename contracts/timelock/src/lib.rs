//! Urdex - Timelock (Soroban)
//! Delayed execution of administrative actions on Stellar.
//!
//! Every privileged call (token transfer, parameter change, admin rotation) is
//! announced with an ETA, waits out the configured delay, and may only run
//! inside the grace window that follows. The gate's own configuration is
//! changed through the same queue/execute path by targeting the gate itself.

#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, Address, BytesN, Env, Symbol, Val, Vec,
};

mod admin;
mod engine;
mod events;
mod invoker;
mod registry;

use invoker::HostInvoker;

const HOUR: u64 = 3_600;
const DAY: u64 = 24 * HOUR;

/// How long after its ETA a queued action stays executable.
pub const GRACE_PERIOD: u64 = 14 * DAY;
pub const MINIMUM_DELAY: u64 = 6 * HOUR;
pub const MAXIMUM_DELAY: u64 = 30 * DAY;

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const LEDGER_SECONDS: u64 = 5;
// Floor for queued entries. Entries whose `eta + GRACE_PERIOD` lies further out
// are extended to cover it, up to the network's maximum TTL.
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TimelockError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    /// ETA earlier than `now + delay`.
    InvalidSchedule = 4,
    /// Delay outside `[MINIMUM_DELAY, MAXIMUM_DELAY]`.
    InvalidDelay = 5,
    /// Fingerprint unknown, cancelled or already executed.
    NotQueued = 6,
    /// Executed before its ETA.
    TransactionLocked = 7,
    /// Executed after `eta + GRACE_PERIOD`.
    TransactionStale = 8,
    /// The delegated call failed.
    ExecutionReverted = 9,
    /// Negative value, or value without a configured value token.
    InvalidValue = 10,
}

/// Full content of an announced action. Its fingerprint is the SHA-256 of
/// its XDR encoding, so identical content and ETA share one registry slot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueuedAction {
    pub target: Address,
    /// Units of the value token paid to `target` before the call.
    pub value: i128,
    /// Function to call. When absent the first payload element names it.
    pub signature: Option<Symbol>,
    pub payload: Vec<Val>,
    pub eta: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    PendingAdmin,
    Delay,
    ValueToken,
    Queued(BytesN<32>),
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

#[contract]
pub struct TimelockContract;

#[contractimpl]
impl TimelockContract {
    pub fn initialize(
        env: Env,
        admin: Address,
        delay: u64,
        value_token: Option<Address>,
    ) -> Result<(), TimelockError> {
        extend_instance_ttl(&env);
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(TimelockError::AlreadyInitialized);
        }
        admin.require_auth();
        admin::validate_delay(delay)?;

        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Delay, &delay);
        if let Some(token) = value_token {
            env.storage().instance().set(&DataKey::ValueToken, &token);
        }
        Ok(())
    }

    // ── Registry ────────────────────────────────────────────────────────────

    /// Announce an action. Re-queuing an action that is already queued
    /// succeeds without changing state.
    pub fn queue(
        env: Env,
        caller: Address,
        target: Address,
        value: i128,
        signature: Option<Symbol>,
        payload: Vec<Val>,
        eta: u64,
    ) -> Result<BytesN<32>, TimelockError> {
        extend_instance_ttl(&env);
        admin::require_admin(&env, &caller)?;
        let action = QueuedAction {
            target,
            value,
            signature,
            payload,
            eta,
        };
        engine::queue(&env, &action, env.ledger().timestamp())
    }

    /// Withdraw an action at any point in its life, stale or not.
    /// Cancelling an action that is not queued is a no-op.
    pub fn cancel(
        env: Env,
        caller: Address,
        target: Address,
        value: i128,
        signature: Option<Symbol>,
        payload: Vec<Val>,
        eta: u64,
    ) -> Result<BytesN<32>, TimelockError> {
        extend_instance_ttl(&env);
        admin::require_admin(&env, &caller)?;
        let action = QueuedAction {
            target,
            value,
            signature,
            payload,
            eta,
        };
        Ok(engine::cancel(&env, &action))
    }

    pub fn execute(
        env: Env,
        caller: Address,
        target: Address,
        value: i128,
        signature: Option<Symbol>,
        payload: Vec<Val>,
        eta: u64,
    ) -> Result<Val, TimelockError> {
        extend_instance_ttl(&env);
        admin::require_admin(&env, &caller)?;
        let action = QueuedAction {
            target,
            value,
            signature,
            payload,
            eta,
        };
        let invoker = HostInvoker::new(&env);
        engine::execute(&env, &invoker, &action, env.ledger().timestamp())
    }

    // ── Self-administered configuration ────────────────────────────────────

    /// Nominate the next administrator. Only the gate itself may call this,
    /// i.e. through an executed action that targets the gate.
    pub fn set_pending_admin(
        env: Env,
        caller: Address,
        pending_admin: Address,
    ) -> Result<(), TimelockError> {
        extend_instance_ttl(&env);
        admin::require_self(&env, &caller)?;
        caller.require_auth();
        admin::request_admin_change(&env, &caller, &pending_admin)
    }

    /// Change the delay. Only the gate itself may call this.
    pub fn set_delay(env: Env, caller: Address, delay: u64) -> Result<(), TimelockError> {
        extend_instance_ttl(&env);
        admin::require_self(&env, &caller)?;
        caller.require_auth();
        admin::set_delay(&env, &caller, delay)
    }

    pub fn accept_admin(env: Env, caller: Address) -> Result<(), TimelockError> {
        extend_instance_ttl(&env);
        admin::accept_admin(&env, &caller)
    }

    // ── Views ───────────────────────────────────────────────────────────────

    pub fn admin(env: Env) -> Result<Address, TimelockError> {
        extend_instance_ttl(&env);
        admin::current_admin(&env)
    }

    pub fn pending_admin(env: Env) -> Option<Address> {
        extend_instance_ttl(&env);
        urdex_common_admin::pending_admin(&env, &DataKey::PendingAdmin)
    }

    pub fn delay(env: Env) -> Result<u64, TimelockError> {
        extend_instance_ttl(&env);
        admin::delay(&env)
    }

    pub fn grace_period(_env: Env) -> u64 {
        GRACE_PERIOD
    }

    pub fn minimum_delay(_env: Env) -> u64 {
        MINIMUM_DELAY
    }

    pub fn maximum_delay(_env: Env) -> u64 {
        MAXIMUM_DELAY
    }

    pub fn value_token(env: Env) -> Option<Address> {
        extend_instance_ttl(&env);
        env.storage().instance().get(&DataKey::ValueToken)
    }

    pub fn is_queued(env: Env, fingerprint: BytesN<32>) -> bool {
        extend_instance_ttl(&env);
        registry::contains(&env, &fingerprint)
    }

    pub fn get_queued(env: Env, fingerprint: BytesN<32>) -> Option<QueuedAction> {
        extend_instance_ttl(&env);
        registry::get(&env, &fingerprint)
    }

    /// Fingerprint an action without touching the registry.
    pub fn hash_action(
        env: Env,
        target: Address,
        value: i128,
        signature: Option<Symbol>,
        payload: Vec<Val>,
        eta: u64,
    ) -> BytesN<32> {
        let action = QueuedAction {
            target,
            value,
            signature,
            payload,
            eta,
        };
        registry::fingerprint(&env, &action)
    }

    /// True when the action is queued and the ledger time is inside its
    /// execution window.
    pub fn is_ready(
        env: Env,
        target: Address,
        value: i128,
        signature: Option<Symbol>,
        payload: Vec<Val>,
        eta: u64,
    ) -> bool {
        extend_instance_ttl(&env);
        let action = QueuedAction {
            target,
            value,
            signature,
            payload,
            eta,
        };
        registry::contains(&env, &registry::fingerprint(&env, &action))
            && engine::check_window(env.ledger().timestamp(), eta).is_ok()
    }
}
