//! Audit notifications. Action events carry the fingerprint as a topic and
//! the whole action as data, so every announcement can be reconstructed.

use soroban_sdk::{symbol_short, Address, BytesN, Env, Val};

use crate::QueuedAction;

pub(crate) fn queued(env: &Env, fingerprint: &BytesN<32>, action: &QueuedAction) {
    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("queued"), fingerprint.clone()),
        action.clone(),
    );
}

pub(crate) fn cancelled(env: &Env, fingerprint: &BytesN<32>, action: &QueuedAction) {
    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("cancelled"), fingerprint.clone()),
        action.clone(),
    );
}

pub(crate) fn executed(
    env: &Env,
    fingerprint: &BytesN<32>,
    action: &QueuedAction,
    returned: &Val,
) {
    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("executed"), fingerprint.clone()),
        (action.clone(), *returned),
    );
}

pub(crate) fn pending_admin_set(env: &Env, pending_admin: &Address) {
    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("pend_adm")),
        pending_admin.clone(),
    );
}

pub(crate) fn admin_accepted(env: &Env, previous: &Address, admin: &Address) {
    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("new_admin")),
        (previous.clone(), admin.clone()),
    );
}

pub(crate) fn delay_set(env: &Env, delay: u64) {
    env.events()
        .publish((symbol_short!("timelock"), symbol_short!("new_delay")), delay);
}
