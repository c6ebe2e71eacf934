//! Fingerprint-keyed membership of queued actions.

use soroban_sdk::{xdr::ToXdr, BytesN, Env};

use crate::{
    DataKey, QueuedAction, GRACE_PERIOD, LEDGER_SECONDS, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};

/// SHA-256 over the XDR encoding of every field of the action, ETA included.
pub(crate) fn fingerprint(env: &Env, action: &QueuedAction) -> BytesN<32> {
    env.crypto().sha256(&action.clone().to_xdr(env)).into()
}

pub(crate) fn contains(env: &Env, fingerprint: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Queued(fingerprint.clone()))
}

pub(crate) fn get(env: &Env, fingerprint: &BytesN<32>) -> Option<QueuedAction> {
    env.storage()
        .persistent()
        .get(&DataKey::Queued(fingerprint.clone()))
}

/// Stores the action and keeps it live until `eta + GRACE_PERIOD`, as far as
/// the network's maximum TTL allows.
pub(crate) fn insert(env: &Env, fingerprint: &BytesN<32>, action: &QueuedAction, now: u64) {
    let key = DataKey::Queued(fingerprint.clone());
    env.storage().persistent().set(&key, action);
    let extend_to = ledgers_until(action.eta.saturating_add(GRACE_PERIOD), now)
        .max(PERSISTENT_BUMP_AMOUNT)
        .min(env.storage().max_ttl());
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, extend_to);
}

pub(crate) fn remove(env: &Env, fingerprint: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::Queued(fingerprint.clone()));
}

fn ledgers_until(deadline: u64, now: u64) -> u32 {
    let ledgers = deadline.saturating_sub(now) / LEDGER_SECONDS + 1;
    u32::try_from(ledgers).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TimelockContract, TimelockContractClient, MINIMUM_DELAY};
    use soroban_sdk::{
        symbol_short,
        testutils::{storage::Persistent as _, Address as _},
        vec, Address, IntoVal,
    };

    const NOW: u64 = 1_700_000_000;
    const DAY: u64 = 86_400;

    fn action(env: &Env, eta: u64) -> QueuedAction {
        QueuedAction {
            target: Address::generate(env),
            value: 0,
            signature: Some(symbol_short!("ping")),
            payload: vec![env, 7u32.into_val(env)],
            eta,
        }
    }

    #[test]
    fn test_ledgers_until_rounds_up() {
        assert_eq!(ledgers_until(NOW, NOW), 1);
        assert_eq!(ledgers_until(NOW + 4, NOW), 1);
        assert_eq!(ledgers_until(NOW + 5, NOW), 2);
        assert_eq!(ledgers_until(NOW, NOW + 10), 1);
        assert_eq!(ledgers_until(u64::MAX, 0), u32::MAX);
    }

    #[test]
    fn test_far_eta_stays_live_through_grace() {
        let env = Env::default();
        env.mock_all_auths();
        let gate = env.register_contract(None, TimelockContract);
        TimelockContractClient::new(&env, &gate).initialize(
            &Address::generate(&env),
            &MINIMUM_DELAY,
            &None,
        );
        env.as_contract(&gate, || {
            let act = action(&env, NOW + 120 * DAY);
            let fp = fingerprint(&env, &act);
            insert(&env, &fp, &act, NOW);

            let ttl = env.storage().persistent().get_ttl(&DataKey::Queued(fp));
            let needed = ((120 * DAY + GRACE_PERIOD) / LEDGER_SECONDS) as u32;
            assert!(ttl >= needed);
            assert!(ttl > PERSISTENT_BUMP_AMOUNT);
        });
    }

    #[test]
    fn test_near_eta_keeps_default_bump() {
        let env = Env::default();
        env.mock_all_auths();
        let gate = env.register_contract(None, TimelockContract);
        TimelockContractClient::new(&env, &gate).initialize(
            &Address::generate(&env),
            &MINIMUM_DELAY,
            &None,
        );
        env.as_contract(&gate, || {
            let act = action(&env, NOW + MINIMUM_DELAY);
            let fp = fingerprint(&env, &act);
            insert(&env, &fp, &act, NOW);

            let ttl = env.storage().persistent().get_ttl(&DataKey::Queued(fp));
            assert_eq!(ttl, PERSISTENT_BUMP_AMOUNT);
        });
    }
}
