//! Randomised Cache Invariants.
//!
//! Drives every policy with arbitrary access / install / invalidate sequences
//! and checks the cache against a plain residency model.

use std::collections::HashSet;

use cachesim_core::config::ReplacementPolicy as PolicyType;
use cachesim_core::{AccessContext, Cache, CacheConfig, InstallOutcome};
use proptest::prelude::*;

const SETS: usize = 4;
const WAYS: usize = 2;
const ADDRS: u64 = 24;

#[derive(Debug, Clone, Copy)]
enum Op {
    Access { addr: u64, write: bool },
    Install { addr: u64, signature: u64 },
    Invalidate { addr: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..ADDRS, any::<bool>()).prop_map(|(addr, write)| Op::Access { addr, write }),
        4 => (0..ADDRS, 0..8u64).prop_map(|(addr, signature)| Op::Install { addr, signature }),
        1 => (0..ADDRS).prop_map(|addr| Op::Invalidate { addr }),
    ]
}

fn any_policy() -> impl Strategy<Value = PolicyType> {
    prop::sample::select(PolicyType::ALL.to_vec())
}

fn resident_in_set(model: &HashSet<u64>, set: usize) -> usize {
    model.iter().filter(|&&a| a as usize % SETS == set).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn cache_matches_residency_model(
        policy in any_policy(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..300),
    ) {
        let mut c = Cache::new(&CacheConfig { seed, ..CacheConfig::new(SETS, WAYS, policy) }).unwrap();
        let mut model = HashSet::new();
        let mut hits = 0u64;

        for (now, op) in ops.iter().enumerate() {
            let ctx = AccessContext::at(now as u64);
            match *op {
                Op::Access { addr, write } => {
                    let hit = c.access(addr, write, &ctx);
                    prop_assert_eq!(hit, model.contains(&addr));
                    hits += u64::from(hit);
                }
                Op::Install { addr, signature } => {
                    let set = c.set_index(addr);
                    let full = resident_in_set(&model, set) == WAYS;
                    match c.install(addr, &ctx.with_signature(signature)) {
                        InstallOutcome::DuplicateInstall => prop_assert!(model.contains(&addr)),
                        InstallOutcome::Installed { way, evicted } => {
                            prop_assert!(way < WAYS);
                            prop_assert!(!model.contains(&addr));
                            prop_assert_eq!(evicted.is_some(), full);
                            if let Some(e) = evicted {
                                prop_assert_eq!(e.set, set);
                                prop_assert_eq!(e.way, way);
                                prop_assert!(model.remove(&e.address));
                            }
                            model.insert(addr);
                        }
                    }
                }
                Op::Invalidate { addr } => {
                    prop_assert_eq!(c.invalidate(addr), model.remove(&addr));
                }
            }

            for set in 0..SETS {
                let valid: Vec<u64> = c
                    .set_lines(set)
                    .iter()
                    .filter(|l| l.valid)
                    .map(|l| l.address)
                    .collect();
                let unique: HashSet<u64> = valid.iter().copied().collect();
                prop_assert!(valid.len() <= WAYS);
                prop_assert_eq!(unique.len(), valid.len());
                prop_assert_eq!(valid.len(), resident_in_set(&model, set));
            }
        }

        for addr in 0..ADDRS {
            prop_assert_eq!(c.probe(addr), model.contains(&addr));
        }
        let stats = c.stats();
        prop_assert!(stats.is_consistent());
        prop_assert_eq!(stats.hit_count, hits);
        prop_assert_eq!(c.policy_kind(), policy);
    }

    #[test]
    fn probe_never_changes_state(
        policy in any_policy(),
        addrs in prop::collection::vec(0..ADDRS, 1..64),
    ) {
        let mut c = Cache::with_policy(SETS, WAYS, policy).unwrap();
        for (now, &addr) in addrs.iter().enumerate() {
            let _ = c.install(addr, &AccessContext::at(now as u64));
        }
        let before: Vec<_> = (0..SETS).map(|s| c.set_lines(s).to_vec()).collect();
        let stats = c.stats();

        for addr in 0..ADDRS {
            let _ = c.probe(addr);
        }

        let after: Vec<_> = (0..SETS).map(|s| c.set_lines(s).to_vec()).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(stats, c.stats());
    }
}
