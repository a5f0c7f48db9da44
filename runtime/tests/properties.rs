//! Property tests for the runtime's invariants.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use attest_crypto::credential_id;
use attest_nullables::{NullChain, NullStore};
use attest_runtime::{Runtime, RuntimeCall, Vote, VoteChoice};
use attest_store::StateOverlay;
use attest_types::{Claim, EntityId, PublicKey};

fn key(b: u8) -> PublicKey {
    PublicKey([b; 32])
}

/// Mostly a handful of identities, so admins, judges and voters overlap.
fn arb_identity() -> impl Strategy<Value = u8> {
    prop_oneof![4 => 0u8..4, 1 => any::<u8>()]
}

/// One step of a random sequence. Votes name a credential by its position
/// among those created so far, since ids only exist once submitted.
#[derive(Clone, Debug)]
enum Step {
    Call(RuntimeCall),
    Vote { credential: usize, yes: bool },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => arb_identity().prop_map(|b| Step::Call(RuntimeCall::SetAdmin { admin: key(b) })),
        1 => arb_identity().prop_map(|b| Step::Call(RuntimeCall::AddJudge { judge: key(b) })),
        1 => (0u64..8).prop_map(|c| {
            Step::Call(RuntimeCall::AddCredential { claim: Claim::from(c) })
        }),
        3 => (any::<usize>(), any::<bool>())
            .prop_map(|(credential, yes)| Step::Vote { credential, yes }),
    ]
}

fn setup_admin(runtime: &Runtime, store: &NullStore, chain: &NullChain, admin: PublicKey) {
    runtime.execute(store, &chain.context(admin), &RuntimeCall::SetAdmin { admin });
}

proptest! {
    /// Once an admin is set, no call from anyone else can change it.
    #[test]
    fn non_admin_never_changes_admin(
        admin in any::<u8>(),
        attempts in prop::collection::vec((any::<u8>(), any::<u8>()), 1..20),
    ) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let chain = NullChain::default();
        setup_admin(&runtime, &store, &chain, key(admin));

        for (sender, target) in attempts {
            if sender == admin {
                continue;
            }
            let before = store.snapshot();
            let receipt = runtime.execute(
                &store,
                &chain.context(key(sender)),
                &RuntimeCall::SetAdmin { admin: key(target) },
            );
            prop_assert!(!receipt.status);
            prop_assert_eq!(store.snapshot(), before);
        }
    }

    /// add_judge succeeds iff the sender is the current admin, and then the
    /// judge passes the judge check.
    #[test]
    fn add_judge_iff_admin(admin in any::<u8>(), sender in any::<u8>(), judge in any::<u8>()) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let chain = NullChain::default();
        setup_admin(&runtime, &store, &chain, key(admin));

        let receipt = runtime.execute(
            &store,
            &chain.context(key(sender)),
            &RuntimeCall::AddJudge { judge: key(judge) },
        );
        prop_assert_eq!(receipt.status, sender == admin);

        let state = StateOverlay::new(&store);
        let passes = runtime
            .judges()
            .assert_sender_is_judge(&chain.context(key(judge)), &state)
            .is_ok();
        prop_assert_eq!(passes, sender == admin);
    }

    /// A resubmitted credential fails and leaves state untouched.
    #[test]
    fn duplicate_credential_leaves_state_unchanged(owner in any::<u8>(), claim in any::<u64>()) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let ctx = NullChain::default().context(key(owner));
        let call = RuntimeCall::AddCredential { claim: Claim::from(claim) };

        prop_assert!(runtime.execute(&store, &ctx, &call).status);
        let before = store.snapshot();
        let receipt = runtime.execute(&store, &ctx, &call);
        prop_assert_eq!(receipt.status_message.as_deref(), Some("Credential already exists"));
        prop_assert_eq!(store.snapshot(), before);
    }

    /// n distinct judges voting once each: yay + nay == n, each choice counted once.
    #[test]
    fn tally_matches_distinct_judges(choices in prop::collection::vec(any::<bool>(), 1..30)) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let chain = NullChain::new(100);
        let admin = key(0);
        setup_admin(&runtime, &store, &chain, admin);
        for i in 0..choices.len() {
            let judge = key(i as u8 + 1);
            runtime.execute(&store, &chain.context(admin), &RuntimeCall::AddJudge { judge });
        }
        let owner = key(200);
        runtime.execute(
            &store,
            &chain.context(owner),
            &RuntimeCall::AddCredential { claim: Claim::from(1) },
        );
        let vote_id = credential_id(&Claim::from(1), &owner);

        for (i, yes) in choices.iter().enumerate() {
            let judge = key(i as u8 + 1);
            let receipt = runtime.execute(
                &store,
                &chain.context(judge),
                &RuntimeCall::CastVote { vote_id, choice: VoteChoice::from(*yes) },
            );
            prop_assert!(receipt.status);
        }

        let state = StateOverlay::new(&store);
        let vote = runtime.voting().vote(&state, &vote_id).unwrap().unwrap();
        let yes = choices.iter().filter(|c| **c).count() as u64;
        prop_assert_eq!(vote.yay, yes);
        prop_assert_eq!(vote.nay, choices.len() as u64 - yes);
        prop_assert_eq!(vote.total(), choices.len() as u64);
    }

    /// Replayed votes are rejected and never move the tally.
    #[test]
    fn replay_never_changes_tally(first in any::<bool>(), second in any::<bool>()) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let chain = NullChain::default();
        let (admin, judge) = (key(1), key(2));
        setup_admin(&runtime, &store, &chain, admin);
        runtime.execute(&store, &chain.context(admin), &RuntimeCall::AddJudge { judge });
        runtime.execute(
            &store,
            &chain.context(admin),
            &RuntimeCall::AddCredential { claim: Claim::from(0) },
        );
        let vote_id = credential_id(&Claim::from(0), &admin);

        let first = RuntimeCall::CastVote { vote_id, choice: first.into() };
        runtime.execute(&store, &chain.context(judge), &first);
        let before = store.snapshot();
        let second = RuntimeCall::CastVote { vote_id, choice: second.into() };
        let receipt = runtime.execute(&store, &chain.context(judge), &second);
        prop_assert_eq!(receipt.status_message.as_deref(), Some("Vote has already been cast"));
        prop_assert_eq!(store.snapshot(), before);
    }

    /// Random step sequences keep the structural invariants: every credential
    /// has a ballot with the same id, judges are never removed, the judge
    /// counter is at least the number of distinct judges, tallies never
    /// decrease, a successful vote adds exactly one to its tally, and a
    /// ballot's expiry never changes.
    #[test]
    fn random_sequences_preserve_invariants(
        steps in prop::collection::vec((arb_identity(), arb_step(), 0u64..3), 1..60),
    ) {
        let runtime = Runtime::default();
        let store = NullStore::new();
        let chain = NullChain::default();
        let mut judges = BTreeSet::new();
        let mut credentials: Vec<EntityId> = Vec::new();
        let mut ballots: BTreeMap<EntityId, Vote> = BTreeMap::new();
        let mut admin_ever_set = false;

        for (sender, step, advance) in steps {
            chain.advance(advance);
            let call = match step {
                Step::Call(call) => call,
                Step::Vote { credential, yes } => {
                    let vote_id = if credentials.is_empty() {
                        EntityId::ZERO
                    } else {
                        credentials[credential % credentials.len()]
                    };
                    RuntimeCall::CastVote { vote_id, choice: yes.into() }
                }
            };
            let receipt = runtime.execute(&store, &chain.context(key(sender)), &call);
            if receipt.status {
                match &call {
                    RuntimeCall::SetAdmin { .. } => admin_ever_set = true,
                    RuntimeCall::AddJudge { judge } => {
                        judges.insert(*judge);
                    }
                    RuntimeCall::AddCredential { claim } => {
                        credentials.push(credential_id(claim, &key(sender)));
                    }
                    RuntimeCall::CastVote { .. } => {}
                }
            }

            let state = StateOverlay::new(&store);
            if admin_ever_set {
                prop_assert!(runtime.admin().admin(&state).unwrap().is_some());
            }
            for judge in &judges {
                prop_assert!(runtime.judges().is_judge(&state, judge).unwrap());
            }
            prop_assert!(runtime.judges().judge_count(&state).unwrap() >= judges.len() as u64);
            for id in &credentials {
                prop_assert!(runtime.credentials().credential(&state, id).unwrap().is_some());
                let vote = runtime.voting().vote(&state, id).unwrap();
                prop_assert!(vote.is_some());
                let vote = vote.unwrap();
                if let Some(prev) = ballots.get(id) {
                    prop_assert!(vote.yay >= prev.yay);
                    prop_assert!(vote.nay >= prev.nay);
                    prop_assert_eq!(vote.expires_at, prev.expires_at);
                    let voted_here = matches!(
                        &call,
                        RuntimeCall::CastVote { vote_id, .. } if vote_id == id
                    ) && receipt.status;
                    let expected = prev.total() + u64::from(voted_here);
                    prop_assert_eq!(vote.total(), expected);
                }
                ballots.insert(*id, vote);
            }
        }
    }
}
