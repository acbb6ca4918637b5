//! Integration tests driving the full core through [`DposService`]:
//! token approval → stake → election → reward distribution → claim, plus the
//! data verification flow.
//!
//! Time comes from a `NullClock` and tokens from a `NullToken`, so every
//! scenario is deterministic and can inject gateway failures.

use std::sync::Arc;

use autonomix_datashare::{DataMetadata, DataStatus, RegistryError, VerifierPolicy};
use autonomix_election::{ElectionError, ValidatorSet};
use autonomix_node::{
    DposError, DposEvent, DposService, ElectionAccess, ErrorKind, NodeConfig,
};
use autonomix_nullables::{GatewayCall, NullClock, NullToken};
use autonomix_rewards::{RewardError, RewardPoolSource};
use autonomix_staking::StakingError;
use autonomix_token::{TokenError, TokenGateway};
use autonomix_types::{Address, DataHash, DposParams, TokenAmount};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GENESIS: u64 = 1_000;
const WEEK: u64 = DposParams::ELECTION_PERIOD_SECS;

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

fn tokens(n: u128) -> TokenAmount {
    TokenAmount::from_tokens(n)
}

struct Harness {
    token: Arc<NullToken>,
    clock: Arc<NullClock>,
    service: DposService<Arc<NullToken>>,
    config: NodeConfig,
}

impl Harness {
    fn new(config: NodeConfig) -> Self {
        let token = Arc::new(NullToken::new(config.treasury, tokens(1_000_000)));
        token
            .approve(&config.treasury, &config.custody, TokenAmount::MAX)
            .unwrap();
        let clock = Arc::new(NullClock::new(GENESIS));
        let service =
            DposService::from_config(Arc::clone(&token), &config, clock.clone()).unwrap();
        Self {
            token,
            clock,
            service,
            config,
        }
    }

    fn plain() -> Self {
        Self::new(NodeConfig::default())
    }

    fn with_max_validators(max_validators: usize) -> Self {
        Self::new(NodeConfig {
            params: DposParams {
                max_validators,
                ..DposParams::default()
            },
            ..NodeConfig::default()
        })
    }

    fn owner(&self) -> Address {
        self.config.owner
    }

    fn custody_balance(&self) -> TokenAmount {
        self.token.balance_of(&self.config.custody)
    }

    /// Mint `amount` to `who` and approve custody for it.
    fn fund(&self, who: Address, amount: TokenAmount) {
        self.token.mint(&who, amount).unwrap();
        self.token
            .approve(&who, &self.config.custody, amount)
            .unwrap();
    }

    fn stake(
        &self,
        delegator: Address,
        delegate: Address,
        amount: TokenAmount,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.fund(delegator, amount);
        self.service.stake(delegator, delegate, amount)
    }

    /// Self-stake `stake` whole tokens for each `(delegate, stake)`.
    fn stake_all(&self, delegates: &[(u64, u128)]) {
        for (delegate, stake) in delegates {
            self.stake(addr(*delegate), addr(*delegate), tokens(*stake))
                .unwrap();
        }
    }

    fn elect_after_cooldown(&self) -> Vec<Address> {
        self.clock.advance(WEEK);
        self.service.elect_validators(addr(0xFFFF)).unwrap();
        self.service.current_validators()
    }
}

fn rewards_of(service: &DposService<Arc<NullToken>>, delegate: Address) -> TokenAmount {
    service
        .read(|s| s.delegate(&delegate).map(|d| d.total_rewards))
        .unwrap_or(TokenAmount::ZERO)
}

fn metadata() -> DataMetadata {
    DataMetadata::new("Pothole", "CAR-7")
}

// ---------------------------------------------------------------------------
// Staking
// ---------------------------------------------------------------------------

#[test]
fn stake_moves_tokens_into_custody() {
    let h = Harness::plain();
    let events = h.stake(addr(0x100), addr(0xB), tokens(5)).unwrap();

    assert_eq!(
        events,
        vec![
            DposEvent::CandidateRegistered { delegate: addr(0xB) },
            DposEvent::Staked {
                delegate: addr(0xB),
                delegator: addr(0x100),
                amount: tokens(5),
                delegate_total: tokens(5),
            },
        ]
    );
    assert_eq!(h.service.delegate_total_staked(&addr(0xB)), tokens(5));
    assert_eq!(h.service.delegator_stake(&addr(0xB), &addr(0x100)), tokens(5));
    assert_eq!(h.token.balance_of(&addr(0x100)), TokenAmount::ZERO);
    assert_eq!(h.custody_balance(), tokens(5));
    h.service.audit().unwrap();
}

#[test]
fn stake_without_allowance_changes_nothing() {
    let h = Harness::plain();
    h.token.mint(&addr(0x100), tokens(5)).unwrap();

    let err = h
        .service
        .stake(addr(0x100), addr(0xB), tokens(5))
        .unwrap_err();
    assert!(matches!(
        err,
        DposError::Token(TokenError::InsufficientAllowance { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::InsufficientResource);
    assert!(err.is_retryable());
    assert_eq!(h.service.delegate_total_staked(&addr(0xB)), TokenAmount::ZERO);
    assert_eq!(h.token.balance_of(&addr(0x100)), tokens(5));
    assert_eq!(h.service.metrics().rejected_calls.get(), 1);
}

#[test]
fn stake_over_balance_changes_nothing() {
    let h = Harness::plain();
    h.fund(addr(0x100), tokens(2));
    h.token
        .approve(&addr(0x100), &h.config.custody, tokens(10))
        .unwrap();
    let err = h
        .service
        .stake(addr(0x100), addr(0xB), tokens(3))
        .unwrap_err();
    assert!(matches!(
        err,
        DposError::Token(TokenError::InsufficientBalance { .. })
    ));
    assert!(!h.service.read(|s| s.stake_ledger().contains(&addr(0xB))));
}

#[test]
fn invalid_stake_input_is_rejected_before_any_transfer() {
    let h = Harness::new(NodeConfig {
        params: DposParams {
            min_stake: tokens(1),
            ..DposParams::default()
        },
        ..NodeConfig::default()
    });
    h.fund(addr(0x100), tokens(10));
    h.token.clear_calls();

    let zero = h
        .service
        .stake(addr(0x100), addr(0xB), TokenAmount::ZERO)
        .unwrap_err();
    assert!(matches!(zero, DposError::Staking(StakingError::ZeroAmount)));
    assert_eq!(zero.kind(), ErrorKind::InputValidation);

    let to_zero = h
        .service
        .stake(addr(0x100), Address::ZERO, tokens(1))
        .unwrap_err();
    assert!(matches!(to_zero, DposError::Staking(StakingError::ZeroAddress)));

    let small = h
        .service
        .stake(addr(0x100), addr(0xB), TokenAmount::new(1))
        .unwrap_err();
    assert!(matches!(small, DposError::BelowMinimumStake { .. }));

    assert_eq!(h.token.transfer_count(), 0);
}

#[test]
fn custody_account_cannot_stake_unstake_or_claim() {
    let h = Harness::plain();
    let custody = h.config.custody;
    h.stake(addr(1), addr(1), tokens(100)).unwrap();
    h.token
        .approve(&custody, &custody, TokenAmount::MAX)
        .unwrap();

    let err = h.service.stake(custody, addr(2), tokens(100)).unwrap_err();
    assert!(matches!(err, DposError::CustodyAccount { .. }));
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(matches!(
        h.service.unstake(custody, addr(1), tokens(1)),
        Err(DposError::CustodyAccount { .. })
    ));
    assert!(matches!(
        h.service.claim_rewards(custody),
        Err(DposError::CustodyAccount { .. })
    ));

    assert_eq!(h.service.delegate_total_staked(&addr(2)), TokenAmount::ZERO);
    assert_eq!(h.custody_balance(), tokens(100));
    h.service.audit().unwrap();
}

#[test]
fn custody_account_cannot_be_a_delegate() {
    let h = Harness::plain();
    let custody = h.config.custody;
    assert!(matches!(
        h.stake(addr(1), custody, tokens(5)),
        Err(DposError::CustodyAccount { .. })
    ));
    assert!(matches!(
        h.service.register_candidate(h.owner(), custody),
        Err(DposError::CustodyAccount { .. })
    ));
    assert_eq!(h.custody_balance(), TokenAmount::ZERO);
}

#[test]
fn unstake_returns_tokens_and_keeps_delegate() {
    let h = Harness::plain();
    h.stake(addr(0x100), addr(0xB), tokens(5)).unwrap();
    h.stake(addr(0x101), addr(0xB), tokens(2)).unwrap();

    h.service.unstake(addr(0x100), addr(0xB), tokens(5)).unwrap();
    assert_eq!(h.token.balance_of(&addr(0x100)), tokens(5));
    assert_eq!(h.service.delegate_total_staked(&addr(0xB)), tokens(2));
    assert_eq!(h.service.delegator_stake(&addr(0xB), &addr(0x100)), TokenAmount::ZERO);
    let delegators: Vec<Address> = h
        .service
        .read(|s| s.delegators_of(&addr(0xB)))
        .into_iter()
        .map(|p| p.delegator)
        .collect();
    assert_eq!(delegators, vec![addr(0x101)]);
    h.service.audit().unwrap();
}

#[test]
fn over_unstake_is_rejected_without_effect() {
    let h = Harness::plain();
    h.stake(addr(0x100), addr(0xB), tokens(5)).unwrap();
    let err = h
        .service
        .unstake(addr(0x100), addr(0xB), tokens(6))
        .unwrap_err();
    assert!(matches!(
        err,
        DposError::Staking(StakingError::InsufficientStake { .. })
    ));
    assert_eq!(h.service.delegate_total_staked(&addr(0xB)), tokens(5));
    assert_eq!(h.custody_balance(), tokens(5));

    // Someone else's stake cannot be withdrawn.
    assert!(h.service.unstake(addr(0x999), addr(0xB), tokens(1)).is_err());
}

#[test]
fn failed_unstake_transfer_keeps_stake() {
    let h = Harness::plain();
    h.stake(addr(0x100), addr(0xB), tokens(5)).unwrap();
    h.token
        .fail_next_transfer(TokenError::Rejected("token paused".into()));

    let err = h
        .service
        .unstake(addr(0x100), addr(0xB), tokens(5))
        .unwrap_err();
    assert!(matches!(err, DposError::Token(TokenError::Rejected(_))));
    assert_eq!(h.service.delegator_stake(&addr(0xB), &addr(0x100)), tokens(5));
    h.service.audit().unwrap();
}

// ---------------------------------------------------------------------------
// Election
// ---------------------------------------------------------------------------

#[test]
fn abc_scenario_elects_by_stake() {
    let (a, b, c) = (0xA1, 0xB1, 0xC1);
    let h = Harness::plain();
    h.stake_all(&[(a, 1), (b, 5), (c, 3)]);
    assert_eq!(h.elect_after_cooldown(), vec![addr(b), addr(c), addr(a)]);

    let h2 = Harness::with_max_validators(2);
    h2.stake_all(&[(a, 1), (b, 5), (c, 3)]);
    let elected = h2.elect_after_cooldown();
    assert_eq!(elected, vec![addr(b), addr(c)]);
    assert!(!elected.contains(&addr(a)));
}

#[test]
fn election_before_cooldown_is_rejected() {
    let h = Harness::plain();
    h.stake_all(&[(1, 1)]);
    h.clock.advance(WEEK - 1);

    let err = h.service.elect_validators(addr(9)).unwrap_err();
    match &err {
        DposError::Election(ElectionError::ElectionNotDue { next_due, .. }) => {
            assert_eq!(next_due.as_secs(), GENESIS + WEEK);
        }
        other => panic!("expected ElectionNotDue, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::TimingGate);
    assert!(h.service.current_validators().is_empty());
    assert_eq!(h.service.seconds_until_election(), 1);
}

#[test]
fn second_election_within_cooldown_keeps_set() {
    let h = Harness::plain();
    h.stake_all(&[(1, 4), (2, 2)]);
    let first = h.elect_after_cooldown();

    h.stake_all(&[(3, 100)]);
    h.clock.advance(WEEK / 2);
    assert!(h.service.elect_validators(addr(9)).is_err());
    assert_eq!(h.service.current_validators(), first);

    h.clock.advance(WEEK / 2);
    h.service.elect_validators(addr(9)).unwrap();
    assert_eq!(h.service.current_validators()[0], addr(3));
}

#[test]
fn more_than_max_delegates_elects_top_21() {
    let h = Harness::plain();
    let stakes: Vec<(u64, u128)> = (1..=30).map(|i| (i, (i as u128 * 7) % 11 + 1)).collect();
    h.stake_all(&stakes);
    let elected = h.elect_after_cooldown();
    assert_eq!(elected.len(), 21);

    let min_elected = elected
        .iter()
        .map(|a| h.service.delegate_total_staked(a))
        .min()
        .unwrap();
    for (delegate, _) in &stakes {
        if !elected.contains(&addr(*delegate)) {
            assert!(h.service.delegate_total_staked(&addr(*delegate)) <= min_elected);
        }
    }
}

#[test]
fn election_with_no_delegates_yields_empty_set() {
    let h = Harness::plain();
    assert!(h.elect_after_cooldown().is_empty());
}

#[test]
fn owner_only_election_access() {
    let h = Harness::new(NodeConfig {
        election_access: ElectionAccess::OwnerOnly,
        ..NodeConfig::default()
    });
    h.stake_all(&[(1, 1)]);
    h.clock.advance(WEEK);
    let err = h.service.elect_validators(addr(9)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    h.service.elect_validators(h.owner()).unwrap();
    assert_eq!(h.service.current_validators(), vec![addr(1)]);
}

#[test]
fn registered_candidate_without_stake_is_elected() {
    let h = Harness::plain();
    assert!(h.service.register_candidate(addr(9), addr(0x55)).is_err());
    let events = h.service.register_candidate(h.owner(), addr(0x55)).unwrap();
    assert_eq!(events, vec![DposEvent::CandidateRegistered { delegate: addr(0x55) }]);
    assert!(h.service.register_candidate(h.owner(), addr(0x55)).unwrap().is_empty());

    h.stake_all(&[(1, 1)]);
    assert_eq!(h.elect_after_cooldown(), vec![addr(1), addr(0x55)]);
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[test]
fn rewards_split_proportionally_to_stake() {
    let h = Harness::plain();
    h.stake_all(&[(1, 5), (2, 3), (3, 2)]);
    h.elect_after_cooldown();
    let treasury_before = h.token.balance_of(&h.config.treasury);

    let events = h.service.distribute_rewards(h.owner()).unwrap();
    match &events[0] {
        DposEvent::RewardsDistributed {
            round,
            distributed,
            remainder,
            ..
        } => {
            assert_eq!(*round, 1);
            assert_eq!(*distributed, tokens(1000));
            assert_eq!(*remainder, TokenAmount::ZERO);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(rewards_of(&h.service, addr(1)), tokens(500));
    assert_eq!(rewards_of(&h.service, addr(2)), tokens(300));
    assert_eq!(rewards_of(&h.service, addr(3)), tokens(200));
    assert_eq!(
        h.token.balance_of(&h.config.treasury),
        treasury_before.saturating_sub(tokens(1000))
    );
    h.service.audit().unwrap();
}

#[test]
fn rounding_remainder_stays_in_treasury() {
    let h = Harness::new(NodeConfig {
        params: DposParams {
            reward_pool: TokenAmount::new(1000),
            ..DposParams::default()
        },
        ..NodeConfig::default()
    });
    h.stake_all(&[(1, 1), (2, 1), (3, 1)]);
    h.elect_after_cooldown();
    let treasury_before = h.token.balance_of(&h.config.treasury);

    h.service.distribute_rewards(h.owner()).unwrap();
    for delegate in 1..=3 {
        assert_eq!(rewards_of(&h.service, addr(delegate)), TokenAmount::new(333));
    }
    assert_eq!(
        treasury_before.saturating_sub(h.token.balance_of(&h.config.treasury)),
        TokenAmount::new(999)
    );
}

#[test]
fn distribution_requires_owner_and_validators() {
    let h = Harness::plain();
    let err = h.service.distribute_rewards(addr(9)).unwrap_err();
    assert!(matches!(err, DposError::Unauthorized { .. }));

    let err = h.service.distribute_rewards(h.owner()).unwrap_err();
    assert!(matches!(
        err,
        DposError::Reward(RewardError::EmptyValidatorSet)
    ));
}

#[test]
fn distribution_with_all_stake_withdrawn_fails() {
    let h = Harness::plain();
    h.stake_all(&[(1, 1)]);
    h.elect_after_cooldown();
    h.service.unstake(addr(1), addr(1), tokens(1)).unwrap();
    let err = h.service.distribute_rewards(h.owner()).unwrap_err();
    assert!(matches!(err, DposError::Reward(RewardError::NoElectedStake)));
}

#[test]
fn failed_reward_transfer_credits_nothing() {
    let h = Harness::plain();
    h.stake_all(&[(1, 5), (2, 5)]);
    h.elect_after_cooldown();
    h.token.fail_next_transfer(TokenError::InsufficientBalance {
        account: h.config.treasury,
        needed: tokens(1000),
        available: TokenAmount::ZERO,
    });

    assert!(h.service.distribute_rewards(h.owner()).is_err());
    assert_eq!(rewards_of(&h.service, addr(1)), TokenAmount::ZERO);
    assert_eq!(rewards_of(&h.service, addr(2)), TokenAmount::ZERO);
    assert_eq!(h.service.read(|s| s.rewards().rounds()), 0);

    // One transfer per distribution, for the exact sum.
    h.token.clear_calls();
    h.service.distribute_rewards(h.owner()).unwrap();
    assert_eq!(
        h.token.calls(),
        vec![GatewayCall::TransferFrom {
            spender: h.config.custody,
            from: h.config.treasury,
            to: h.config.custody,
            amount: tokens(1000),
        }]
    );
}

#[test]
fn treasury_balance_pool_source() {
    let config = NodeConfig {
        reward_pool_source: RewardPoolSource::TreasuryBalance,
        ..NodeConfig::default()
    };
    let h = Harness::new(config);
    h.token
        .approve(&h.config.treasury, &h.config.custody, tokens(40))
        .unwrap();
    h.stake_all(&[(1, 1), (2, 1)]);
    h.elect_after_cooldown();

    h.service.distribute_rewards(h.owner()).unwrap();
    assert_eq!(rewards_of(&h.service, addr(1)), tokens(20));
    assert_eq!(h.token.allowance(&h.config.treasury, &h.config.custody), TokenAmount::ZERO);
    let err = h.service.distribute_rewards(h.owner()).unwrap_err();
    assert!(matches!(err, DposError::Reward(RewardError::EmptyPool)));
}

#[test]
fn claim_pays_out_unclaimed_rewards_once() {
    let h = Harness::plain();
    h.stake_all(&[(1, 5), (2, 5)]);
    h.elect_after_cooldown();
    h.service.distribute_rewards(h.owner()).unwrap();

    let events = h.service.claim_rewards(addr(1)).unwrap();
    assert_eq!(
        events,
        vec![DposEvent::RewardsClaimed {
            delegate: addr(1),
            amount: tokens(500),
        }]
    );
    assert_eq!(h.token.balance_of(&addr(1)), tokens(500));

    let err = h.service.claim_rewards(addr(1)).unwrap_err();
    assert!(matches!(err, DposError::Reward(RewardError::NothingToClaim(_))));
    h.service.audit().unwrap();
    assert_eq!(h.custody_balance(), tokens(510));
}

// ---------------------------------------------------------------------------
// Data verification
// ---------------------------------------------------------------------------

#[test]
fn duplicate_submission_is_rejected() {
    let h = Harness::plain();
    let hash = DataHash::digest(b"pothole@zone-a");
    h.service.submit_data(addr(0xCA), hash, metadata(), None).unwrap();

    let err = h
        .service
        .submit_data(addr(0xCB), hash, metadata(), None)
        .unwrap_err();
    assert!(matches!(
        err,
        DposError::Registry(RegistryError::DuplicateSubmission(_))
    ));
    assert_eq!(h.service.all_data().len(), 1);
    assert_eq!(h.service.data_record(&hash).unwrap().submitter, addr(0xCA));
}

#[test]
fn submission_validates_metadata_json() {
    let h = Harness::plain();
    let hash = DataHash::digest(b"fog");
    let err = h
        .service
        .submit_data_json(addr(0xCA), hash, r#"{"eventType":"Fog"}"#, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputValidation);

    h.service
        .submit_data_json(
            addr(0xCA),
            hash,
            r#"{"version":1,"eventType":"Fog","vehicleId":"CAR-1"}"#,
            Some("QmFog".to_string()),
        )
        .unwrap();
    let record = h.service.data_record(&hash).unwrap();
    assert_eq!(record.metadata.event_type, "Fog");
    assert_eq!(record.ipfs_hash.as_deref(), Some("QmFog"));
}

#[test]
fn only_elected_validators_verify_by_default() {
    let h = Harness::plain();
    h.stake_all(&[(1, 5)]);
    h.elect_after_cooldown();
    let hash = DataHash::digest(b"event");
    h.service.submit_data(addr(0xCA), hash, metadata(), None).unwrap();

    let err = h.service.verify_data(addr(0xCA), hash, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let events = h.service.verify_data(addr(1), hash, true).unwrap();
    assert_eq!(
        events,
        vec![DposEvent::DataVerified {
            data_hash: hash,
            verifier: addr(1),
            status: DataStatus::Verified,
        }]
    );

    let err = h.service.verify_data(addr(1), hash, true).unwrap_err();
    assert!(matches!(
        err,
        DposError::Registry(RegistryError::AlreadyVerified {
            status: DataStatus::Verified,
            ..
        })
    ));
    let record = h.service.data_record(&hash).unwrap();
    assert_eq!(record.verified_by, Some(addr(1)));
    assert_eq!(record.verified_at.unwrap().as_secs(), GENESIS + WEEK);
}

#[test]
fn verify_unknown_hash_is_not_found() {
    let h = Harness::plain();
    let err = h
        .service
        .verify_data(addr(1), DataHash::digest(b"nothing"), true)
        .unwrap_err();
    assert!(matches!(err, DposError::Registry(RegistryError::NotFound(_))));
}

#[test]
fn configurable_verifier_policies() {
    let open = Harness::new(NodeConfig {
        verifier_policy: VerifierPolicy::Anyone,
        ..NodeConfig::default()
    });
    let hash = DataHash::digest(b"a");
    open.service.submit_data(addr(0xCA), hash, metadata(), None).unwrap();
    open.service.verify_data(addr(0xCA), hash, false).unwrap();
    assert_eq!(
        open.service.data_record(&hash).unwrap().status,
        DataStatus::Rejected
    );

    let registered = Harness::new(NodeConfig {
        verifier_policy: VerifierPolicy::RegisteredVerifiers,
        ..NodeConfig::default()
    });
    registered
        .service
        .submit_data(addr(0xCA), hash, metadata(), None)
        .unwrap();
    assert!(registered.service.verify_data(addr(0x77), hash, true).is_err());
    assert!(registered.service.register_verifier(addr(9), addr(0x77)).is_err());
    registered
        .service
        .register_verifier(registered.owner(), addr(0x77))
        .unwrap();
    registered.service.verify_data(addr(0x77), hash, true).unwrap();
}

// ---------------------------------------------------------------------------
// Events, metrics, snapshots
// ---------------------------------------------------------------------------

#[test]
fn subscribers_receive_events_in_order() {
    let h = Harness::plain();
    let mut rx = h.service.subscribe();
    h.stake(addr(0x100), addr(0xB), tokens(1)).unwrap();
    h.service
        .unstake(addr(0x100), addr(0xB), tokens(1))
        .unwrap();

    let names: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.name())
        .collect();
    assert_eq!(names, vec!["candidate_registered", "staked", "unstaked"]);
    assert_eq!(h.service.metrics().stakes.get(), 1);
    assert_eq!(h.service.metrics().delegate_count.get(), 1);
}

#[test]
fn snapshot_restores_full_state() {
    let h = Harness::plain();
    h.stake_all(&[(1, 5), (2, 3)]);
    h.stake(addr(0x100), addr(2), tokens(1)).unwrap();
    h.elect_after_cooldown();
    h.service.distribute_rewards(h.owner()).unwrap();
    let hash = DataHash::digest(b"snap");
    h.service.submit_data(addr(0xCA), hash, metadata(), None).unwrap();

    let bytes = h.service.snapshot_bytes().unwrap();
    let restored = DposService::restore(
        Arc::clone(&h.token),
        &h.config,
        &bytes,
        h.clock.clone(),
    )
    .unwrap();

    assert_eq!(restored.current_validators(), h.service.current_validators());
    assert_eq!(restored.delegate_total_staked(&addr(2)), tokens(4));
    assert_eq!(restored.delegator_stake(&addr(2), &addr(0x100)), tokens(1));
    assert_eq!(
        rewards_of(&restored, addr(1)),
        rewards_of(&h.service, addr(1))
    );
    assert_eq!(restored.all_data(), h.service.all_data());
    assert_eq!(restored.next_election_due(), h.service.next_election_due());
    restored.audit().unwrap();

    // Cooldown survives the restart.
    assert!(restored.elect_validators(addr(9)).is_err());
}

#[test]
fn snapshot_with_repeated_validator_is_rejected() {
    let h = Harness::plain();
    h.stake_all(&[(1, 100), (2, 100)]);
    h.elect_after_cooldown();

    let mut snapshot = h.service.snapshot();
    let mut members = snapshot.election.validators.members().to_vec();
    members.push(members[0]);
    snapshot.election.validators = ValidatorSet::new(members);

    let err = DposService::restore(
        Arc::clone(&h.token),
        &h.config,
        &snapshot.to_bytes().unwrap(),
        h.clock.clone(),
    )
    .err()
    .unwrap();
    assert!(matches!(
        err,
        DposError::Election(ElectionError::DuplicateValidator(_))
    ));
}

#[test]
fn snapshot_with_oversized_set_is_rejected() {
    let h = Harness::plain();
    h.stake_all(&[(1, 100), (2, 100), (3, 100)]);
    h.elect_after_cooldown();
    let bytes = h.service.snapshot_bytes().unwrap();

    let smaller = NodeConfig {
        params: DposParams {
            max_validators: 2,
            ..DposParams::default()
        },
        ..NodeConfig::default()
    };
    let err = DposService::restore(Arc::clone(&h.token), &smaller, &bytes, h.clock.clone())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        DposError::Election(ElectionError::OversizedSet { size: 3, max: 2 })
    ));
}

#[test]
fn corrupt_snapshot_is_rejected() {
    let h = Harness::plain();
    let err = DposService::restore(
        Arc::clone(&h.token),
        &h.config,
        &[0xde, 0xad, 0xbe, 0xef],
        h.clock.clone(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, DposError::Snapshot(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}
