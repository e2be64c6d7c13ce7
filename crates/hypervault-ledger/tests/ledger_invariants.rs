//! Property tests for share ledger solvency.
//!
//! Random sequences of deposits, withdrawals and yield reports must never
//! leave the vault owing more than it holds.

use alloy_primitives::{Address, I256, U256};
use hypervault_ledger::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Deposit { who: u8, assets: u64 },
    WithdrawAssets { who: u8, assets: u64 },
    WithdrawShares { who: u8, shares: u64 },
    Report { bps: u64 },
}

fn depositor(who: u8) -> Address {
    Address::repeat_byte(who % 4 + 1)
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<u8>(), 1u64..10_000_000_000).prop_map(|(who, assets)| Op::Deposit { who, assets }),
        (any::<u8>(), 1u64..10_000_000_000)
            .prop_map(|(who, assets)| Op::WithdrawAssets { who, assets }),
        (any::<u8>(), 1u64..10_000_000_000)
            .prop_map(|(who, shares)| Op::WithdrawShares { who, shares }),
        // 50% .. 150% of current assets
        (5_000u64..=15_000).prop_map(|bps| Op::Report { bps }),
    ]
}

fn apply(ledger: &mut ShareLedger, op: &Op) {
    // Rejected operations are part of the input space; only the
    // invariants after each step matter.
    match *op {
        Op::Deposit { who, assets } => {
            let _ = ledger.deposit(depositor(who), U256::from(assets));
        }
        Op::WithdrawAssets { who, assets } => {
            let _ = ledger.withdraw_by_assets(depositor(who), U256::from(assets));
        }
        Op::WithdrawShares { who, shares } => {
            let _ = ledger.withdraw_by_shares(depositor(who), U256::from(shares));
        }
        Op::Report { bps } => {
            let total = ledger.total_assets() * U256::from(bps) / U256::from(10_000u64);
            ledger.apply_total_assets(total);
        }
    }
}

fn claims(ledger: &ShareLedger) -> U256 {
    (1u8..=4)
        .map(|b| ledger.user_assets(&Address::repeat_byte(b)).unwrap())
        .fold(U256::ZERO, |acc, v| acc + v)
}

proptest! {
    /// Sum of redeemable claims never exceeds total assets.
    #[test]
    fn claims_never_exceed_assets(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = ShareLedger::new();
        for op in &ops {
            apply(&mut ledger, op);
            prop_assert!(
                claims(&ledger) <= ledger.total_assets(),
                "claims {} > assets {} after {:?}",
                claims(&ledger),
                ledger.total_assets(),
                op
            );
        }
    }

    /// Position shares always sum to total shares.
    #[test]
    fn shares_conserved(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = ShareLedger::new();
        for op in &ops {
            apply(&mut ledger, op);
            prop_assert!(ledger.audit().in_sync);
        }
    }

    /// Depositing and immediately redeeming never returns more than deposited.
    #[test]
    fn deposit_redeem_round_trip_favours_vault(
        seed in 1u64..1_000_000_000,
        yield_bps in 10_000u64..30_000,
        assets in 1u64..1_000_000_000,
    ) {
        let mut ledger = ShareLedger::new();
        ledger.deposit(depositor(0), U256::from(seed)).unwrap();
        ledger.apply_total_assets(U256::from(seed) * U256::from(yield_bps) / U256::from(10_000u64));

        if let Ok(shares) = ledger.deposit(depositor(1), U256::from(assets)) {
            let back = ledger.withdraw_by_shares(depositor(1), shares).unwrap();
            prop_assert!(back <= U256::from(assets));
        }
    }

    /// Shares burned for an asset withdrawal are worth at least the assets.
    #[test]
    fn withdraw_burns_enough_shares(
        deposit in 1_000u64..1_000_000_000,
        yield_bps in 5_000u64..30_000,
        fraction_bps in 1u64..=10_000,
    ) {
        let mut ledger = ShareLedger::new();
        ledger.deposit(depositor(0), U256::from(deposit)).unwrap();
        let total = U256::from(deposit) * U256::from(yield_bps) / U256::from(10_000u64);
        ledger.apply_total_assets(total);

        let assets = total * U256::from(fraction_bps) / U256::from(10_000u64);
        prop_assume!(!assets.is_zero());

        let shares = ledger.preview_withdraw(assets).unwrap();
        prop_assert!(ledger.preview_redeem(shares).unwrap() >= assets);
    }

    /// Yield percent is zero for anyone who never deposited.
    #[test]
    fn yield_percent_zero_without_deposit(ops in proptest::collection::vec(op_strategy(), 0..20)) {
        let mut ledger = ShareLedger::new();
        for op in &ops {
            apply(&mut ledger, op);
        }
        let stranger = Address::repeat_byte(0xee);
        prop_assert_eq!(ledger.user_yield_percent(&stranger).unwrap(), I256::ZERO);
    }

    /// Cost basis always sums to the ledger total.
    #[test]
    fn cost_basis_conserved(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = ShareLedger::new();
        for op in &ops {
            apply(&mut ledger, op);
            let sum = (1u8..=4)
                .map(|b| ledger.user_deposit(&Address::repeat_byte(b)))
                .fold(U256::ZERO, |acc, v| acc + v);
            prop_assert_eq!(sum, ledger.total_cost_basis());
        }
    }

    /// After a partial redemption, yield is remaining value minus remaining basis.
    #[test]
    fn partial_withdrawal_yield(
        deposit in 1_000u64..1_000_000_000,
        yield_bps in 5_000u64..30_000,
        fraction_bps in 1u64..10_000,
    ) {
        let mut ledger = ShareLedger::new();
        let who = depositor(0);
        ledger.deposit(who, U256::from(deposit)).unwrap();
        ledger.apply_total_assets(U256::from(deposit) * U256::from(yield_bps) / U256::from(10_000u64));

        let shares = U256::from(deposit) * U256::from(fraction_bps) / U256::from(10_000u64);
        prop_assume!(!shares.is_zero());
        ledger.withdraw_by_shares(who, shares).unwrap();

        let remaining = U256::from(deposit) - shares;
        // basis released rounds down, so what is left is never below the remaining shares
        prop_assert!(ledger.user_deposit(&who) >= remaining);
        prop_assert!(ledger.user_deposit(&who) <= remaining + U256::from(1u64));

        let value = ledger.user_assets(&who).unwrap();
        let basis = ledger.user_deposit(&who);
        let expected = if value >= basis {
            I256::try_from(value - basis).unwrap()
        } else {
            -I256::try_from(basis - value).unwrap()
        };
        prop_assert_eq!(ledger.user_yield(&who).unwrap(), expected);
    }
}

#[test]
fn partial_withdrawal_keeps_yield_on_remaining_shares() {
    let mut ledger = ShareLedger::new();
    let who = depositor(0);
    ledger.deposit(who, U256::from(100u64)).unwrap();
    ledger.apply_total_assets(U256::from(110u64));

    assert_eq!(ledger.withdraw_by_shares(who, U256::from(50u64)).unwrap(), U256::from(55u64));
    assert_eq!(ledger.user_deposit(&who), U256::from(50u64));
    assert_eq!(ledger.user_yield(&who).unwrap(), I256::try_from(5i64).unwrap());
}
