//! Balance record arithmetic for deposits and monthly installments.
//!
//! These are pure value types: applying or reversing a payment produces the
//! next balance snapshot without touching storage. The repositories persist
//! the snapshot inside the same database transaction that writes the
//! payment or annulment row.

use rust_decimal::Decimal;

use super::types::InstallmentState;

/// Snapshot of a security deposit's running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositBalance {
    /// The deposit cap agreed in the rental contract.
    pub total: Decimal,
    /// Sum of active payments minus reversed amounts.
    pub current_balance: Decimal,
}

impl DepositBalance {
    /// Applies a payment, incrementing the running balance.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Self {
        Self {
            total: self.total,
            current_balance: self.current_balance + amount,
        }
    }

    /// Reverses a previously applied payment.
    ///
    /// No floor is enforced here: an annulment rolls back exactly the
    /// original amount, whatever the running balance is.
    #[must_use]
    pub fn reverse(&self, amount: Decimal) -> Self {
        Self {
            total: self.total,
            current_balance: self.current_balance - amount,
        }
    }

    /// Returns true if a settlement of `returned + penalty` fits within
    /// the current balance.
    #[must_use]
    pub fn covers(&self, returned: Decimal, penalty: Decimal) -> bool {
        returned + penalty <= self.current_balance
    }
}

/// Snapshot of a monthly installment's paid amount and state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentBalance {
    /// The amount due for the period.
    pub amount_total: Decimal,
    /// The amount paid so far.
    pub amount_paid: Decimal,
    /// Current installment state.
    pub state: InstallmentState,
}

impl InstallmentBalance {
    /// Applies a payment.
    ///
    /// State only ever advances toward Paid: a partial payment leaves the
    /// current state untouched, a completing payment forces Paid.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Self {
        let amount_paid = self.amount_paid + amount;
        let state = if amount_paid >= self.amount_total {
            InstallmentState::Paid
        } else {
            self.state
        };

        Self {
            amount_total: self.amount_total,
            amount_paid,
            state,
        }
    }

    /// Reverses a previously applied payment.
    ///
    /// Unlike `apply`, the state is recomputed from the remaining totals,
    /// ignoring whatever state the installment carried before: covered
    /// means Paid, anything short of the total (zero included) means
    /// Pending. The asymmetry with `apply` is deliberate and must not be
    /// unified without product sign-off.
    #[must_use]
    pub fn reverse(&self, amount: Decimal) -> Self {
        let amount_paid = self.amount_paid - amount;
        let state = if amount_paid >= self.amount_total {
            InstallmentState::Paid
        } else {
            InstallmentState::Pending
        };

        Self {
            amount_total: self.amount_total,
            amount_paid,
            state,
        }
    }

    /// Returns true if the paid amount covers the total due.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.amount_paid >= self.amount_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn deposit(total: Decimal, current: Decimal) -> DepositBalance {
        DepositBalance {
            total,
            current_balance: current,
        }
    }

    fn installment(total: Decimal, paid: Decimal, state: InstallmentState) -> InstallmentBalance {
        InstallmentBalance {
            amount_total: total,
            amount_paid: paid,
            state,
        }
    }

    #[test]
    fn test_deposit_apply_then_reverse_restores_balance() {
        // Deposit(total=500000, currentBalance=0) -> apply 200000 -> reverse
        let d = deposit(dec!(500000), dec!(0));
        let applied = d.apply(dec!(200000));
        assert_eq!(applied.current_balance, dec!(200000));

        let reversed = applied.reverse(dec!(200000));
        assert_eq!(reversed.current_balance, dec!(0));
        assert_eq!(reversed.total, dec!(500000));
    }

    #[test]
    fn test_deposit_reverse_has_no_floor() {
        let d = deposit(dec!(500000), dec!(100000));
        let reversed = d.reverse(dec!(150000));
        assert_eq!(reversed.current_balance, dec!(-50000));
    }

    #[test]
    fn test_deposit_covers_settlement() {
        let d = deposit(dec!(500000), dec!(300000));
        assert!(d.covers(dec!(200000), dec!(100000)));
        assert!(d.covers(dec!(0), dec!(0)));
        assert!(!d.covers(dec!(200000), dec!(100001)));
    }

    #[test]
    fn test_partial_payment_leaves_state_unchanged() {
        let i = installment(dec!(100000), dec!(0), InstallmentState::Pending);
        let next = i.apply(dec!(40000));
        assert_eq!(next.amount_paid, dec!(40000));
        assert_eq!(next.state, InstallmentState::Pending);
    }

    #[test]
    fn test_completing_payment_forces_paid() {
        // MonthlyInstallment(amountTotal=100000, amountPaid=0, Pending)
        // -> apply 100000 -> Paid -> reverse -> amountPaid=0, Pending
        let i = installment(dec!(100000), dec!(0), InstallmentState::Pending);
        let paid = i.apply(dec!(100000));
        assert_eq!(paid.amount_paid, dec!(100000));
        assert_eq!(paid.state, InstallmentState::Paid);

        let reversed = paid.reverse(dec!(100000));
        assert_eq!(reversed.amount_paid, dec!(0));
        assert_eq!(reversed.state, InstallmentState::Pending);
    }

    #[test]
    fn test_overpayment_forces_paid() {
        let i = installment(dec!(100000), dec!(0), InstallmentState::Pending);
        let next = i.apply(dec!(120000));
        assert_eq!(next.amount_paid, dec!(120000));
        assert_eq!(next.state, InstallmentState::Paid);
    }

    #[test]
    fn test_apply_does_not_demote_state() {
        // A partial application never touches the state, whatever it is.
        let i = installment(dec!(100000), dec!(0), InstallmentState::Reversed);
        let next = i.apply(dec!(10000));
        assert_eq!(next.state, InstallmentState::Reversed);
    }

    #[test]
    fn test_reverse_recomputes_from_totals() {
        // Annulment on a Paid installment that leaves it short -> Pending.
        let i = installment(dec!(100000), dec!(150000), InstallmentState::Paid);
        let next = i.reverse(dec!(80000));
        assert_eq!(next.amount_paid, dec!(70000));
        assert_eq!(next.state, InstallmentState::Pending);
    }

    #[test]
    fn test_reverse_keeps_paid_when_still_covered() {
        let i = installment(dec!(100000), dec!(150000), InstallmentState::Paid);
        let next = i.reverse(dec!(50000));
        assert_eq!(next.amount_paid, dec!(100000));
        assert_eq!(next.state, InstallmentState::Paid);
    }

    #[test]
    fn test_reverse_collapses_reversed_to_pending() {
        // Recomputation ignores any prior intermediate state.
        let i = installment(dec!(100000), dec!(100000), InstallmentState::Reversed);
        let next = i.reverse(dec!(100000));
        assert_eq!(next.state, InstallmentState::Pending);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 0))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any sequence of applied amounts, the deposit balance equals
        /// the sum of active payments; reversing a subset leaves the sum of
        /// the remaining active payments.
        #[test]
        fn prop_deposit_balance_is_sum_of_active_payments(
            amounts in proptest::collection::vec(amount_strategy(), 1..10),
            annul_mask in proptest::collection::vec(any::<bool>(), 1..10),
        ) {
            let mut d = deposit(Decimal::new(10_000_000, 0), Decimal::ZERO);
            for amount in &amounts {
                d = d.apply(*amount);
            }

            let mut expected: Decimal = amounts.iter().copied().sum();
            for (amount, annul) in amounts.iter().zip(annul_mask.iter()) {
                if *annul {
                    d = d.reverse(*amount);
                    expected -= *amount;
                }
            }

            prop_assert_eq!(d.current_balance, expected);
        }

        /// Applying then reversing the same amount is the identity on the
        /// paid total.
        #[test]
        fn prop_installment_apply_reverse_roundtrip(
            total in amount_strategy(),
            paid in amount_strategy(),
            amount in amount_strategy(),
        ) {
            let i = installment(total, paid, InstallmentState::Pending);
            let roundtrip = i.apply(amount).reverse(amount);
            prop_assert_eq!(roundtrip.amount_paid, paid);
        }

        /// A completing application always yields Paid.
        #[test]
        fn prop_covering_payment_is_paid(
            total in amount_strategy(),
            amount in amount_strategy(),
        ) {
            prop_assume!(amount >= total);
            let i = installment(total, Decimal::ZERO, InstallmentState::Pending);
            prop_assert_eq!(i.apply(amount).state, InstallmentState::Paid);
        }

        /// A reversal that leaves the installment short always yields
        /// Pending, regardless of the starting state.
        #[test]
        fn prop_short_reversal_is_pending(
            total in amount_strategy(),
            amount in amount_strategy(),
        ) {
            prop_assume!(amount > Decimal::ZERO);
            for state in [InstallmentState::Pending, InstallmentState::Paid, InstallmentState::Reversed] {
                let i = installment(total, total, state);
                prop_assert_eq!(i.reverse(amount).state, InstallmentState::Pending);
            }
        }
    }
}
