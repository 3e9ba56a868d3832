use super::allocation::AllocationState;
use super::types::{DownPaymentSource, LoanContext, LoanInput, ReconciledDownPayment};

/// `None` when the context has no remainder flag or the flag is off.
pub fn remaining_cash(state: &AllocationState, context: LoanContext) -> Option<f64> {
    match context {
        LoanContext::Mortgage => None,
        LoanContext::CarLoan if state.use_remainder_for_car_down_payment() => {
            Some((state.cash_on_hand() - state.car_down_payment_amount()).max(0.0))
        }
        LoanContext::CarLoan => None,
    }
}

fn explicit_amount(state: &AllocationState, context: LoanContext) -> f64 {
    match context {
        LoanContext::Mortgage => state.down_payment_amount(),
        LoanContext::CarLoan => state.car_down_payment_amount(),
    }
}

fn percent_of(amount: f64, base_cost: f64, current_percent: f64) -> f64 {
    if base_cost > 0.0 {
        (amount / base_cost) * 100.0
    } else {
        current_percent
    }
}

pub fn reconcile_down_payment(
    state: &AllocationState,
    context: LoanContext,
    base_cost: f64,
    manual_percent: f64,
) -> ReconciledDownPayment {
    let explicit = explicit_amount(state, context);
    if explicit > 0.0 {
        return ReconciledDownPayment {
            amount: explicit,
            percent: percent_of(explicit, base_cost, manual_percent),
            source: DownPaymentSource::Absolute,
        };
    }

    if let Some(remaining) = remaining_cash(state, context) {
        return ReconciledDownPayment {
            amount: remaining,
            percent: percent_of(remaining, base_cost, manual_percent),
            source: DownPaymentSource::Remainder,
        };
    }

    ReconciledDownPayment {
        amount: base_cost * (manual_percent / 100.0),
        percent: manual_percent,
        source: DownPaymentSource::Percentage,
    }
}

/// Builds the loan input from a reconciled down payment. Absolute and
/// remainder amounts are passed through as absolute values so a down payment
/// above the cost is reported as such instead of as a bad percentage.
pub fn loan_input(
    reconciled: ReconciledDownPayment,
    base_cost: f64,
    annual_interest_percent: f64,
    term_years: f64,
) -> LoanInput {
    let (percent, absolute) = match reconciled.source {
        DownPaymentSource::Percentage => (reconciled.percent, 0.0),
        DownPaymentSource::Absolute | DownPaymentSource::Remainder => (0.0, reconciled.amount),
    };
    LoanInput {
        principal_base: base_cost,
        down_payment_percent: percent,
        down_payment_absolute: absolute,
        annual_interest_percent,
        term_years,
    }
}

pub fn lump_sum_principal(state: &AllocationState, entered: f64) -> f64 {
    if state.use_remainder_for_investment() {
        (state.cash_on_hand() - state.down_payment_amount()).max(0.0)
    } else {
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn state_with(cash: f64, house: f64, car: f64) -> AllocationState {
        let mut state = AllocationState::new();
        state.set_cash_on_hand(cash).expect("valid cash");
        state.set_down_payment_amount(house).expect("valid amount");
        state.set_car_down_payment_amount(car).expect("valid amount");
        state
    }

    #[test]
    fn absolute_amount_beats_remainder_flag() {
        let mut state = state_with(80_000.0, 0.0, 100_000.0);
        state.set_use_remainder_for_car_down_payment(true);

        let resolved = reconcile_down_payment(&state, LoanContext::CarLoan, 500_000.0, 5.0);
        assert_eq!(resolved.source, DownPaymentSource::Absolute);
        assert_approx(resolved.amount, 100_000.0);
        assert_approx(resolved.percent, 20.0);
    }

    #[test]
    fn mortgage_uses_house_down_payment() {
        let state = state_with(0.0, 100_000.0, 7_000.0);
        let resolved = reconcile_down_payment(&state, LoanContext::Mortgage, 500_000.0, 10.0);
        assert_eq!(resolved.source, DownPaymentSource::Absolute);
        assert_approx(resolved.amount, 100_000.0);
        assert_approx(resolved.percent, 20.0);
    }

    #[test]
    fn car_remainder_ignores_house_down_payment() {
        let mut state = state_with(10_000.0, 8_000.0, 0.0);
        state.set_use_remainder_for_car_down_payment(true);

        let resolved = reconcile_down_payment(&state, LoanContext::CarLoan, 40_000.0, 20.0);
        assert_eq!(resolved.source, DownPaymentSource::Remainder);
        assert_approx(resolved.amount, 10_000.0);
        assert_approx(resolved.percent, 25.0);
    }

    #[test]
    fn empty_cash_gives_zero_car_remainder() {
        let mut state = state_with(0.0, 35_000.0, 0.0);
        state.set_use_remainder_for_car_down_payment(true);

        assert_eq!(remaining_cash(&state, LoanContext::CarLoan), Some(0.0));
        let resolved = reconcile_down_payment(&state, LoanContext::CarLoan, 30_000.0, 20.0);
        assert_eq!(resolved.source, DownPaymentSource::Remainder);
        assert_approx(resolved.amount, 0.0);
        assert_approx(resolved.percent, 0.0);
    }

    #[test]
    fn mortgage_has_no_remainder() {
        let mut state = state_with(90_000.0, 0.0, 0.0);
        state.set_use_remainder_for_car_down_payment(true);
        state.set_use_remainder_for_investment(true);

        assert_eq!(remaining_cash(&state, LoanContext::Mortgage), None);
        let resolved = reconcile_down_payment(&state, LoanContext::Mortgage, 400_000.0, 25.0);
        assert_eq!(resolved.source, DownPaymentSource::Percentage);
        assert_approx(resolved.amount, 100_000.0);
        assert_approx(resolved.percent, 25.0);
    }

    #[test]
    fn zero_base_cost_keeps_percentage() {
        let state = state_with(0.0, 20_000.0, 0.0);
        let resolved = reconcile_down_payment(&state, LoanContext::Mortgage, 0.0, 20.0);
        assert_approx(resolved.amount, 20_000.0);
        assert_approx(resolved.percent, 20.0);
        assert!(resolved.percent.is_finite());
    }

    #[test]
    fn loan_input_passes_absolute_amounts_through() {
        let state = state_with(0.0, 600_000.0, 0.0);
        let resolved = reconcile_down_payment(&state, LoanContext::Mortgage, 500_000.0, 20.0);
        let input = loan_input(resolved, 500_000.0, 6.0, 25.0);
        assert_approx(input.down_payment_absolute, 600_000.0);
        assert_approx(input.down_payment_percent, 0.0);

        let manual = reconcile_down_payment(
            &AllocationState::new(),
            LoanContext::Mortgage,
            500_000.0,
            20.0,
        );
        let input = loan_input(manual, 500_000.0, 6.0, 25.0);
        assert_approx(input.down_payment_absolute, 0.0);
        assert_approx(input.down_payment_percent, 20.0);
    }

    #[test]
    fn lump_sum_follows_investment_flag() {
        let mut state = state_with(150_000.0, 100_000.0, 0.0);
        assert_approx(lump_sum_principal(&state, 7_500.0), 7_500.0);

        state.set_use_remainder_for_investment(true);
        assert_approx(lump_sum_principal(&state, 7_500.0), 50_000.0);

        state.set_down_payment_amount(200_000.0).expect("valid amount");
        assert_approx(lump_sum_principal(&state, 7_500.0), 0.0);
    }
}
