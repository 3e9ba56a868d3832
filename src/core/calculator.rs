use tracing::{debug, warn};

use super::allocation::AllocationState;
use super::engine::{compute_investment, compute_loan, estimate_shipping_rates};
use super::error::{EngineError, Result};
use super::reconcile::{loan_input, lump_sum_principal, reconcile_down_payment};
use super::types::{
    DownPaymentSource, InvestmentInput, InvestmentMode, InvestmentResult, LoanContext,
    LoanResult, ReconciledDownPayment, ShippingQuote,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Empty,
    Populated(T),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Outcome::Populated(value) => Some(value),
            _ => None,
        }
    }

    fn record(&mut self, result: Result<T>) -> Result<T>
    where
        T: Clone,
    {
        *self = match &result {
            Ok(value) => Outcome::Populated(value.clone()),
            Err(err) => Outcome::Failed(err.to_string()),
        };
        result
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::Empty
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanForm {
    context: LoanContext,
    pub base_cost: f64,
    pub down_payment_percent: f64,
    pub annual_interest_percent: f64,
    pub term_years: f64,
    result: Outcome<LoanResult>,
}

impl LoanForm {
    pub fn mortgage() -> Self {
        Self::with_defaults(LoanContext::Mortgage)
    }

    pub fn car_loan() -> Self {
        Self::with_defaults(LoanContext::CarLoan)
    }

    pub fn for_context(context: LoanContext) -> Self {
        Self::with_defaults(context)
    }

    fn with_defaults(context: LoanContext) -> Self {
        let (annual_interest_percent, term_years) = match context {
            LoanContext::Mortgage => (7.5, 20.0),
            LoanContext::CarLoan => (5.5, 5.0),
        };
        Self {
            context,
            base_cost: 0.0,
            down_payment_percent: 20.0,
            annual_interest_percent,
            term_years,
            result: Outcome::Empty,
        }
    }

    pub fn context(&self) -> LoanContext {
        self.context
    }

    pub fn result(&self) -> &Outcome<LoanResult> {
        &self.result
    }

    /// Pulls the allocation into the displayed percentage. Call after the
    /// allocation or `base_cost` changes.
    pub fn sync_allocation(&mut self, state: &AllocationState) -> ReconciledDownPayment {
        let resolved = reconcile_down_payment(
            state,
            self.context,
            self.base_cost,
            self.down_payment_percent,
        );
        if resolved.source != DownPaymentSource::Percentage {
            self.down_payment_percent = resolved.percent;
        }
        resolved
    }

    pub fn calculate(&mut self, state: &AllocationState) -> Result<LoanResult> {
        let resolved = self.sync_allocation(state);
        let input = loan_input(
            resolved,
            self.base_cost,
            self.annual_interest_percent,
            self.term_years,
        );
        let result = compute_loan(&input);
        match &result {
            Ok(loan) => debug!(
                context = ?self.context,
                source = ?resolved.source,
                loan_amount = loan.loan_amount,
                monthly_payment = loan.monthly_payment,
                "loan calculated"
            ),
            Err(err) => warn!(context = ?self.context, %err, "loan input rejected"),
        }
        self.result.record(result)
    }

    pub fn reset(&mut self) {
        *self = Self::with_defaults(self.context);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentForm {
    mode: InvestmentMode,
    pub amount: f64,
    pub term_years: f64,
    pub annual_return_percent: f64,
    pub capital_gains_tax_percent: f64,
    pub inflation_percent: f64,
    result: Outcome<InvestmentResult>,
}

impl InvestmentForm {
    pub fn lump_sum() -> Self {
        Self::with_defaults(InvestmentMode::LumpSum)
    }

    pub fn recurring() -> Self {
        Self::with_defaults(InvestmentMode::Recurring)
    }

    pub fn for_mode(mode: InvestmentMode) -> Self {
        Self::with_defaults(mode)
    }

    fn with_defaults(mode: InvestmentMode) -> Self {
        Self {
            mode,
            amount: 0.0,
            term_years: 1.0,
            annual_return_percent: 0.0,
            capital_gains_tax_percent: 0.0,
            inflation_percent: 0.0,
            result: Outcome::Empty,
        }
    }

    pub fn mode(&self) -> InvestmentMode {
        self.mode
    }

    pub fn result(&self) -> &Outcome<InvestmentResult> {
        &self.result
    }

    pub fn sync_allocation(&mut self, state: &AllocationState) {
        if self.mode == InvestmentMode::LumpSum {
            self.amount = lump_sum_principal(state, self.amount);
        }
    }

    pub fn input(&self) -> InvestmentInput {
        InvestmentInput {
            mode: self.mode,
            amount: self.amount,
            term_years: self.term_years,
            annual_return_percent: self.annual_return_percent,
            capital_gains_tax_percent: self.capital_gains_tax_percent,
            inflation_percent: self.inflation_percent,
        }
    }

    pub fn calculate(&mut self, state: &AllocationState) -> Result<InvestmentResult> {
        self.sync_allocation(state);
        let result = compute_investment(&self.input());
        match &result {
            Ok(investment) => debug!(
                mode = ?self.mode,
                ending_value = investment.ending_value,
                value_after_tax = investment.value_after_tax,
                "investment calculated"
            ),
            Err(err) => warn!(mode = ?self.mode, %err, "investment input rejected"),
        }
        self.result.record(result)
    }

    pub fn reset(&mut self) {
        *self = Self::with_defaults(self.mode);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShippingForm {
    pub sender_address: String,
    pub destination_address: String,
    pub shipping_date: String,
    pub weight: f64,
    result: Outcome<Vec<ShippingQuote>>,
}

impl ShippingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(&self) -> &Outcome<Vec<ShippingQuote>> {
        &self.result
    }

    fn validate_addresses(&self) -> Result<()> {
        for (field, value) in [
            ("senderAddress", &self.sender_address),
            ("destinationAddress", &self.destination_address),
            ("shippingDate", &self.shipping_date),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::invalid(field, "is required"));
            }
        }
        Ok(())
    }

    pub fn calculate(&mut self) -> Result<Vec<ShippingQuote>> {
        let result = self
            .validate_addresses()
            .and_then(|()| estimate_shipping_rates(self.weight));
        if let Err(err) = &result {
            warn!(%err, "shipping request rejected");
        }
        self.result.record(result)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
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

    #[test]
    fn forms_start_empty_with_page_defaults() {
        let mortgage = LoanForm::mortgage();
        assert!(mortgage.result().is_empty());
        assert_approx(mortgage.down_payment_percent, 20.0);
        assert_approx(mortgage.annual_interest_percent, 7.5);
        assert_approx(mortgage.term_years, 20.0);

        let car = LoanForm::car_loan();
        assert_approx(car.annual_interest_percent, 5.5);
        assert_approx(car.term_years, 5.0);

        let sip = InvestmentForm::recurring();
        assert!(sip.result().is_empty());
        assert_approx(sip.term_years, 1.0);
        assert_approx(sip.annual_return_percent, 0.0);
    }

    #[test]
    fn mortgage_form_populates_and_resets() {
        let state = AllocationState::new();
        let mut form = LoanForm::mortgage();
        form.base_cost = 500_000.0;
        form.annual_interest_percent = 8.5;

        let loan = form.calculate(&state).expect("valid mortgage");
        assert_approx(loan.loan_amount, 400_000.0);
        assert_eq!(form.result().populated(), Some(&loan));

        form.reset();
        assert_eq!(form, LoanForm::mortgage());
    }

    #[test]
    fn sync_allocation_rewrites_displayed_percent() {
        let mut state = AllocationState::new();
        state.set_down_payment_amount(100_000.0).expect("valid amount");

        let mut form = LoanForm::mortgage();
        form.sync_allocation(&state);
        assert_approx(form.down_payment_percent, 20.0);

        form.base_cost = 400_000.0;
        form.sync_allocation(&state);
        assert_approx(form.down_payment_percent, 25.0);

        state.set_down_payment_amount(0.0).expect("valid amount");
        form.down_payment_percent = 10.0;
        form.sync_allocation(&state);
        assert_approx(form.down_payment_percent, 10.0);
    }

    #[test]
    fn car_form_reads_allocation_at_calculation_time() {
        let mut state = AllocationState::new();
        let mut form = LoanForm::car_loan();
        form.base_cost = 30_000.0;

        state.set_cash_on_hand(9_000.0).expect("valid cash");
        state.set_use_remainder_for_car_down_payment(true);
        let first = form.calculate(&state).expect("valid car loan");
        assert_approx(first.down_payment, 9_000.0);
        assert_approx(form.down_payment_percent, 30.0);

        state.set_cash_on_hand(12_000.0).expect("valid cash");
        let second = form.calculate(&state).expect("valid car loan");
        assert_approx(second.down_payment, 12_000.0);
        assert_approx(form.down_payment_percent, 40.0);
    }

    #[test]
    fn failed_calculation_is_recorded_not_panicking() {
        let mut state = AllocationState::new();
        state.set_car_down_payment_amount(50_000.0).expect("valid amount");

        let mut form = LoanForm::car_loan();
        form.base_cost = 20_000.0;
        let err = form.calculate(&state).expect_err("down payment above cost");
        assert_eq!(err.field(), "downPayment");
        assert!(matches!(form.result(), Outcome::Failed(msg) if msg.contains("down payment")));
    }

    #[test]
    fn lump_sum_form_uses_remaining_cash() {
        let mut state = AllocationState::new();
        state.set_cash_on_hand(150_000.0).expect("valid cash");
        state.set_down_payment_amount(50_000.0).expect("valid amount");
        state.set_use_remainder_for_investment(true);

        let mut form = InvestmentForm::lump_sum();
        form.term_years = 10.0;
        form.annual_return_percent = 12.0;
        form.capital_gains_tax_percent = 10.0;
        let result = form.calculate(&state).expect("valid investment");
        assert_approx(form.amount, 100_000.0);
        assert_approx(result.total_invested, 100_000.0);

        form.reset();
        assert_eq!(form, InvestmentForm::lump_sum());
    }

    #[test]
    fn recurring_form_ignores_remainder_flag() {
        let mut state = AllocationState::new();
        state.set_cash_on_hand(150_000.0).expect("valid cash");
        state.set_use_remainder_for_investment(true);

        let mut form = InvestmentForm::recurring();
        form.amount = 250.0;
        form.calculate(&state).expect("valid investment");
        assert_approx(form.amount, 250.0);
    }

    #[test]
    fn shipping_form_requires_every_field() {
        let mut form = ShippingForm::new();
        form.weight = 4.0;
        form.sender_address = "12 King St, Toronto".to_string();
        form.destination_address = "  ".to_string();
        form.shipping_date = "2026-10-20".to_string();
        let err = form.calculate().expect_err("destination missing");
        assert_eq!(err.field(), "destinationAddress");

        form.destination_address = "1 Main St, Ottawa".to_string();
        let quotes = form.calculate().expect("complete form");
        assert_eq!(quotes.len(), 5);
        assert_eq!(quotes[0].carrier_name, "Canada Post");

        form.reset();
        assert!(form.result().is_empty());
        assert!(form.sender_address.is_empty());
    }
}
