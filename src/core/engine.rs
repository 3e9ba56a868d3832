use super::error::{
    EngineError, Result, require_non_negative, require_percent, require_positive,
};
use super::types::{
    Carrier, InvestmentInput, InvestmentMode, InvestmentResult, LoanInput, LoanResult,
    ShippingQuote,
};

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn compute_loan(input: &LoanInput) -> Result<LoanResult> {
    let base = require_non_negative("principalBase", input.principal_base)?;
    let percent = require_percent("downPaymentPercent", input.down_payment_percent)?;
    let absolute = require_non_negative("downPaymentAbsolute", input.down_payment_absolute)?;
    let annual_interest =
        require_non_negative("annualInterestPercent", input.annual_interest_percent)?;
    let term_years = require_positive("termYears", input.term_years)?;

    // Nothing to finance yet; the form has no cost entered.
    if base == 0.0 {
        return Ok(LoanResult::zero());
    }

    let down_payment = if absolute > 0.0 {
        absolute
    } else {
        base * (percent / 100.0)
    };
    let loan_amount = base - down_payment;
    if loan_amount <= 0.0 {
        return Err(EngineError::invalid(
            "downPayment",
            format!("down payment {down_payment:.2} must be less than the cost {base:.2}"),
        ));
    }

    let monthly_rate = annual_interest / 100.0 / MONTHS_PER_YEAR;
    let periods = term_years * MONTHS_PER_YEAR;
    let monthly_payment = level_payment(loan_amount, monthly_rate, periods);
    let total_payment = monthly_payment * periods;
    let total_interest = total_payment - loan_amount;
    let effective_rate_percent = (total_payment / loan_amount - 1.0) * 100.0;

    ensure_finite(LoanResult {
        down_payment,
        loan_amount,
        monthly_payment,
        total_payment,
        total_interest,
        effective_rate_percent,
    })
}

fn level_payment(principal: f64, rate: f64, periods: f64) -> f64 {
    if rate == 0.0 {
        return principal / periods;
    }
    let growth = (1.0 + rate).powf(periods);
    if growth <= 1.0 {
        return principal / periods;
    }
    principal * rate * growth / (growth - 1.0)
}

pub fn compute_investment(input: &InvestmentInput) -> Result<InvestmentResult> {
    match input.mode {
        InvestmentMode::LumpSum => compute_lump_sum(input),
        InvestmentMode::Recurring => compute_recurring(input),
    }
}

pub fn compute_lump_sum(input: &InvestmentInput) -> Result<InvestmentResult> {
    let principal = require_non_negative("principal", input.amount)?;
    let rates = GrowthRates::validate(input)?;

    let ending_value = principal * (1.0 + rates.annual_return).powf(rates.term_years);
    let gross_profit = ending_value - principal;
    let value_after_tax = principal + gross_profit * (1.0 - rates.tax);
    let net_profit = value_after_tax - principal;
    let annualized = if principal > 0.0 && rates.term_years > 0.0 {
        (ending_value / principal).powf(1.0 / rates.term_years) - 1.0
    } else {
        0.0
    };

    ensure_finite(rates.finish(
        principal,
        ending_value,
        gross_profit,
        value_after_tax,
        net_profit,
        annualized,
    ))
}

/// Monthly contributions paid at the start of each month, compounded monthly.
/// `input.mode` is not consulted.
///
/// The annualized return is an approximation: contributions are treated as if
/// half the total had been invested for `term_years - 0.5` years. It is not a
/// money-weighted rate of return and should only be shown as an estimate.
pub fn compute_recurring(input: &InvestmentInput) -> Result<InvestmentResult> {
    let contribution = require_non_negative("periodicContribution", input.amount)?;
    let rates = GrowthRates::validate(input)?;

    let monthly_rate = rates.annual_return / MONTHS_PER_YEAR;
    let periods = rates.term_years * MONTHS_PER_YEAR;
    let total_invested = contribution * periods;
    let ending_value = if monthly_rate > 0.0 {
        contribution * (((1.0 + monthly_rate).powf(periods) - 1.0) / monthly_rate)
            * (1.0 + monthly_rate)
    } else {
        total_invested
    };
    let gross_profit = ending_value - total_invested;
    let value_after_tax = total_invested + gross_profit * (1.0 - rates.tax);
    let net_profit = value_after_tax - total_invested;

    let approx_years = rates.term_years - 0.5;
    let annualized = if approx_years > 0.0 && total_invested > 0.0 {
        (value_after_tax / (total_invested / 2.0)).powf(1.0 / approx_years) - 1.0
    } else {
        0.0
    };

    ensure_finite(rates.finish(
        total_invested,
        ending_value,
        gross_profit,
        value_after_tax,
        net_profit,
        annualized,
    ))
}

#[derive(Debug, Clone, Copy)]
struct GrowthRates {
    term_years: f64,
    annual_return: f64,
    tax: f64,
    inflation: f64,
}

impl GrowthRates {
    fn validate(input: &InvestmentInput) -> Result<Self> {
        Ok(Self {
            term_years: require_positive("termYears", input.term_years)?,
            annual_return: require_non_negative("annualReturnPercent", input.annual_return_percent)?
                / 100.0,
            tax: require_percent("capitalGainsTaxPercent", input.capital_gains_tax_percent)?
                / 100.0,
            inflation: require_non_negative("inflationPercent", input.inflation_percent)? / 100.0,
        })
    }

    fn finish(
        self,
        total_invested: f64,
        ending_value: f64,
        gross_profit: f64,
        value_after_tax: f64,
        net_profit: f64,
        annualized: f64,
    ) -> InvestmentResult {
        let present_value = value_after_tax / (1.0 + self.inflation).powf(self.term_years);
        let real_return = (1.0 + annualized) / (1.0 + self.inflation) - 1.0;
        InvestmentResult {
            total_invested,
            ending_value,
            gross_profit,
            value_after_tax,
            net_profit,
            annualized_return_percent: annualized * 100.0,
            inflation_adjusted_present_value: present_value,
            real_return_percent: real_return * 100.0,
        }
    }
}

pub fn estimate_shipping_rates(weight: f64) -> Result<Vec<ShippingQuote>> {
    let weight = require_positive("weight", weight)?;
    Carrier::ALL
        .iter()
        .map(|&carrier| {
            let (per_unit, flat_fee, estimated_days) = carrier.tariff();
            let rate = weight * per_unit + flat_fee;
            if !rate.is_finite() {
                return Err(EngineError::invalid("weight", "is too large to quote"));
            }
            Ok(ShippingQuote {
                carrier,
                carrier_name: carrier.name(),
                rate,
                estimated_days,
            })
        })
        .collect()
}

trait AllFinite {
    fn all_finite(&self) -> bool;
}

impl AllFinite for LoanResult {
    fn all_finite(&self) -> bool {
        [
            self.down_payment,
            self.loan_amount,
            self.monthly_payment,
            self.total_payment,
            self.total_interest,
            self.effective_rate_percent,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

impl AllFinite for InvestmentResult {
    fn all_finite(&self) -> bool {
        [
            self.total_invested,
            self.ending_value,
            self.gross_profit,
            self.value_after_tax,
            self.net_profit,
            self.annualized_return_percent,
            self.inflation_adjusted_present_value,
            self.real_return_percent,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

fn ensure_finite<T: AllFinite>(result: T) -> Result<T> {
    if result.all_finite() {
        Ok(result)
    } else {
        Err(EngineError::invalid("input", "values are too large to calculate"))
    }
}
