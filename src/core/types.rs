use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentMode {
    #[serde(alias = "lumpSum", alias = "lump_sum")]
    LumpSum,
    #[serde(alias = "monthly")]
    Recurring,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanContext {
    Mortgage,
    CarLoan,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownPaymentSource {
    Absolute,
    Remainder,
    Percentage,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Carrier {
    CanadaPost,
    #[serde(rename = "fedex")]
    FedEx,
    Purolator,
    Ups,
    Usps,
}

impl Carrier {
    pub const ALL: [Carrier; 5] = [
        Carrier::CanadaPost,
        Carrier::FedEx,
        Carrier::Purolator,
        Carrier::Ups,
        Carrier::Usps,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Carrier::CanadaPost => "Canada Post",
            Carrier::FedEx => "FedEx",
            Carrier::Purolator => "Purolator",
            Carrier::Ups => "UPS",
            Carrier::Usps => "USPS",
        }
    }

    /// `(per unit of weight, flat fee, business days)`.
    pub(crate) fn tariff(self) -> (f64, f64, u32) {
        match self {
            Carrier::CanadaPost => (2.5, 10.0, 3),
            Carrier::FedEx => (3.0, 15.0, 2),
            Carrier::Purolator => (2.8, 12.0, 2),
            Carrier::Ups => (3.2, 14.0, 2),
            Carrier::Usps => (2.2, 8.0, 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanInput {
    pub principal_base: f64,
    pub down_payment_percent: f64,
    /// Wins over `down_payment_percent` when greater than zero.
    pub down_payment_absolute: f64,
    pub annual_interest_percent: f64,
    pub term_years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    /// Total interest as a percentage of the loan amount over the whole term.
    pub effective_rate_percent: f64,
}

impl LoanResult {
    pub(crate) fn zero() -> Self {
        Self {
            down_payment: 0.0,
            loan_amount: 0.0,
            monthly_payment: 0.0,
            total_payment: 0.0,
            total_interest: 0.0,
            effective_rate_percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentInput {
    pub mode: InvestmentMode,
    pub amount: f64,
    pub term_years: f64,
    pub annual_return_percent: f64,
    pub capital_gains_tax_percent: f64,
    pub inflation_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentResult {
    pub total_invested: f64,
    pub ending_value: f64,
    pub gross_profit: f64,
    pub value_after_tax: f64,
    pub net_profit: f64,
    pub annualized_return_percent: f64,
    pub inflation_adjusted_present_value: f64,
    pub real_return_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub carrier: Carrier,
    pub carrier_name: &'static str,
    pub rate: f64,
    pub estimated_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledDownPayment {
    pub amount: f64,
    pub percent: f64,
    pub source: DownPaymentSource,
}
