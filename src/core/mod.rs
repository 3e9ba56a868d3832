mod allocation;
mod calculator;
mod engine;
mod error;
pub mod present;
mod reconcile;
mod types;

pub use allocation::{AllocationState, AllocationUpdate};
pub use calculator::{InvestmentForm, LoanForm, Outcome, ShippingForm};
pub use engine::{
    compute_investment, compute_loan, compute_lump_sum, compute_recurring,
    estimate_shipping_rates,
};
pub use error::{EngineError, Result};
pub use reconcile::{loan_input, lump_sum_principal, reconcile_down_payment, remaining_cash};
pub use types::{
    Carrier, DownPaymentSource, InvestmentInput, InvestmentMode, InvestmentResult, LoanContext,
    LoanInput, LoanResult, ReconciledDownPayment, ShippingQuote,
};
