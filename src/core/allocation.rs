use serde::Serialize;

use super::error::{Result, require_non_negative};

/// Cash shared across the estimators of one session. Holds no derived values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationState {
    cash_on_hand: f64,
    down_payment_amount: f64,
    use_remainder_for_investment: bool,
    car_down_payment_amount: f64,
    use_remainder_for_car_down_payment: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AllocationUpdate {
    pub cash_on_hand: Option<f64>,
    pub down_payment_amount: Option<f64>,
    pub use_remainder_for_investment: Option<bool>,
    pub car_down_payment_amount: Option<f64>,
    pub use_remainder_for_car_down_payment: Option<bool>,
}

impl AllocationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cash_on_hand(&self) -> f64 {
        self.cash_on_hand
    }

    pub fn down_payment_amount(&self) -> f64 {
        self.down_payment_amount
    }

    pub fn use_remainder_for_investment(&self) -> bool {
        self.use_remainder_for_investment
    }

    pub fn car_down_payment_amount(&self) -> f64 {
        self.car_down_payment_amount
    }

    pub fn use_remainder_for_car_down_payment(&self) -> bool {
        self.use_remainder_for_car_down_payment
    }

    pub fn set_cash_on_hand(&mut self, value: f64) -> Result<()> {
        self.cash_on_hand = require_non_negative("cashOnHand", value)?;
        Ok(())
    }

    pub fn set_down_payment_amount(&mut self, value: f64) -> Result<()> {
        self.down_payment_amount = require_non_negative("downPaymentAmount", value)?;
        Ok(())
    }

    pub fn set_use_remainder_for_investment(&mut self, value: bool) {
        self.use_remainder_for_investment = value;
    }

    pub fn set_car_down_payment_amount(&mut self, value: f64) -> Result<()> {
        self.car_down_payment_amount = require_non_negative("carDownPaymentAmount", value)?;
        Ok(())
    }

    pub fn set_use_remainder_for_car_down_payment(&mut self, value: bool) {
        self.use_remainder_for_car_down_payment = value;
    }

    /// Validates every field of `update` before touching `self`, so a rejected
    /// update leaves the state exactly as it was.
    pub fn apply(&mut self, update: AllocationUpdate) -> Result<()> {
        let mut next = self.clone();
        if let Some(v) = update.cash_on_hand {
            next.set_cash_on_hand(v)?;
        }
        if let Some(v) = update.down_payment_amount {
            next.set_down_payment_amount(v)?;
        }
        if let Some(v) = update.use_remainder_for_investment {
            next.set_use_remainder_for_investment(v);
        }
        if let Some(v) = update.car_down_payment_amount {
            next.set_car_down_payment_amount(v)?;
        }
        if let Some(v) = update.use_remainder_for_car_down_payment {
            next.set_use_remainder_for_car_down_payment(v);
        }
        *self = next;
        Ok(())
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}
