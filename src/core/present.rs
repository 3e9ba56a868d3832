use super::types::{InvestmentResult, LoanResult, ShippingQuote};

/// Rounds to cents so float noise around zero never prints as "-0.00".
fn to_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn money(value: f64) -> String {
    let value = to_cents(value);
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", to_cents(value))
}

pub fn loan_lines(result: &LoanResult) -> Vec<String> {
    vec![
        format!("Down Payment: {}", money(result.down_payment)),
        format!("Loan Amount: {}", money(result.loan_amount)),
        format!("Monthly Payment: {}", money(result.monthly_payment)),
        format!("Total Payment: {}", money(result.total_payment)),
        format!("Total Interest: {}", money(result.total_interest)),
        format!("Effective Rate: {}", percent(result.effective_rate_percent)),
    ]
}

pub fn investment_lines(result: &InvestmentResult) -> Vec<String> {
    vec![
        format!("Total Invested: {}", money(result.total_invested)),
        format!("Value at End: {}", money(result.ending_value)),
        format!("Profit: {}", money(result.gross_profit)),
        format!("Value After Tax: {}", money(result.value_after_tax)),
        format!("Profit After Tax: {}", money(result.net_profit)),
        format!(
            "Annualized Return: {}",
            percent(result.annualized_return_percent)
        ),
        format!(
            "Present Value (inflation adjusted): {}",
            money(result.inflation_adjusted_present_value)
        ),
        format!("Real Rate of Return: {}", percent(result.real_return_percent)),
    ]
}

pub fn shipping_lines(quotes: &[ShippingQuote]) -> Vec<String> {
    quotes
        .iter()
        .map(|q| {
            format!(
                "{}: {} ({} business days)",
                q.carrier_name,
                money(q.rate),
                q.estimated_days
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute_loan;
    use crate::core::types::{Carrier, LoanInput};

    #[test]
    fn rounds_only_for_display() {
        assert_eq!(money(3_471.292_933), "$3471.29");
        assert_eq!(money(-0.5), "-$0.50");
        assert_eq!(percent(12.000_000_000_014), "12.00%");
    }

    #[test]
    fn float_noise_around_zero_is_unsigned() {
        assert_eq!(money(-1.455e-11), "$0.00");
        assert_eq!(money(-0.004), "$0.00");
        assert_eq!(percent(-1e-14), "0.00%");

        let result = compute_loan(&LoanInput {
            principal_base: 100_000.0,
            down_payment_percent: 0.0,
            down_payment_absolute: 0.0,
            annual_interest_percent: 0.0,
            term_years: 7.0,
        })
        .expect("zero rate is valid");
        let lines = loan_lines(&result);
        assert_eq!(lines[4], "Total Interest: $0.00");
        assert_eq!(lines[5], "Effective Rate: 0.00%");
    }

    #[test]
    fn loan_lines_follow_result_order() {
        let lines = loan_lines(&LoanResult {
            down_payment: 100_000.0,
            loan_amount: 400_000.0,
            monthly_payment: 3_471.2929,
            total_payment: 833_110.304,
            total_interest: 433_110.304,
            effective_rate_percent: 108.277_576,
        });
        assert_eq!(lines[0], "Down Payment: $100000.00");
        assert_eq!(lines[2], "Monthly Payment: $3471.29");
        assert_eq!(lines[5], "Effective Rate: 108.28%");
    }

    #[test]
    fn shipping_lines_name_each_carrier() {
        let lines = shipping_lines(&[ShippingQuote {
            carrier: Carrier::Usps,
            carrier_name: Carrier::Usps.name(),
            rate: 12.4,
            estimated_days: 4,
        }]);
        assert_eq!(lines, vec!["USPS: $12.40 (4 business days)".to_string()]);
    }
}
