use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finance_guru::core::{
    AllocationState, AllocationUpdate, EngineError, InvestmentForm, LoanForm, ShippingForm,
    present,
};

#[derive(Parser, Debug)]
#[command(
    name = "finance-guru",
    about = "Mortgage, car loan, investment and shipping estimators"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    #[command(flatten)]
    Estimate(Estimate),
}

#[derive(Subcommand, Debug)]
enum Estimate {
    /// Fixed-rate home mortgage
    Mortgage {
        #[arg(long)]
        house_cost: f64,
        #[command(flatten)]
        loan: LoanArgs,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Fixed-rate car loan
    CarLoan {
        #[arg(long)]
        car_cost: f64,
        #[command(flatten)]
        loan: LoanArgs,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// One-off investment compounded annually
    LumpSum {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[command(flatten)]
        growth: GrowthArgs,
        #[command(flatten)]
        allocation: AllocationArgs,
    },
    /// Monthly contributions compounded monthly
    Recurring {
        #[arg(long)]
        monthly_contribution: f64,
        #[command(flatten)]
        growth: GrowthArgs,
    },
    /// Placeholder carrier quotes
    Shipping {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, help = "Shipping date, e.g. 2026-10-20")]
        date: String,
        #[arg(long)]
        weight: f64,
    },
}

/// Unset fields keep the form defaults (20% down; 7.5% over 20 years for a
/// house, 5.5% over 5 years for a car).
#[derive(Args, Debug)]
struct LoanArgs {
    #[arg(long, help = "Down payment as percent of cost")]
    down_payment_percent: Option<f64>,
    #[arg(long, help = "Annual interest rate in percent")]
    interest_rate: Option<f64>,
    #[arg(long, help = "Amortization period in years")]
    years: Option<f64>,
}

impl LoanArgs {
    fn apply(&self, form: &mut LoanForm) {
        if let Some(v) = self.down_payment_percent {
            form.down_payment_percent = v;
        }
        if let Some(v) = self.interest_rate {
            form.annual_interest_percent = v;
        }
        if let Some(v) = self.years {
            form.term_years = v;
        }
    }
}

#[derive(Args, Debug)]
struct GrowthArgs {
    #[arg(long, default_value_t = 1.0)]
    years: f64,
    #[arg(long, default_value_t = 0.0, help = "Expected annual return in percent")]
    annual_return: f64,
    #[arg(long, default_value_t = 0.0, help = "Capital gains tax in percent")]
    capital_gains_tax: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual inflation in percent")]
    inflation: f64,
}

#[derive(Args, Debug)]
struct AllocationArgs {
    #[arg(long, default_value_t = 0.0)]
    cash_on_hand: f64,
    #[arg(long, default_value_t = 0.0, help = "Cash set aside for the house down payment")]
    down_payment_amount: f64,
    #[arg(long, default_value_t = 0.0, help = "Cash set aside for the car down payment")]
    car_down_payment_amount: f64,
    #[arg(long, help = "Invest the cash left after the house down payment")]
    use_remainder_for_investment: bool,
    #[arg(long, help = "Put the cash on hand toward the car when no car amount is set")]
    use_remainder_for_car_down_payment: bool,
}

impl AllocationArgs {
    fn to_state(&self) -> Result<AllocationState, EngineError> {
        let mut state = AllocationState::new();
        state.apply(AllocationUpdate {
            cash_on_hand: Some(self.cash_on_hand),
            down_payment_amount: Some(self.down_payment_amount),
            use_remainder_for_investment: Some(self.use_remainder_for_investment),
            car_down_payment_amount: Some(self.car_down_payment_amount),
            use_remainder_for_car_down_payment: Some(self.use_remainder_for_car_down_payment),
        })?;
        Ok(state)
    }
}

fn apply_growth(form: &mut InvestmentForm, growth: &GrowthArgs) {
    form.term_years = growth.years;
    form.annual_return_percent = growth.annual_return;
    form.capital_gains_tax_percent = growth.capital_gains_tax;
    form.inflation_percent = growth.inflation;
}

fn run_estimate(estimate: Estimate) -> Result<Vec<String>, EngineError> {
    match estimate {
        Estimate::Mortgage {
            house_cost,
            loan,
            allocation,
        } => {
            let state = allocation.to_state()?;
            let mut form = LoanForm::mortgage();
            form.base_cost = house_cost;
            loan.apply(&mut form);
            Ok(present::loan_lines(&form.calculate(&state)?))
        }
        Estimate::CarLoan {
            car_cost,
            loan,
            allocation,
        } => {
            let state = allocation.to_state()?;
            let mut form = LoanForm::car_loan();
            form.base_cost = car_cost;
            loan.apply(&mut form);
            Ok(present::loan_lines(&form.calculate(&state)?))
        }
        Estimate::LumpSum {
            principal,
            growth,
            allocation,
        } => {
            let state = allocation.to_state()?;
            let mut form = InvestmentForm::lump_sum();
            form.amount = principal;
            apply_growth(&mut form, &growth);
            Ok(present::investment_lines(&form.calculate(&state)?))
        }
        Estimate::Recurring {
            monthly_contribution,
            growth,
        } => {
            let mut form = InvestmentForm::recurring();
            form.amount = monthly_contribution;
            apply_growth(&mut form, &growth);
            Ok(present::investment_lines(
                &form.calculate(&AllocationState::new())?,
            ))
        }
        Estimate::Shipping {
            from,
            to,
            date,
            weight,
        } => {
            let mut form = ShippingForm::new();
            form.sender_address = from;
            form.destination_address = to;
            form.shipping_date = date;
            form.weight = weight;
            Ok(present::shipping_lines(&form.calculate()?))
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "finance_guru=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let estimate = match Cli::parse().command {
        Command::Serve { host, port } => {
            if let Err(e) = finance_guru::api::run_http_server(&host, port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
            return;
        }
        Command::Estimate(estimate) => estimate,
    };

    match run_estimate(estimate) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
