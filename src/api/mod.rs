use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    AllocationState, AllocationUpdate, DownPaymentSource, EngineError, InvestmentForm,
    InvestmentMode, InvestmentResult, LoanContext, LoanForm, LoanResult, ShippingForm,
    ShippingQuote,
};

/// Server state. The allocation is the only thing shared between requests;
/// writers swap it under the write lock, calculations clone a snapshot.
#[derive(Clone, Default)]
pub struct AppState {
    allocation: Arc<RwLock<AllocationState>>,
}

impl AppState {
    fn snapshot(&self) -> AllocationState {
        self.allocation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update<F>(&self, change: F) -> Result<AllocationState, EngineError>
    where
        F: FnOnce(&mut AllocationState) -> Result<(), EngineError>,
    {
        let mut guard = self
            .allocation
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        change(&mut guard)?;
        Ok(guard.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationPayload {
    #[serde(alias = "moneyAtHand")]
    cash_on_hand: Option<f64>,
    #[serde(alias = "downPaymentOptional")]
    down_payment_amount: Option<f64>,
    #[serde(alias = "useRestAsLumpSumSip", deserialize_with = "deserialize_flag")]
    use_remainder_for_investment: Option<bool>,
    #[serde(alias = "downPaymentForCar")]
    car_down_payment_amount: Option<f64>,
    #[serde(alias = "useRestAsCarDownPayment", deserialize_with = "deserialize_flag")]
    use_remainder_for_car_down_payment: Option<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagInput {
    Bool(bool),
    Text(String),
}

/// Accepts JSON booleans as well as the "Yes"/"No" strings the web form sends.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlagInput::Bool(value)) => Ok(Some(value)),
        Some(FlagInput::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(Some(true)),
            "no" | "false" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("expected Yes or No, got '{text}'"))),
        },
    }
}

impl From<AllocationPayload> for AllocationUpdate {
    fn from(payload: AllocationPayload) -> Self {
        AllocationUpdate {
            cash_on_hand: payload.cash_on_hand,
            down_payment_amount: payload.down_payment_amount,
            use_remainder_for_investment: payload.use_remainder_for_investment,
            car_down_payment_amount: payload.car_down_payment_amount,
            use_remainder_for_car_down_payment: payload.use_remainder_for_car_down_payment,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    #[serde(alias = "houseCost", alias = "carCost")]
    base_cost: Option<f64>,
    down_payment_percent: Option<f64>,
    #[serde(alias = "interestRate", alias = "annualInterest")]
    annual_interest_percent: Option<f64>,
    #[serde(alias = "amortYears", alias = "loanTerm")]
    term_years: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InvestmentPayload {
    mode: Option<InvestmentMode>,
    #[serde(
        alias = "principal",
        alias = "lumpsum",
        alias = "periodicContribution",
        alias = "monthlyContribution"
    )]
    amount: Option<f64>,
    #[serde(alias = "term")]
    term_years: Option<f64>,
    #[serde(alias = "annualReturn")]
    annual_return_percent: Option<f64>,
    #[serde(alias = "ltcgTax")]
    capital_gains_tax_percent: Option<f64>,
    #[serde(alias = "inflation")]
    inflation_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ShippingPayload {
    sender_address: Option<String>,
    destination_address: Option<String>,
    shipping_date: Option<String>,
    weight: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanResponse {
    context: LoanContext,
    down_payment_source: DownPaymentSource,
    down_payment_percent: f64,
    result: LoanResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentResponse {
    mode: InvestmentMode,
    amount: f64,
    result: InvestmentResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShippingResponse {
    weight: f64,
    quotes: Vec<ShippingQuote>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

fn loan_form_from_payload(context: LoanContext, payload: LoanPayload) -> LoanForm {
    let mut form = LoanForm::for_context(context);
    if let Some(v) = payload.base_cost {
        form.base_cost = v;
    }
    if let Some(v) = payload.down_payment_percent {
        form.down_payment_percent = v;
    }
    if let Some(v) = payload.annual_interest_percent {
        form.annual_interest_percent = v;
    }
    if let Some(v) = payload.term_years {
        form.term_years = v;
    }
    form
}

fn investment_form_from_payload(
    forced_mode: Option<InvestmentMode>,
    payload: InvestmentPayload,
) -> InvestmentForm {
    let mode = forced_mode
        .or(payload.mode)
        .unwrap_or(InvestmentMode::LumpSum);
    let mut form = InvestmentForm::for_mode(mode);
    if let Some(v) = payload.amount {
        form.amount = v;
    }
    if let Some(v) = payload.term_years {
        form.term_years = v;
    }
    if let Some(v) = payload.annual_return_percent {
        form.annual_return_percent = v;
    }
    if let Some(v) = payload.capital_gains_tax_percent {
        form.capital_gains_tax_percent = v;
    }
    if let Some(v) = payload.inflation_percent {
        form.inflation_percent = v;
    }
    form
}

fn shipping_form_from_payload(payload: ShippingPayload) -> ShippingForm {
    let mut form = ShippingForm::new();
    if let Some(v) = payload.sender_address {
        form.sender_address = v;
    }
    if let Some(v) = payload.destination_address {
        form.destination_address = v;
    }
    if let Some(v) = payload.shipping_date {
        form.shipping_date = v;
    }
    if let Some(v) = payload.weight {
        form.weight = v;
    }
    form
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/api/allocation",
            get(allocation_get_handler).put(allocation_put_handler),
        )
        .route("/api/allocation/reset", post(allocation_reset_handler))
        .route("/api/mortgage", post(mortgage_handler))
        .route("/api/car-loan", post(car_loan_handler))
        .route("/api/sip", post(sip_handler))
        .route("/api/sip/lump-sum", post(lump_sum_handler))
        .route("/api/sip/monthly", post(monthly_sip_handler))
        .route(
            "/api/shipping",
            get(shipping_get_handler).post(shipping_post_handler),
        )
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(host: &str, port: u16) -> io::Result<()> {
    let ip = host
        .parse::<IpAddr>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{host}: {e}")))?;
    let addr = SocketAddr::new(ip, port);
    let app = router(AppState::default());

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "estimator API listening");
    println!("Finance estimator API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/allocation");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", None)
}

async fn allocation_get_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.snapshot())
}

async fn allocation_put_handler(
    State(state): State<AppState>,
    Json(payload): Json<AllocationPayload>,
) -> Response {
    let update = AllocationUpdate::from(payload);
    match state.update(|allocation| allocation.apply(update)) {
        Ok(allocation) => {
            info!(
                cash_on_hand = allocation.cash_on_hand(),
                "allocation updated"
            );
            json_response(StatusCode::OK, allocation)
        }
        Err(err) => engine_error_response(&err),
    }
}

async fn allocation_reset_handler(State(state): State<AppState>) -> Response {
    match state.update(|allocation| {
        allocation.reset_all();
        Ok(())
    }) {
        Ok(allocation) => {
            info!("allocation reset");
            json_response(StatusCode::OK, allocation)
        }
        Err(err) => engine_error_response(&err),
    }
}

async fn mortgage_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoanPayload>,
) -> Response {
    loan_handler_impl(&state, LoanContext::Mortgage, payload)
}

async fn car_loan_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoanPayload>,
) -> Response {
    loan_handler_impl(&state, LoanContext::CarLoan, payload)
}

fn loan_handler_impl(state: &AppState, context: LoanContext, payload: LoanPayload) -> Response {
    let allocation = state.snapshot();
    let mut form = loan_form_from_payload(context, payload);
    let resolved = form.sync_allocation(&allocation);
    match form.calculate(&allocation) {
        Ok(result) => json_response(
            StatusCode::OK,
            LoanResponse {
                context,
                down_payment_source: resolved.source,
                down_payment_percent: form.down_payment_percent,
                result,
            },
        ),
        Err(err) => engine_error_response(&err),
    }
}

async fn sip_handler(
    State(state): State<AppState>,
    Json(payload): Json<InvestmentPayload>,
) -> Response {
    investment_handler_impl(&state, None, payload)
}

async fn lump_sum_handler(
    State(state): State<AppState>,
    Json(payload): Json<InvestmentPayload>,
) -> Response {
    investment_handler_impl(&state, Some(InvestmentMode::LumpSum), payload)
}

async fn monthly_sip_handler(
    State(state): State<AppState>,
    Json(payload): Json<InvestmentPayload>,
) -> Response {
    investment_handler_impl(&state, Some(InvestmentMode::Recurring), payload)
}

fn investment_handler_impl(
    state: &AppState,
    forced_mode: Option<InvestmentMode>,
    payload: InvestmentPayload,
) -> Response {
    let allocation = state.snapshot();
    let mut form = investment_form_from_payload(forced_mode, payload);
    match form.calculate(&allocation) {
        Ok(result) => json_response(
            StatusCode::OK,
            InvestmentResponse {
                mode: form.mode(),
                amount: form.amount,
                result,
            },
        ),
        Err(err) => engine_error_response(&err),
    }
}

async fn shipping_get_handler(Query(payload): Query<ShippingPayload>) -> Response {
    shipping_handler_impl(payload)
}

async fn shipping_post_handler(Json(payload): Json<ShippingPayload>) -> Response {
    shipping_handler_impl(payload)
}

fn shipping_handler_impl(payload: ShippingPayload) -> Response {
    let mut form = shipping_form_from_payload(payload);
    match form.calculate() {
        Ok(quotes) => json_response(
            StatusCode::OK,
            ShippingResponse {
                weight: form.weight,
                quotes,
            },
        ),
        Err(err) => engine_error_response(&err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str, field: Option<&'static str>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            field,
        },
    )
}

fn engine_error_response(err: &EngineError) -> Response {
    error_response(StatusCode::BAD_REQUEST, &err.to_string(), Some(err.field()))
}
