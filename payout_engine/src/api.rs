//! HTTP API for the Payout Engine.
//!
//! This module exposes the calculators as a small JSON API using the
//! [`axum`](https://crates.io/crates/axum) framework, so that bid,
//! checkout and milestone screens can request breakdowns without
//! linking the crate.  Cumulative payments for the TDS threshold are
//! resolved through the [`CumulativeLookup`] held in [`AppState`].

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::engine::{
    calculate_client_payable, calculate_freelancer_payout, calculate_milestone_breakdown,
    preview_bids,
};
use crate::error::EngineError;
use crate::fiscal::{
    fd_maturity_date, financial_year_for, is_financial_year_label, quarter_end_date,
};
use crate::models::{
    MilestoneParams, MilestonePayment, PayableBreakdown, PayableParams, PayoutBreakdown,
    PayoutParams,
};
use crate::tax::{load_ledger_from_file, CumulativeLookup, InMemoryLedger, LedgerEntry};
use crate::validators::{validate_financial_profile, ProfileValidation};

/// Application state shared across requests.
pub struct AppState {
    pub cumulative: Arc<dyn CumulativeLookup>,
}

impl AppState {
    pub fn new(cumulative: Arc<dyn CumulativeLookup>) -> Self {
        Self { cumulative }
    }

    /// Builds the state for a configured server, seeding the ledger from
    /// `ledger_file` when one is set.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let ledger = match &config.ledger_file {
            Some(path) => {
                let ledger = load_ledger_from_file(path)?;
                info!(?path, pairs = ledger.len(), "seeded payment ledger");
                ledger
            }
            None => InMemoryLedger::new(),
        };
        Ok(Self::new(Arc::new(ledger)))
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({"error": self.to_string()}));
        (status, body).into_response()
    }
}

/// Body of `POST /api/payout`.
///
/// When `cumulativeAmount` is absent and both party ids are present, the
/// cumulative is looked up for the financial year of `paymentDate`
/// (today when absent).  Supplying only one of the party ids is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub contract_value: f64,
    #[serde(rename = "freelancerGSTRegistered")]
    pub freelancer_gst_registered: bool,
    #[serde(rename = "clientIsTDSDeductor")]
    pub client_is_tds_deductor: bool,
    #[serde(default, rename = "forceTDSApplicable")]
    pub force_tds_applicable: Option<bool>,
    #[serde(default)]
    pub cumulative_amount: Option<f64>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub freelancer_id: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

/// Body of `POST /api/profile/validate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub gstin_number: Option<String>,
    #[serde(rename = "isGSTRegistered")]
    pub is_gst_registered: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiscalQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalInfo {
    pub date: NaiveDate,
    pub financial_year: String,
    pub quarter_end: NaiveDate,
    pub fd_maturity_date: NaiveDate,
}

fn ensure_positive(contract_value: f64) -> Result<(), EngineError> {
    if contract_value.is_finite() && contract_value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "contractValue must be a positive amount, got {contract_value}"
        )))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Build the API router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/payout", post(payout_handler))
        .route("/api/payable", post(payable_handler))
        .route("/api/milestones", post(milestones_handler))
        .route("/api/bids/preview", post(bid_preview_handler))
        .route("/api/profile/validate", post(profile_handler))
        .route("/api/ledger/payments", post(record_payment_handler))
        .route("/api/fiscal", get(fiscal_handler))
        .with_state(state)
}

/// Handler for POST /api/payout
async fn payout_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<PayoutRequest>,
) -> Result<Json<PayoutBreakdown>, EngineError> {
    ensure_positive(request.contract_value)?;
    let cumulative_amount = match (
        request.cumulative_amount,
        &request.client_id,
        &request.freelancer_id,
    ) {
        (Some(amount), _, _) => amount,
        (None, Some(client_id), Some(freelancer_id)) => {
            let year = financial_year_for(request.payment_date.unwrap_or_else(today));
            app_state
                .cumulative
                .cumulative_amount(client_id, freelancer_id, &year)
        }
        (None, None, None) => 0.0,
        (None, client_id, freelancer_id) => {
            warn!(?client_id, ?freelancer_id, "payout lookup missing a party id");
            return Err(EngineError::InvalidInput(
                "clientId and freelancerId must be supplied together".to_string(),
            ));
        }
    };

    let params = PayoutParams {
        contract_value: request.contract_value,
        freelancer_gst_registered: request.freelancer_gst_registered,
        client_is_tds_deductor: request.client_is_tds_deductor,
        force_tds_applicable: request.force_tds_applicable,
        cumulative_amount,
    };
    Ok(Json(calculate_freelancer_payout(&params)))
}

/// Handler for POST /api/payable
async fn payable_handler(
    Json(params): Json<PayableParams>,
) -> Result<Json<PayableBreakdown>, EngineError> {
    ensure_positive(params.contract_value)?;
    Ok(Json(calculate_client_payable(&params)))
}

/// Handler for POST /api/milestones
async fn milestones_handler(
    Json(params): Json<MilestoneParams>,
) -> Result<Json<Vec<MilestonePayment>>, EngineError> {
    ensure_positive(params.contract_value)?;
    Ok(Json(calculate_milestone_breakdown(&params)))
}

/// Handler for POST /api/bids/preview
async fn bid_preview_handler(
    Json(bids): Json<Vec<PayoutParams>>,
) -> Result<Json<Vec<PayoutBreakdown>>, EngineError> {
    for bid in &bids {
        ensure_positive(bid.contract_value)?;
    }
    Ok(Json(preview_bids(&bids)))
}

/// Handler for POST /api/profile/validate
async fn profile_handler(Json(request): Json<ProfileRequest>) -> Json<ProfileValidation> {
    Json(validate_financial_profile(
        request.pan_number.as_deref(),
        request.gstin_number.as_deref(),
        request.is_gst_registered,
    ))
}

/// Handler for POST /api/ledger/payments
async fn record_payment_handler(
    State(app_state): State<Arc<AppState>>,
    Json(entry): Json<LedgerEntry>,
) -> Result<StatusCode, EngineError> {
    if !entry.amount.is_finite() || entry.amount <= 0.0 {
        warn!(amount = entry.amount, "rejected ledger payment");
        return Err(EngineError::InvalidInput(format!(
            "amount must be a positive amount, got {}",
            entry.amount
        )));
    }
    if !is_financial_year_label(&entry.financial_year) {
        warn!(financial_year = %entry.financial_year, "rejected ledger payment");
        return Err(EngineError::InvalidInput(format!(
            "financialYear must look like \"2025-2026\", got {:?}",
            entry.financial_year
        )));
    }
    app_state.cumulative.record_payment(&entry);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/fiscal
async fn fiscal_handler(
    Query(query): Query<FiscalQuery>,
) -> Result<Json<FiscalInfo>, EngineError> {
    let date = query.date.unwrap_or_else(today);
    let maturity = fd_maturity_date(date).ok_or_else(|| {
        EngineError::InvalidInput(format!("no deposit maturity date representable for {date}"))
    })?;
    Ok(Json(FiscalInfo {
        date,
        financial_year: financial_year_for(date),
        quarter_end: quarter_end_date(date),
        fd_maturity_date: maturity,
    }))
}

/// Launch the API server.  Builds the state from `config`, binds to its
/// address and serves until the process is interrupted.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "payout engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
