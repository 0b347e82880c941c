//! TDS applicability and cumulative payment lookup.
//!
//! Whether TDS is withheld depends on the client's deductor status and on
//! how much has already been paid between the same client and freelancer
//! in the current financial year.  The first is a plain argument; the
//! second is supplied through the [`CumulativeLookup`] trait so that the
//! HTTP layer can use a real ledger while tests and demos inject a fixed
//! amount.  The calculators themselves only ever see a number.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::fiscal::is_financial_year_label;
use crate::models::{TdsApplicability, TdsReason};
use crate::rates::{round_to_two, TDS_CUMULATIVE_THRESHOLD, TDS_SINGLE_PAYMENT_THRESHOLD};

/// Decides whether TDS applies to a payment of `current_amount`.
///
/// The checks run in a fixed order and the first match wins:
///
/// 1. a client that is not a TDS deductor never withholds;
/// 2. an explicit `force_applicable` is honoured verbatim;
/// 3. a single payment above the single-payment threshold;
/// 4. prior `cumulative_amount` plus this payment above the yearly threshold;
/// 5. otherwise below threshold.
pub fn check_tds_applicability(
    current_amount: f64,
    cumulative_amount: f64,
    force_applicable: Option<bool>,
    client_is_tds_deductor: bool,
) -> TdsApplicability {
    let (tds_applicable, tds_reason) = if !client_is_tds_deductor {
        (false, TdsReason::ClientNotTdsDeductor)
    } else if let Some(forced) = force_applicable {
        let reason = if forced {
            TdsReason::SinglePaymentExceedsThreshold
        } else {
            TdsReason::BelowThreshold
        };
        (forced, reason)
    } else if current_amount > TDS_SINGLE_PAYMENT_THRESHOLD {
        (true, TdsReason::SinglePaymentExceedsThreshold)
    } else if cumulative_amount + current_amount > TDS_CUMULATIVE_THRESHOLD {
        (true, TdsReason::CumulativeExceedsThreshold)
    } else {
        (false, TdsReason::BelowThreshold)
    };

    TdsApplicability {
        tds_applicable,
        tds_reason,
    }
}

/// A payment already made between a client and a freelancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub client_id: String,
    pub freelancer_id: String,
    /// `"YYYY-YYYY"` label, see [`crate::fiscal::financial_year_for`].
    pub financial_year: String,
    pub amount: f64,
}

/// Source of the amount already paid between two parties in a financial
/// year.
///
/// Implementations must be thread-safe (`Send + Sync`) because the HTTP
/// layer shares one instance across requests.
pub trait CumulativeLookup: Send + Sync {
    fn cumulative_amount(&self, client_id: &str, freelancer_id: &str, financial_year: &str) -> f64;

    /// Records a completed payment.  Lookups that are not backed by a
    /// ledger ignore it.
    fn record_payment(&self, _entry: &LedgerEntry) {}
}

/// Always reports the same cumulative amount.  Useful to pin a scenario
/// (below, near or above the threshold) without a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedCumulative(pub f64);

impl CumulativeLookup for FixedCumulative {
    fn cumulative_amount(&self, _client_id: &str, _freelancer_id: &str, _financial_year: &str) -> f64 {
        self.0
    }
}

type LedgerKey = (String, String, String);

/// Running totals per client, freelancer and financial year, held in
/// memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    totals: RwLock<HashMap<LedgerKey, f64>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = LedgerEntry>) -> Self {
        let ledger = Self::new();
        for entry in entries {
            ledger.record_payment(&entry);
        }
        ledger
    }

    /// Number of distinct client/freelancer/year pairs tracked.
    pub fn len(&self) -> usize {
        self.totals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CumulativeLookup for InMemoryLedger {
    fn cumulative_amount(&self, client_id: &str, freelancer_id: &str, financial_year: &str) -> f64 {
        let key = (
            client_id.to_string(),
            freelancer_id.to_string(),
            financial_year.to_string(),
        );
        self.totals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied()
            .unwrap_or(0.0)
    }

    fn record_payment(&self, entry: &LedgerEntry) {
        let key = (
            entry.client_id.clone(),
            entry.freelancer_id.clone(),
            entry.financial_year.clone(),
        );
        let mut totals = self.totals.write().unwrap_or_else(PoisonError::into_inner);
        let total = totals.entry(key).or_insert(0.0);
        *total = round_to_two(*total + entry.amount);
        debug!(
            client_id = %entry.client_id,
            freelancer_id = %entry.freelancer_id,
            financial_year = %entry.financial_year,
            cumulative = *total,
            "recorded payment"
        );
    }
}

/// Seed a ledger from a JSON file holding an array of [`LedgerEntry`]
/// objects.
///
/// Entries that fail to parse or carry a malformed financial year label
/// are logged and skipped; an unreadable file
/// or a document that is not an array is an error.
pub fn load_ledger_from_file(path: &Path) -> Result<InMemoryLedger> {
    let data = std::fs::read_to_string(path).map_err(|source| EngineError::LedgerIo {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Vec<Value> = serde_json::from_str(&data).map_err(|source| EngineError::LedgerFormat {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<LedgerEntry>(value) {
            Ok(entry) if is_financial_year_label(&entry.financial_year) => entries.push(entry),
            Ok(entry) => warn!(
                ?path,
                index,
                financial_year = %entry.financial_year,
                "skipping ledger entry with malformed financial year"
            ),
            Err(err) => warn!(?path, index, %err, "skipping malformed ledger entry"),
        }
    }
    Ok(InMemoryLedger::from_entries(entries))
}
