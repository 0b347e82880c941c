//! Data models for the Payout Engine.
//!
//! The `models` module defines the serialisable value records produced
//! by the calculators and the parameter records they consume.  They
//! derive `Serialize` and `Deserialize` so that callers can persist a
//! breakdown alongside a bid or contract, or send it over the wire.
//! Field names are `camelCase` on the wire.
//!
//! Every monetary field is an amount in Indian Rupees rounded to two
//! decimal places.

use serde::{Deserialize, Serialize};

/// Why TDS does or does not apply to a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdsReason {
    /// The paying client does not deduct TDS; nothing else is checked.
    ClientNotTdsDeductor,
    /// This payment alone is above the single-payment threshold.  Also
    /// reported when TDS is forced on for a deductor client.
    SinglePaymentExceedsThreshold,
    /// Prior payments in the financial year plus this one are above the
    /// yearly threshold.
    CumulativeExceedsThreshold,
    /// Neither threshold is crossed, or TDS was forced off.
    BelowThreshold,
}

/// Result of the TDS applicability decision for one payment event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TdsApplicability {
    /// Whether TDS is withheld from this payment.
    pub tds_applicable: bool,
    /// The first rule that decided `tds_applicable`.
    pub tds_reason: TdsReason,
}

/// Lifecycle of a milestone payment.  Calculators always produce
/// [`MilestoneStatus::Pending`]; later states are owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// Scheduled, work not started.
    #[default]
    Pending,
    InProgress,
    /// Work delivered, payment not yet released.
    Completed,
    Paid,
}

/// What a freelancer nets from a contract.
///
/// `net_payout = gross_amount - platform_fee - platform_fee_gst - tcs - tds`
/// and `gross_amount = contract_value + service_gst`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutBreakdown {
    /// The agreed value of the work, before GST.
    pub contract_value: f64,
    /// GST on the service; `None` when the freelancer is not GST registered.
    #[serde(rename = "serviceGST")]
    pub service_gst: Option<f64>,
    /// Contract value plus service GST.
    pub gross_amount: f64,
    /// The freelancer-side platform fee, a share of the contract value.
    pub platform_fee: f64,
    /// GST charged on the platform fee.
    #[serde(rename = "platformFeeGST")]
    pub platform_fee_gst: f64,
    /// Tax collected at source on the contract value.
    pub tcs: f64,
    /// `None` when TDS does not apply.
    pub tds: Option<f64>,
    /// Whether TDS is withheld from this payout.
    pub tds_applicable: bool,
    /// Why TDS does or does not apply.
    pub tds_reason: TdsReason,
    /// What reaches the freelancer after every deduction.
    pub net_payout: f64,
}

/// What a client pays for a contract.
///
/// `total_payable = total_service_amount + platform_fee + platform_fee_gst`.
/// `tds_held` is informational: it is withheld from the freelancer's
/// share of the same total, not added to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableBreakdown {
    /// The contract value being paid for.
    pub service_value: f64,
    /// GST on the service; `None` when the freelancer is not GST registered.
    #[serde(rename = "serviceGST")]
    pub service_gst: Option<f64>,
    /// Service value plus service GST.
    pub total_service_amount: f64,
    /// The client-side platform fee, a share of the contract value.
    pub platform_fee: f64,
    /// GST charged on the client platform fee.
    #[serde(rename = "platformFeeGST")]
    pub platform_fee_gst: f64,
    /// TDS the client holds back from the freelancer; `None` when TDS
    /// does not apply.  Not part of `total_payable`.
    pub tds_held: Option<f64>,
    /// Whether TDS applies, judged without prior cumulative payments.
    pub tds_applicable: bool,
    /// The full amount charged to the client.
    pub total_payable: f64,
}

/// One phase of a contract's payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayment {
    /// Zero-based position in the schedule.
    pub phase_index: usize,
    /// Caller-supplied label of the phase.
    pub phase_name: String,
    /// This phase's share of the contract value.  The last phase takes
    /// whatever rounding left over so the schedule sums to the contract.
    pub amount: f64,
    /// Share of the contract value, in percent.
    pub percentage: f64,
    /// Whether TDS is withheld from this phase's payment.
    pub tds_applicable: bool,
    /// Zero when TDS does not apply to this phase.
    pub tds: f64,
    /// Tax collected at source on the phase amount.
    pub tcs: f64,
    /// GST on the phase amount; `None` when the freelancer is not GST
    /// registered.
    #[serde(rename = "serviceGST")]
    pub service_gst: Option<f64>,
    /// The freelancer-side platform fee on the phase amount.
    pub platform_fee: f64,
    /// GST charged on the platform fee.
    #[serde(rename = "platformFeeGST")]
    pub platform_fee_gst: f64,
    /// What reaches the freelancer for this phase.
    pub net_payout: f64,
    /// Amount paid between the same parties this financial year, up to and
    /// including this phase.
    pub cumulative_amount: f64,
    /// Always [`MilestoneStatus::Pending`] when produced by the calculator.
    pub status: MilestoneStatus,
}

/// Input to the freelancer payout calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutParams {
    pub contract_value: f64,
    #[serde(rename = "freelancerGSTRegistered")]
    pub freelancer_gst_registered: bool,
    #[serde(rename = "clientIsTDSDeductor")]
    pub client_is_tds_deductor: bool,
    /// Forces the TDS decision for a deductor client, bypassing thresholds.
    #[serde(default, rename = "forceTDSApplicable")]
    pub force_tds_applicable: Option<bool>,
    /// Prior payments between the same parties in this financial year.
    #[serde(default)]
    pub cumulative_amount: f64,
}

/// Input to the client payable calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableParams {
    pub contract_value: f64,
    #[serde(rename = "freelancerGSTRegistered")]
    pub freelancer_gst_registered: bool,
    #[serde(rename = "clientIsTDSDeductor")]
    pub client_is_tds_deductor: bool,
    #[serde(default, rename = "forceTDSApplicable")]
    pub force_tds_applicable: Option<bool>,
}

/// Input to the milestone apportionment calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneParams {
    pub contract_value: f64,
    /// Ordered phase names; one milestone is produced per entry.
    pub phases: Vec<String>,
    #[serde(rename = "freelancerGSTRegistered")]
    pub freelancer_gst_registered: bool,
    #[serde(rename = "clientIsTDSDeductor")]
    pub client_is_tds_deductor: bool,
    /// Amount already paid between the same parties this financial year.
    #[serde(default)]
    pub cumulative_amount_paid: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_snake_case() {
        assert_eq!(
            serde_json::to_value(TdsReason::ClientNotTdsDeductor).unwrap(),
            json!("client_not_tds_deductor")
        );
        assert_eq!(
            serde_json::to_value(MilestoneStatus::InProgress).unwrap(),
            json!("in_progress")
        );
    }

    #[test]
    fn every_tds_reason_has_a_wire_name() {
        let names: Vec<_> = [
            TdsReason::ClientNotTdsDeductor,
            TdsReason::SinglePaymentExceedsThreshold,
            TdsReason::CumulativeExceedsThreshold,
            TdsReason::BelowThreshold,
        ]
        .into_iter()
        .map(|reason| serde_json::to_value(reason).unwrap())
        .collect();
        assert_eq!(
            names,
            vec![
                json!("client_not_tds_deductor"),
                json!("single_payment_exceeds_threshold"),
                json!("cumulative_exceeds_threshold"),
                json!("below_threshold"),
            ]
        );
    }

    #[test]
    fn payable_breakdown_wire_names() {
        let breakdown = PayableBreakdown {
            service_value: 1_000.0,
            service_gst: None,
            total_service_amount: 1_000.0,
            platform_fee: 30.0,
            platform_fee_gst: 5.4,
            tds_held: None,
            tds_applicable: false,
            total_payable: 1_035.4,
        };
        let value = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(value["serviceGST"], json!(null));
        assert_eq!(value["platformFeeGST"], json!(5.4));
        assert_eq!(value["tdsHeld"], json!(null));
        assert_eq!(value["totalPayable"], json!(1_035.4));
    }

    #[test]
    fn params_accept_camel_case_and_defaults() {
        let params: PayoutParams = serde_json::from_value(json!({
            "contractValue": 50000.0,
            "freelancerGSTRegistered": true,
            "clientIsTDSDeductor": false
        }))
        .unwrap();
        assert_eq!(params.force_tds_applicable, None);
        assert_eq!(params.cumulative_amount, 0.0);
        assert!(!params.client_is_tds_deductor);
    }

    #[test]
    fn deductor_flag_is_mandatory() {
        let missing = serde_json::from_value::<PayableParams>(json!({
            "contractValue": 1000.0,
            "freelancerGSTRegistered": false
        }));
        assert!(missing.is_err());
    }
}
