//! Contract payout computation engine.
//!
//! The `engine` module turns a contract value and the parties' tax status
//! into full monetary breakdowns: what the freelancer nets
//! ([`calculate_freelancer_payout`]), what the client pays
//! ([`calculate_client_payable`]) and how the value is split across
//! delivery phases ([`calculate_milestone_breakdown`]).  Every
//! intermediate amount is rounded to two decimals before it is used in
//! the next step.  All functions are pure.

use rayon::prelude::*;
use tracing::debug;

use crate::models::{
    MilestoneParams, MilestonePayment, MilestoneStatus, PayableBreakdown, PayableParams,
    PayoutBreakdown, PayoutParams,
};
use crate::rates::{
    percentage_of, round_to_two, CLIENT_PLATFORM_FEE_PERCENT, FREELANCER_PLATFORM_FEE_PERCENT,
    GST_PERCENT, TCS_PERCENT, TDS_PERCENT,
};
use crate::tax::check_tds_applicability;

/// Per-amount charges shared by the whole-contract and per-phase views.
struct Charges {
    service_gst: Option<f64>,
    gross_amount: f64,
    platform_fee: f64,
    platform_fee_gst: f64,
}

fn charges(amount: f64, gst_registered: bool, platform_fee_percent: f64) -> Charges {
    let service_gst = gst_registered.then(|| percentage_of(amount, GST_PERCENT));
    let gross_amount = round_to_two(amount + service_gst.unwrap_or(0.0));
    let platform_fee = percentage_of(amount, platform_fee_percent);
    let platform_fee_gst = percentage_of(platform_fee, GST_PERCENT);
    Charges {
        service_gst,
        gross_amount,
        platform_fee,
        platform_fee_gst,
    }
}

fn net_of(charges: &Charges, tcs: f64, tds: f64) -> f64 {
    round_to_two(charges.gross_amount - charges.platform_fee - charges.platform_fee_gst - tcs - tds)
}

/// Computes what a freelancer receives for a contract after platform fee,
/// GST on that fee, TCS and (when applicable) TDS.
///
/// ```
/// use payout_engine::engine::calculate_freelancer_payout;
/// use payout_engine::models::PayoutParams;
///
/// let payout = calculate_freelancer_payout(&PayoutParams {
///     contract_value: 50_000.0,
///     freelancer_gst_registered: true,
///     client_is_tds_deductor: true,
///     force_tds_applicable: Some(true),
///     cumulative_amount: 0.0,
/// });
/// assert_eq!(payout.net_payout, 50_550.0);
/// ```
pub fn calculate_freelancer_payout(params: &PayoutParams) -> PayoutBreakdown {
    let contract_value = params.contract_value;
    let charges = charges(
        contract_value,
        params.freelancer_gst_registered,
        FREELANCER_PLATFORM_FEE_PERCENT,
    );
    let tcs = percentage_of(contract_value, TCS_PERCENT);

    let decision = check_tds_applicability(
        contract_value,
        params.cumulative_amount,
        params.force_tds_applicable,
        params.client_is_tds_deductor,
    );
    let tds = decision
        .tds_applicable
        .then(|| percentage_of(contract_value, TDS_PERCENT));
    let net_payout = net_of(&charges, tcs, tds.unwrap_or(0.0));

    debug!(
        contract_value,
        tds_reason = ?decision.tds_reason,
        net_payout,
        "computed freelancer payout"
    );

    PayoutBreakdown {
        contract_value,
        service_gst: charges.service_gst,
        gross_amount: charges.gross_amount,
        platform_fee: charges.platform_fee,
        platform_fee_gst: charges.platform_fee_gst,
        tcs,
        tds,
        tds_applicable: decision.tds_applicable,
        tds_reason: decision.tds_reason,
        net_payout,
    }
}

/// Computes what a client pays for a contract: the service (with GST when
/// the freelancer is registered) plus the client platform fee and its GST.
///
/// TDS is evaluated with a cumulative amount of zero, so this view only
/// reflects the single-payment threshold and the override.  The
/// freelancer view accepts a real cumulative and can therefore disagree
/// for the same contract.  `tds_held` is informational and is not added
/// to `total_payable`.
pub fn calculate_client_payable(params: &PayableParams) -> PayableBreakdown {
    let contract_value = params.contract_value;
    let charges = charges(
        contract_value,
        params.freelancer_gst_registered,
        CLIENT_PLATFORM_FEE_PERCENT,
    );

    let decision = check_tds_applicability(
        contract_value,
        0.0,
        params.force_tds_applicable,
        params.client_is_tds_deductor,
    );
    let tds_held = decision
        .tds_applicable
        .then(|| percentage_of(contract_value, TDS_PERCENT));
    let total_payable =
        round_to_two(charges.gross_amount + charges.platform_fee + charges.platform_fee_gst);

    debug!(contract_value, total_payable, "computed client payable");

    PayableBreakdown {
        service_value: contract_value,
        service_gst: charges.service_gst,
        total_service_amount: charges.gross_amount,
        platform_fee: charges.platform_fee,
        platform_fee_gst: charges.platform_fee_gst,
        tds_held,
        tds_applicable: decision.tds_applicable,
        total_payable,
    }
}

/// Splits a contract into equal milestones, one per phase, and computes
/// the freelancer's deductions for each.
///
/// Every phase but the last receives `contract_value / n` rounded to two
/// decimals; the last phase receives whatever remains, so the amounts
/// always sum to the contract value.  TDS is decided per phase against
/// the running cumulative, which starts at `cumulative_amount_paid` and
/// grows phase by phase.  An empty phase list yields no milestones.
pub fn calculate_milestone_breakdown(params: &MilestoneParams) -> Vec<MilestonePayment> {
    let phase_count = params.phases.len();
    if phase_count == 0 {
        return Vec::new();
    }

    let contract_value = params.contract_value;
    let amount_per_phase = round_to_two(contract_value / phase_count as f64);
    let percentage = round_to_two(100.0 / phase_count as f64);
    let mut cumulative = params.cumulative_amount_paid;

    let milestones: Vec<MilestonePayment> = params
        .phases
        .iter()
        .enumerate()
        .map(|(index, phase_name)| {
            let amount = if index == phase_count - 1 {
                round_to_two(contract_value - amount_per_phase * index as f64)
            } else {
                amount_per_phase
            };

            let decision =
                check_tds_applicability(amount, cumulative, None, params.client_is_tds_deductor);
            let tds = if decision.tds_applicable {
                percentage_of(amount, TDS_PERCENT)
            } else {
                0.0
            };
            let tcs = percentage_of(amount, TCS_PERCENT);
            let charges = charges(
                amount,
                params.freelancer_gst_registered,
                FREELANCER_PLATFORM_FEE_PERCENT,
            );
            let net_payout = net_of(&charges, tcs, tds);
            cumulative = round_to_two(cumulative + amount);

            MilestonePayment {
                phase_index: index,
                phase_name: phase_name.clone(),
                amount,
                percentage,
                tds_applicable: decision.tds_applicable,
                tds,
                tcs,
                service_gst: charges.service_gst,
                platform_fee: charges.platform_fee,
                platform_fee_gst: charges.platform_fee_gst,
                net_payout,
                cumulative_amount: cumulative,
                status: MilestoneStatus::Pending,
            }
        })
        .collect();

    debug!(contract_value, phases = phase_count, "computed milestone breakdown");
    milestones
}

/// Computes payout previews for many bids at once.
///
/// Bids are independent, so they are computed in parallel with [`rayon`];
/// the output order matches the input order.
pub fn preview_bids(bids: &[PayoutParams]) -> Vec<PayoutBreakdown> {
    bids.par_iter().map(calculate_freelancer_payout).collect()
}
