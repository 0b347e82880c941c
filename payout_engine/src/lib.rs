//! Payout Engine library crate.
//!
//! This crate exposes the contract tax, fee and payout calculators used
//! by a freelance marketplace, together with identifier validators,
//! financial-year helpers and an optional HTTP API.  External
//! applications may depend on the `payout_engine` crate and call into
//! `engine::calculate_freelancer_payout` directly or embed the API via
//! `api::build_router`.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod fiscal;
pub mod format;
pub mod models;
pub mod rates;
pub mod tax;
pub mod validators;
