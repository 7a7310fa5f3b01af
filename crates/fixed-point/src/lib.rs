//! Exact fixed-point numerics for the Silo deployment wizard.
//!
//! Three representations are in play:
//!
//! - **Display percentage**: what a user types (`"4.001"`), held as text or
//!   as a `rust_decimal::Decimal`.
//! - **[`ScaledPercentage`]**: `percentage × 10^16` as an exact signed
//!   256-bit integer. This is the wizard's storage unit and, for LTV and
//!   threshold fields, numerically the same value the contracts hold.
//! - **[`OnChainAmount`]**: an unsigned 18-decimal integer as read from or
//!   written to the chain.
//!
//! No conversion in this crate goes through `f64`. The display side is
//! parsed digit by digit and the integer side is formatted by slicing decimal
//! strings, so values beyond 2^53 survive unchanged.

pub mod e18;
pub mod normalization;
mod scaled;

pub use e18::{E18Style, format_big_int_to_e18, format_wizard_big_int_to_e18};
pub use normalization::{
    NormalizationError, display_decimal_to_scaled, display_to_scaled, scaled_to_display,
    wizard_basis_points_to_scaled,
};
pub use scaled::{OnChainAmount, ScaledPercentage};
