//! Donations in, payouts out
//!
//! Everything that talks to the payment gateway: the [`PaymentProvider`]
//! seam, the values crossing it, minor/major unit conversion and the
//! Paystack client.

pub mod money;
pub mod providers;
pub mod traits;
pub mod types;

pub use traits::PaymentProvider;
