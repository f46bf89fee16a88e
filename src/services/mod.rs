//! Payment and withdrawal workflows
//!
//! Each service holds explicit handles to the ledger store and the external
//! providers it needs. HTTP handlers in [`crate::api`] are thin wrappers.

pub mod admin;
pub mod payment;
pub mod settlement;
pub mod webhook;
pub mod withdrawal;

pub use admin::{AdminService, CampaignReconciliation};
pub use payment::{
    DonationMetadata, InitializePayment, InitializedPayment, PaymentService, VerifiedPayment,
};
pub use settlement::Settler;
pub use webhook::{WebhookAck, WebhookService};
pub use withdrawal::{
    ProcessWithdrawal, WithdrawalAction, WithdrawalOutcome, WithdrawalService,
};
