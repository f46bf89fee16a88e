//! The gateway seam
//!
//! Services talk to the payment gateway only through [`PaymentProvider`],
//! which keeps Paystack swappable for a scripted fake in tests.

use crate::error::AppResult;
use crate::payments::types::{
    ChargeVerification, PaymentRequest, PaymentResponse, WithdrawalRequest, WithdrawalResponse,
};
use async_trait::async_trait;

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a charge and return the hosted payment page.
    ///
    /// A timeout is reported as `ExternalError::Timeout`: the charge may exist
    /// at the gateway.
    async fn initialize_charge(&self, request: PaymentRequest) -> AppResult<PaymentResponse>;

    /// Current state of a charge, looked up by reference
    async fn verify_charge(&self, reference: &str) -> AppResult<ChargeVerification>;

    /// Pay a campaign owner out to their bank account.
    ///
    /// A timeout on the transfer call itself is reported as
    /// `ExternalError::Timeout`: money may already have moved.
    async fn send_transfer(&self, request: WithdrawalRequest) -> AppResult<WithdrawalResponse>;

    /// Check the signature header against the raw request body
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool;
}
