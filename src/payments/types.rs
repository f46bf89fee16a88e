//! Values exchanged with the payment gateway
//!
//! Amounts in this module are always in the gateway's minor currency unit
//! (kobo for NGN). Conversion from ledger amounts happens in [`super::money`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to a charge, echoed back by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeMetadata {
    pub campaign_id: Uuid,
    #[serde(default)]
    pub donor_id: Option<Uuid>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// A donation charge to open at the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Donor email; the gateway sends the receipt here
    pub email: String,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    /// Our reference for this charge; the gateway echoes it back
    pub reference: String,
    /// Where the hosted page sends the donor once they are done
    pub callback_url: Option<String>,
    pub metadata: ChargeMetadata,
}

/// An opened charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Hosted payment page the donor is redirected to
    pub authorization_url: String,
    pub access_code: Option<String>,
    pub reference: String,
}

/// Charge status as reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
    Abandoned,
    Reversed,
    Unknown,
}

impl PaymentStatus {
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "success" => PaymentStatus::Success,
            "pending" | "ongoing" | "processing" | "queued" => PaymentStatus::Pending,
            "failed" => PaymentStatus::Failed,
            "abandoned" => PaymentStatus::Abandoned,
            "reversed" => PaymentStatus::Reversed,
            _ => PaymentStatus::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Success)
    }
}

/// Result of looking a charge up by reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeVerification {
    pub status: PaymentStatus,
    /// Status string exactly as the gateway sent it
    pub gateway_status: String,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    pub reference: String,
    /// Gateway's human-readable response
    pub message: Option<String>,
    pub paid_at: Option<String>,
}

/// A payout of campaign funds to the owner's bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Account holder as registered on the withdrawal
    pub recipient_name: String,
    pub account_number: String,
    /// Bank name as entered by the campaign creator
    pub bank_name: String,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    /// Stable per withdrawal so the gateway can reject a duplicate payout
    pub reference: String,
    /// Narration shown on the recipient's statement
    pub reason: Option<String>,
}

/// A transfer the gateway accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    /// Gateway transfer handle
    pub transfer_code: String,
    pub transfer_reference: String,
    pub status: TransferStatus,
}

/// Transfer status right after initiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Pending,
    Success,
    /// Transfer awaits OTP confirmation on the gateway dashboard
    AwaitingOtp,
    Reversed,
}
