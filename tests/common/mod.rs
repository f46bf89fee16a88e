#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use crowdfund_backend::api::AppState;
use crowdfund_backend::config::{
    AuthConfig, Config, DatabaseConfig, GatewayConfig, PaymentsConfig, ServerConfig,
};
use crowdfund_backend::database::campaign_repository::{Campaign, CampaignStatus};
use crowdfund_backend::database::donation_repository::{Donation, DonationStatus, NewDonation};
use crowdfund_backend::database::error::{DatabaseError, DatabaseErrorKind, DbResult};
use crowdfund_backend::database::repository::{LedgerStore, Settlement};
use crowdfund_backend::database::role_repository::AppRole;
use crowdfund_backend::database::withdrawal_repository::{Withdrawal, WithdrawalStatus};
use crowdfund_backend::error::{AppError, AppResult, ExternalError};
use crowdfund_backend::identity::IdentityProvider;
use crowdfund_backend::payments::providers::PaystackProvider;
use crowdfund_backend::payments::types::{
    ChargeVerification, PaymentRequest, PaymentResponse, PaymentStatus, TransferStatus,
    WithdrawalRequest, WithdrawalResponse,
};
use crowdfund_backend::payments::PaymentProvider;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use uuid::Uuid;

pub const WEBHOOK_SECRET: &str = "sk_test_webhook_secret";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const DONOR_TOKEN: &str = "donor-token";

pub fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

pub fn charge_event(event: &str, reference: &str, minor_amount: i64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "event": event,
        "data": {
            "reference": reference,
            "amount": minor_amount,
            "status": if event == "charge.success" { "success" } else { "failed" },
        }
    }))
    .unwrap()
}

fn db_failure(what: &str) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Unavailable {
        message: format!("{} unavailable", what),
    })
}

// ---------------------------------------------------------------------------
// In-memory ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: Uuid,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub processed: bool,
    pub attempts: u32,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct LedgerState {
    donations: Vec<Donation>,
    campaigns: HashMap<Uuid, Campaign>,
    withdrawals: HashMap<Uuid, Withdrawal>,
    roles: Vec<(Uuid, AppRole)>,
    journal: Vec<JournalEntry>,
}

/// Ledger double; every conditional update runs under one lock
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
    pub fail_record_transfer: AtomicBool,
    pub fail_settlement: AtomicBool,
    pub fail_ping: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_campaign(&self, current_amount: i64) -> Uuid {
        let id = Uuid::new_v4();
        let campaign = Campaign {
            id,
            creator_id: Uuid::new_v4(),
            title: "Borehole for Ikorodu".to_string(),
            goal_amount: BigDecimal::from(1_000_000),
            current_amount: BigDecimal::from(current_amount),
            currency: Some("NGN".to_string()),
            status: CampaignStatus::Active,
            verified: true,
            verification_documents: sqlx::types::Json(Vec::new()),
        };
        self.state.lock().unwrap().campaigns.insert(id, campaign);
        id
    }

    pub fn add_withdrawal(&self, campaign_id: Uuid, amount: i64) -> Uuid {
        let id = Uuid::new_v4();
        let withdrawal = Withdrawal {
            id,
            campaign_id,
            creator_id: Uuid::new_v4(),
            amount: BigDecimal::from(amount),
            account_name: "Ada Obi".to_string(),
            account_number: "0123456789".to_string(),
            bank_name: "Access Bank".to_string(),
            status: WithdrawalStatus::Pending,
            processed_by: None,
            processed_at: None,
            notes: None,
            requested_at: Some(Utc::now()),
        };
        self.state.lock().unwrap().withdrawals.insert(id, withdrawal);
        id
    }

    pub fn grant(&self, user_id: Uuid, role: AppRole) {
        self.state.lock().unwrap().roles.push((user_id, role));
    }

    pub fn campaign_amount(&self, id: Uuid) -> BigDecimal {
        self.state.lock().unwrap().campaigns[&id].current_amount.clone()
    }

    pub fn donation(&self, reference: &str) -> Option<Donation> {
        self.state
            .lock()
            .unwrap()
            .donations
            .iter()
            .find(|d| d.payment_reference == reference)
            .cloned()
    }

    pub fn donation_count(&self) -> usize {
        self.state.lock().unwrap().donations.len()
    }

    pub fn withdrawal(&self, id: Uuid) -> Withdrawal {
        self.state.lock().unwrap().withdrawals[&id].clone()
    }

    pub fn set_withdrawal_status(&self, id: Uuid, status: WithdrawalStatus) {
        if let Some(w) = self.state.lock().unwrap().withdrawals.get_mut(&id) {
            w.status = status;
        }
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Sum of completed donations for a campaign
    pub fn completed_sum(&self, campaign_id: Uuid) -> BigDecimal {
        self.state
            .lock()
            .unwrap()
            .donations
            .iter()
            .filter(|d| d.campaign_id == campaign_id && d.status == DonationStatus::Completed)
            .fold(BigDecimal::from(0), |acc, d| acc + d.amount.clone())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn insert_donation(&self, donation: &NewDonation) -> DbResult<Donation> {
        let mut state = self.state.lock().unwrap();
        if state
            .donations
            .iter()
            .any(|d| d.payment_reference == donation.payment_reference)
        {
            return Err(DatabaseError::new(
                DatabaseErrorKind::Duplicate {
                    constraint: "donations_payment_reference_key".to_string(),
                },
            ));
        }
        let row = Donation {
            id: Uuid::new_v4(),
            campaign_id: donation.campaign_id,
            donor_id: donation.donor_id,
            amount: donation.amount.clone(),
            currency: Some(donation.currency.clone()),
            payment_reference: donation.payment_reference.clone(),
            status: DonationStatus::Pending,
            message: donation.message.clone(),
            is_anonymous: donation.is_anonymous,
            created_at: Utc::now(),
        };
        state.donations.push(row.clone());
        Ok(row)
    }

    async fn discard_pending_donation(&self, reference: &str) -> DbResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.donations.len();
        state
            .donations
            .retain(|d| !(d.payment_reference == reference && d.status == DonationStatus::Pending));
        Ok(state.donations.len() < before)
    }

    async fn find_donation_by_reference(&self, reference: &str) -> DbResult<Option<Donation>> {
        Ok(self.donation(reference))
    }

    async fn settle_donation(
        &self,
        reference: &str,
        outcome: DonationStatus,
    ) -> DbResult<Option<Settlement>> {
        if self.fail_settlement.load(Ordering::SeqCst) {
            return Err(db_failure("ledger"));
        }
        let mut state = self.state.lock().unwrap();
        let Some(index) = state
            .donations
            .iter()
            .position(|d| d.payment_reference == reference)
        else {
            return Ok(None);
        };

        if state.donations[index].status != DonationStatus::Pending {
            return Ok(Some(Settlement {
                donation: state.donations[index].clone(),
                applied: false,
            }));
        }

        state.donations[index].status = outcome;
        let donation = state.donations[index].clone();
        if outcome == DonationStatus::Completed {
            let campaign = state
                .campaigns
                .get_mut(&donation.campaign_id)
                .ok_or_else(|| DatabaseError::not_found("Campaign", donation.campaign_id))?;
            campaign.current_amount = campaign.current_amount.clone() + donation.amount.clone();
        }
        Ok(Some(Settlement {
            donation,
            applied: true,
        }))
    }

    async fn completed_donation_total(&self, campaign_id: Uuid) -> DbResult<BigDecimal> {
        Ok(self.completed_sum(campaign_id))
    }

    async fn find_campaign(&self, id: Uuid) -> DbResult<Option<Campaign>> {
        Ok(self.state.lock().unwrap().campaigns.get(&id).cloned())
    }

    async fn find_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        Ok(self.state.lock().unwrap().withdrawals.get(&id).cloned())
    }

    async fn list_withdrawals(
        &self,
        status: Option<WithdrawalStatus>,
    ) -> DbResult<Vec<Withdrawal>> {
        let state = self.state.lock().unwrap();
        let mut withdrawals: Vec<Withdrawal> = state
            .withdrawals
            .values()
            .filter(|w| status.map_or(true, |s| w.status == s))
            .cloned()
            .collect();
        withdrawals.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(withdrawals)
    }

    async fn claim_withdrawal(&self, id: Uuid) -> DbResult<Option<Withdrawal>> {
        let mut state = self.state.lock().unwrap();
        match state.withdrawals.get_mut(&id) {
            Some(w) if w.status == WithdrawalStatus::Pending => {
                w.status = WithdrawalStatus::Processing;
                Ok(Some(w.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_withdrawal(&self, id: Uuid) -> DbResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.withdrawals.get_mut(&id) {
            Some(w) if w.status == WithdrawalStatus::Processing && w.processed_at.is_none() => {
                w.status = WithdrawalStatus::Pending;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_transfer(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: &str,
    ) -> DbResult<Option<Withdrawal>> {
        if self.fail_record_transfer.load(Ordering::SeqCst) {
            return Err(db_failure("ledger"));
        }
        let mut state = self.state.lock().unwrap();
        match state.withdrawals.get_mut(&id) {
            Some(w) if w.status == WithdrawalStatus::Processing && w.processed_at.is_none() => {
                w.processed_by = Some(processed_by);
                w.processed_at = Some(Utc::now());
                w.notes = Some(notes.to_string());
                Ok(Some(w.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn reject_withdrawal(
        &self,
        id: Uuid,
        processed_by: Uuid,
        notes: Option<&str>,
    ) -> DbResult<Option<Withdrawal>> {
        let mut state = self.state.lock().unwrap();
        match state.withdrawals.get_mut(&id) {
            Some(w) if w.status == WithdrawalStatus::Pending => {
                w.status = WithdrawalStatus::Rejected;
                w.processed_by = Some(processed_by);
                w.processed_at = Some(Utc::now());
                if let Some(notes) = notes {
                    w.notes = Some(notes.to_string());
                }
                Ok(Some(w.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn committed_withdrawal_total(
        &self,
        campaign_id: Uuid,
        excluding: Option<Uuid>,
    ) -> DbResult<BigDecimal> {
        let state = self.state.lock().unwrap();
        Ok(state
            .withdrawals
            .values()
            .filter(|w| w.campaign_id == campaign_id && w.status.is_committed())
            .filter(|w| Some(w.id) != excluding)
            .fold(BigDecimal::from(0), |acc, w| acc + w.amount.clone()))
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> DbResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .roles
            .iter()
            .any(|(u, r)| *u == user_id && *r == role))
    }

    async fn log_webhook_event(
        &self,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> DbResult<Uuid> {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().journal.push(JournalEntry {
            id,
            event_type: event_type.to_string(),
            payload: payload.clone(),
            processed: false,
            attempts: 0,
            last_error: None,
        });
        Ok(id)
    }

    async fn mark_webhook_processed(&self, event_id: Uuid) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.journal.iter_mut().find(|e| e.id == event_id) {
            entry.processed = true;
            entry.attempts += 1;
        }
        Ok(())
    }

    async fn record_webhook_failure(&self, event_id: Uuid, error: &str) -> DbResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.journal.iter_mut().find(|e| e.id == event_id) {
            entry.attempts += 1;
            entry.last_error = Some(error.to_string());
        }
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(db_failure("database"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scripted gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Script {
    Succeed,
    Fail(String),
    Timeout,
}

impl Script {
    fn outcome(&self, operation: &str) -> AppResult<()> {
        match self {
            Script::Succeed => Ok(()),
            Script::Fail(message) => Err(ExternalError::PaymentProvider {
                provider: "Paystack".to_string(),
                message: message.clone(),
                is_retryable: false,
            }
            .into()),
            Script::Timeout => Err(ExternalError::Timeout {
                service: "Paystack".to_string(),
                operation: operation.to_string(),
            }
            .into()),
        }
    }
}

/// Gateway double that counts calls; signatures go through the real provider
pub struct FakeGateway {
    signer: PaystackProvider,
    pub charge_script: Mutex<Script>,
    pub transfer_script: Mutex<Script>,
    /// Charge status reported by verify, as the gateway spells it
    pub verify_status: Mutex<String>,
    pub transfer_delay: Mutex<Option<Duration>>,
    pub charges: Mutex<HashMap<String, i64>>,
    pub transfers: Mutex<Vec<WithdrawalRequest>>,
    pub init_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub transfer_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        let signer = PaystackProvider::new(GatewayConfig {
            secret_key: WEBHOOK_SECRET.to_string(),
            ..GatewayConfig::default()
        })
        .unwrap();

        Arc::new(Self {
            signer,
            charge_script: Mutex::new(Script::Succeed),
            transfer_script: Mutex::new(Script::Succeed),
            verify_status: Mutex::new("success".to_string()),
            transfer_delay: Mutex::new(None),
            charges: Mutex::new(HashMap::new()),
            transfers: Mutex::new(Vec::new()),
            init_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            transfer_calls: AtomicUsize::new(0),
        })
    }

    pub fn script_charge(&self, script: Script) {
        *self.charge_script.lock().unwrap() = script;
    }

    pub fn script_transfer(&self, script: Script) {
        *self.transfer_script.lock().unwrap() = script;
    }

    pub fn report_status(&self, status: &str) {
        *self.verify_status.lock().unwrap() = status.to_string();
    }

    pub fn delay_transfers(&self, delay: Duration) {
        *self.transfer_delay.lock().unwrap() = Some(delay);
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn charged_amount(&self, reference: &str) -> Option<i64> {
        self.charges.lock().unwrap().get(reference).copied()
    }
}

#[async_trait]
impl PaymentProvider for FakeGateway {
    async fn initialize_charge(&self, request: PaymentRequest) -> AppResult<PaymentResponse> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.charge_script.lock().unwrap().clone();
        script.outcome("initialize transaction")?;
        self.charges
            .lock()
            .unwrap()
            .insert(request.reference.clone(), request.amount);
        Ok(PaymentResponse {
            authorization_url: format!("https://checkout.paystack.com/{}", request.reference),
            access_code: Some("access_code_123".to_string()),
            reference: request.reference,
        })
    }

    async fn verify_charge(&self, reference: &str) -> AppResult<ChargeVerification> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        let status = self.verify_status.lock().unwrap().clone();
        let amount = self.charged_amount(reference).unwrap_or(0);
        Ok(ChargeVerification {
            status: PaymentStatus::from_gateway(&status),
            gateway_status: status,
            amount,
            currency: "NGN".to_string(),
            reference: reference.to_string(),
            message: Some("Approved".to_string()),
            paid_at: None,
        })
    }

    async fn send_transfer(
        &self,
        request: WithdrawalRequest,
    ) -> AppResult<WithdrawalResponse> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.transfer_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let script = self.transfer_script.lock().unwrap().clone();
        script.outcome("initiate transfer")?;
        let transfer_reference = request.reference.clone();
        self.transfers.lock().unwrap().push(request);
        Ok(WithdrawalResponse {
            transfer_code: "TRF_test123".to_string(),
            transfer_reference,
            status: TransferStatus::Pending,
        })
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> bool {
        self.signer.verify_webhook_signature(payload, signature)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub struct FakeIdentity {
    tokens: HashMap<String, Uuid>,
}

impl FakeIdentity {
    pub fn resolve(&self, token: &str) -> Uuid {
        self.tokens[token]
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve_user(&self, token: &str) -> AppResult<Uuid> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| AppError::authentication("Unauthorized"))
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub ledger: Arc<MemoryLedger>,
    pub gateway: Arc<FakeGateway>,
    pub identity: Arc<FakeIdentity>,
    pub state: AppState,
    pub admin_id: Uuid,
    pub donor_id: Uuid,
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/crowdfund_test".to_string(),
            max_connections: 5,
        },
        payments: PaymentsConfig::default(),
        gateway: GatewayConfig {
            secret_key: WEBHOOK_SECRET.to_string(),
            ..GatewayConfig::default()
        },
        auth: AuthConfig {
            url: "https://auth.example.com".to_string(),
            anon_key: "anon".to_string(),
        },
    }
}

fn identities(ledger: &MemoryLedger) -> (Arc<FakeIdentity>, Uuid, Uuid) {
    let admin_id = Uuid::new_v4();
    let donor_id = Uuid::new_v4();
    ledger.grant(admin_id, AppRole::Admin);
    ledger.grant(donor_id, AppRole::Donor);

    let identity = Arc::new(FakeIdentity {
        tokens: HashMap::from([
            (ADMIN_TOKEN.to_string(), admin_id),
            (DONOR_TOKEN.to_string(), donor_id),
        ]),
    });
    (identity, admin_id, donor_id)
}

pub fn test_app() -> TestApp {
    let ledger = MemoryLedger::new();
    let gateway = FakeGateway::new();
    let (identity, admin_id, donor_id) = identities(&ledger);

    let state = AppState::new(
        &test_config(),
        ledger.clone(),
        gateway.clone(),
        identity.clone(),
    )
    .unwrap();

    TestApp {
        ledger,
        gateway,
        identity,
        state,
        admin_id,
        donor_id,
    }
}

/// Services wired to the real Paystack client, pointed at a local server
pub struct PaystackApp {
    pub ledger: Arc<MemoryLedger>,
    pub state: AppState,
}

pub fn paystack_app(base_url: String) -> PaystackApp {
    let ledger = MemoryLedger::new();
    let (identity, _, _) = identities(&ledger);

    let mut config = test_config();
    config.gateway.base_url = base_url;
    config.gateway.timeout_secs = 1;
    config.gateway.lookup_retries = 0;

    let gateway = Arc::new(PaystackProvider::new(config.gateway.clone()).unwrap());
    let state = AppState::new(&config, ledger.clone(), gateway, identity).unwrap();

    PaystackApp { ledger, state }
}

// ---------------------------------------------------------------------------
// Local Paystack server
// ---------------------------------------------------------------------------

/// Reads one request and returns its path, body included so the socket
/// closes cleanly
async fn read_request(socket: &mut TcpStream) -> Option<String> {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while request.len() < header_end + content_length {
        let n = socket.read(&mut buf).await.ok()?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }

    let target = head.lines().next()?.split_whitespace().nth(1)?;
    Some(target.split('?').next().unwrap_or(target).to_string())
}

async fn respond(socket: &mut TcpStream, status: &str, body: &serde_json::Value) {
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.flush().await;
}

/// Paystack stand-in that answers bank and recipient lookups, but on
/// `stall_path` sends `200 OK` with half a body and then goes quiet
pub async fn stalling_paystack(stall_path: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Some(path) = read_request(&mut socket).await else {
                    return;
                };
                if path == stall_path {
                    let partial = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 256\r\n\r\n{\"status\":true,\"data\":{";
                    let _ = socket.write_all(partial.as_bytes()).await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    return;
                }
                match path.as_str() {
                    "/bank" => {
                        let body = serde_json::json!({
                            "status": true,
                            "message": "Banks retrieved",
                            "data": [{ "name": "Access Bank", "code": "044" }],
                        });
                        respond(&mut socket, "200 OK", &body).await;
                    }
                    "/transferrecipient" => {
                        let body = serde_json::json!({
                            "status": true,
                            "message": "Transfer recipient created successfully",
                            "data": { "recipient_code": "RCP_test" },
                        });
                        respond(&mut socket, "201 Created", &body).await;
                    }
                    _ => {
                        let body = serde_json::json!({ "status": false, "message": "Not found" });
                        respond(&mut socket, "404 Not Found", &body).await;
                    }
                }
            });
        }
    });
    format!("http://{}", addr)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
