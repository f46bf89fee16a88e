use anyhow::{anyhow, Context, Result};
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Upper bound on PAYSTACK_MAX_RETRIES; backoff doubles per attempt
pub const MAX_LOOKUP_RETRIES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub payments: PaymentsConfig,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    /// Currency every charge and transfer is made in
    pub currency: String,
    /// Smallest donation accepted, in major units
    pub min_donation_amount: BigDecimal,
    /// Where the hosted payment page sends the donor afterwards
    pub callback_url: Option<String>,
}

/// Paystack credentials and HTTP behaviour
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// API secret key; Paystack also signs webhooks with it
    pub secret_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Retries for read-only lookups; calls that move money are never retried
    pub lookup_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            base_url: "https://api.paystack.co".to_string(),
            timeout_secs: 30,
            lookup_retries: 3,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("lookup_retries", &self.lookup_retries)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            currency: "NGN".to_string(),
            min_donation_amount: BigDecimal::from(100),
            callback_url: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .context("PORT not set")?
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").context("DATABASE_URL not set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
        };

        let payments = PaymentsConfig {
            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "NGN".to_string()),
            min_donation_amount: BigDecimal::from_str(
                &env::var("MIN_DONATION_AMOUNT").unwrap_or_else(|_| "100".to_string()),
            )
            .context("MIN_DONATION_AMOUNT must be a decimal number")?,
            callback_url: env::var("PAYMENT_CALLBACK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        };

        let defaults = GatewayConfig::default();
        let gateway = GatewayConfig {
            secret_key: env::var("PAYSTACK_SECRET_KEY").context("PAYSTACK_SECRET_KEY not set")?,
            base_url: env::var("PAYSTACK_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout_secs: match env::var("PAYSTACK_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .parse()
                    .context("PAYSTACK_TIMEOUT_SECS must be a whole number of seconds")?,
                Err(_) => defaults.timeout_secs,
            },
            lookup_retries: match env::var("PAYSTACK_MAX_RETRIES") {
                Ok(raw) => raw
                    .parse()
                    .context("PAYSTACK_MAX_RETRIES must be a valid number")?,
                Err(_) => defaults.lookup_retries,
            },
        };

        let auth = AuthConfig {
            url: env::var("AUTH_URL").context("AUTH_URL not set")?,
            anon_key: env::var("AUTH_ANON_KEY").context("AUTH_ANON_KEY not set")?,
        };

        let config = Config {
            server,
            database,
            payments,
            gateway,
            auth,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if self.database.url.trim().is_empty() {
            return Err(anyhow!("DATABASE_URL cannot be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow!("DATABASE_MAX_CONNECTIONS must be greater than 0"));
        }

        if self.gateway.secret_key.trim().is_empty() {
            return Err(anyhow!("PAYSTACK_SECRET_KEY cannot be empty"));
        }

        if !self.gateway.base_url.starts_with("http") {
            return Err(anyhow!(
                "PAYSTACK_BASE_URL must be an http(s) URL, got {}",
                self.gateway.base_url
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(anyhow!("PAYSTACK_TIMEOUT_SECS must be greater than 0"));
        }

        if self.gateway.lookup_retries > MAX_LOOKUP_RETRIES {
            return Err(anyhow!(
                "PAYSTACK_MAX_RETRIES must be at most {}, got {}",
                MAX_LOOKUP_RETRIES,
                self.gateway.lookup_retries
            ));
        }

        if self.auth.url.trim().is_empty() {
            return Err(anyhow!("AUTH_URL cannot be empty"));
        }

        if self.auth.anon_key.trim().is_empty() {
            return Err(anyhow!("AUTH_ANON_KEY cannot be empty"));
        }

        if self.payments.currency.trim().len() != 3 {
            return Err(anyhow!(
                "PAYMENT_CURRENCY must be a three-letter code, got {}",
                self.payments.currency
            ));
        }

        if self.payments.min_donation_amount <= BigDecimal::zero() {
            return Err(anyhow!(
                "MIN_DONATION_AMOUNT must be positive, got {}",
                self.payments.min_donation_amount
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.environment == "production"
    }
}
