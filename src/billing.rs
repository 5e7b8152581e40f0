//! # Billing
//!
//! [`BillingGateway`] is the seam to a hosted payment provider: it opens a
//! checkout session for a subscription price and hands out a link to the
//! customer self-service portal. [`MockBillingGateway`] answers both without
//! leaving the process.

use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;
use utoipa::ToSchema;

/// Prefix of every mock checkout session id
pub const MOCK_SESSION_PREFIX: &str = "cs_test_mock_";

/// Portal link handed out when none is configured
pub const DEFAULT_PORTAL_URL: &str = "https://billing.stripe.com/p/session/mock_portal_session";

const CHECKOUT_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("invalid price id '{0}'")]
    InvalidPriceId(String),
    #[error("billing provider error: {0}")]
    Provider(String),
}

/// A started checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub success: bool,
    #[schema(example = "cs_test_mock_k3v9qa")]
    pub session_id: String,
}

/// Link to the customer self-service portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortalSession {
    pub success: bool,
    #[schema(
        value_type = String,
        example = "https://billing.stripe.com/p/session/mock_portal_session"
    )]
    pub url: Url,
}

#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn create_checkout_session(&self, price_id: &str)
    -> Result<CheckoutSession, BillingError>;

    async fn customer_portal(&self) -> Result<PortalSession, BillingError>;
}

/// In-process stand-in for the payment provider
pub struct MockBillingGateway {
    portal_url: Url,
    simulate_latency: bool,
}

impl MockBillingGateway {
    pub fn new(portal_url: Url, publishable_key: Option<&str>, simulate_latency: bool) -> Self {
        if let Some(key) = publishable_key
            && !key.starts_with("pk_")
        {
            warn!("Billing publishable key does not look like a publishable key");
        }
        info!(portal_url = %portal_url, "Mock billing gateway initialized");

        Self {
            portal_url,
            simulate_latency,
        }
    }

    fn session_suffix() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect()
    }
}

#[async_trait]
impl BillingGateway for MockBillingGateway {
    async fn create_checkout_session(
        &self,
        price_id: &str,
    ) -> Result<CheckoutSession, BillingError> {
        if price_id.trim().is_empty() {
            return Err(BillingError::InvalidPriceId(price_id.to_string()));
        }

        if self.simulate_latency {
            tokio::time::sleep(CHECKOUT_DELAY).await;
        }

        let session_id = format!("{MOCK_SESSION_PREFIX}{}", Self::session_suffix());
        info!(price_id, session_id = %session_id, "Created checkout session");

        Ok(CheckoutSession {
            success: true,
            session_id,
        })
    }

    async fn customer_portal(&self) -> Result<PortalSession, BillingError> {
        info!("Issued customer portal link");
        Ok(PortalSession {
            success: true,
            url: self.portal_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> MockBillingGateway {
        MockBillingGateway::new(Url::parse(DEFAULT_PORTAL_URL).unwrap(), Some("pk_test_1"), false)
    }

    #[tokio::test]
    async fn checkout_sessions_get_unique_mock_ids() {
        let gateway = gateway();
        let first = gateway.create_checkout_session("price_pro").await.unwrap();
        let second = gateway.create_checkout_session("price_pro").await.unwrap();

        assert!(first.success);
        assert!(first.session_id.starts_with(MOCK_SESSION_PREFIX));
        assert_eq!(first.session_id.len(), MOCK_SESSION_PREFIX.len() + 6);
        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn blank_price_id_is_rejected() {
        let err = gateway().create_checkout_session("  ").await.unwrap_err();
        assert!(matches!(err, BillingError::InvalidPriceId(_)));
    }

    #[tokio::test]
    async fn portal_returns_configured_url() {
        let portal = gateway().customer_portal().await.unwrap();
        assert!(portal.success);
        assert_eq!(portal.url.as_str(), DEFAULT_PORTAL_URL);
    }
}
