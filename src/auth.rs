//! # Authentication
//!
//! [`UserDirectory`] is the seam to an identity provider: it answers "who is
//! signed in" and starts or ends that session. [`MockUserDirectory`] stands in
//! for a hosted provider during development by resolving a configured
//! employee id against the record repository.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::RepositoryError;
use crate::models::{Employee, EmployeeId};
use crate::repositories::RecordRepository;

/// Errors raised by an identity provider
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
    #[error("identity provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The signed-in employee, or `None` when there is no session.
    async fn current_user(&self) -> Result<Option<Employee>, AuthError>;

    /// Starts a session and returns the signed-in employee.
    async fn sign_in(&self) -> Result<Option<Employee>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Development directory that always signs in as one configured employee
pub struct MockUserDirectory {
    repository: Arc<dyn RecordRepository>,
    dev_user_id: EmployeeId,
    session: RwLock<Option<EmployeeId>>,
}

impl MockUserDirectory {
    /// Creates a directory with an active session for `dev_user_id`.
    ///
    /// # Arguments
    /// * `repository` - Where employee records are resolved
    /// * `dev_user_id` - Employee the mock session belongs to
    /// * `publishable_key` - Client key of the hosted provider, checked for shape only
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        dev_user_id: EmployeeId,
        publishable_key: Option<&str>,
    ) -> Self {
        if let Some(key) = publishable_key
            && !key.starts_with("pk_")
        {
            warn!("Auth publishable key does not look like a publishable key");
        }
        info!(dev_user_id, "Mock user directory initialized");

        Self {
            repository,
            dev_user_id,
            session: RwLock::new(Some(dev_user_id)),
        }
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn current_user(&self) -> Result<Option<Employee>, AuthError> {
        let Some(user_id) = *self.session.read().await else {
            debug!("No active session");
            return Ok(None);
        };

        let user = self.repository.get_employee(user_id).await?;
        if user.is_none() {
            warn!(user_id, "Session refers to an employee that does not exist");
        }
        Ok(user)
    }

    async fn sign_in(&self) -> Result<Option<Employee>, AuthError> {
        *self.session.write().await = Some(self.dev_user_id);
        info!(user_id = self.dev_user_id, "Signed in");
        self.current_user().await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().await = None;
        info!("Signed out");
        Ok(())
    }
}
