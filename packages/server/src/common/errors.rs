use thiserror::Error;

/// Provisioning errors for the staff management platform.
///
/// Validation failures carry no side effects. Partial-failure variants record
/// whether a rollback was attempted: creation compensates (the account is
/// removed before the error is surfaced), update and delete do not.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Identity provider error: {0}")]
    IdentityProvider(#[source] anyhow::Error),

    #[error("Profile store error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("Avatar upload failed: {0}")]
    ObjectStore(#[source] anyhow::Error),

    #[error("Could not load existing badge codes: {0}")]
    AllocationLookup(#[source] anyhow::Error),

    #[error("Staff member not found: {0}")]
    NotFound(String),

    #[error("Creation failed; the new account was rolled back: {0}")]
    PartialFailureCompensated(#[source] Box<ProvisionError>),

    #[error("Operation failed after a prior step committed; no rollback attempted: {0}")]
    PartialFailureUncompensated(#[source] Box<ProvisionError>),

    #[error("Badge counter reconciliation failed: {0}")]
    Reconciliation(#[source] anyhow::Error),
}

impl ProvisionError {
    /// Wrap an error that occurred after the account was created and rolled back.
    pub fn compensated(cause: ProvisionError) -> Self {
        ProvisionError::PartialFailureCompensated(Box::new(cause))
    }

    /// Wrap an error that occurred after a prior store already committed.
    pub fn uncompensated(cause: ProvisionError) -> Self {
        ProvisionError::PartialFailureUncompensated(Box::new(cause))
    }
}
