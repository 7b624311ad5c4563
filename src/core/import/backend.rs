//! The collaborator that receives finished import records.

use super::ImportRecord;
use crate::core::preview::Hothash;
use crate::error::BackendError;

/// Receives import records, typically to persist them.
///
/// Implementations decide what "submit" means (HTTP upload, database insert,
/// message queue). None ships with this crate.
pub trait BackendClient: Send + Sync {
    fn submit(&self, record: &ImportRecord) -> Result<(), BackendError>;
}

/// A record the backend did not accept
#[derive(Debug)]
pub struct BackendFailure {
    pub hothash: Hothash,
    pub error: BackendError,
}
