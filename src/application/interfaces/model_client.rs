use async_trait::async_trait;

use crate::domain::{DomainError, ModelEnvelope};

/// Sends a finished prompt to a text-generation endpoint.
///
/// Implementors own transport, signing, and vendor payload details, and hand back
/// the reply in the `{"results": [{"outputText": ...}]}` envelope so the
/// normalizer never sees vendor-specific shapes.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Transport failures map to [`DomainError::Network`]; bodies that are not the
    /// expected JSON map to [`DomainError::MalformedResponse`].
    async fn invoke(&self, prompt: &str) -> Result<ModelEnvelope, DomainError>;

    /// Human-readable service name used in `"Error invoking <service>: ..."`.
    fn service_name(&self) -> &str;
}
