use async_trait::async_trait;

use crate::catalog::ResolvedTarget;
use crate::core::error::GatewayError;
use crate::core::types::{Credential, ImageOutput};

/// Backend contract for turning a validated generation request into a run of
/// the target's hosted application.
///
/// The gateway depends on this seam rather than on a concrete backend so the
/// request flow can be exercised without network access. Implementations own
/// the full queue protocol for one job; retries and backoff are internal to
/// that contract and never surface upward.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(
        &self,
        target: &ResolvedTarget,
        prompt: &str,
        credential: &Credential,
    ) -> Result<ImageOutput, GatewayError>;
}
