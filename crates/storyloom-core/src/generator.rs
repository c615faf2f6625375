//! External text-generation abstraction.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::tale::{TaleComponents, TaleStyle};

/// Hard deadline for a single generation call.
pub const GENERATION_DEADLINE: Duration = Duration::from_secs(8 * 60);

/// Errors raised by a generation attempt. These only ever reach the
/// detached generation task, which folds them into `TaleStatus::Failed`.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The call exceeded its deadline and was cancelled.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be sent or the response not received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with something that holds no usable text.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Produces tale text from story components and a style.
#[async_trait]
pub trait TaleGenerator: Send + Sync {
    /// Generates the tale body. A successful result is never blank.
    async fn generate(
        &self,
        components: &TaleComponents,
        style: &TaleStyle,
    ) -> Result<String, GenerationError>;
}
