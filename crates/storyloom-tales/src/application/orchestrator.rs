//! Generation orchestrator.
//!
//! `request_generation` validates the tale, swaps its status to
//! `Generating`, and only then launches a detached task. The task calls the
//! generator under a deadline and writes exactly one outcome: `Completed`
//! with the generated body, or `Failed` with the body left as it was. Task
//! errors are logged and never returned to anyone.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::generator::{GENERATION_DEADLINE, GenerationError, TaleGenerator};
use storyloom_core::repository::TaleRepository;
use storyloom_core::tale::{TaleComponents, TaleStatus, TaleStyle};
use tokio_util::task::TaskTracker;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::application::command_handlers::load_owned_tale;
use crate::domain::commands::RequestGeneration;
use crate::domain::rules::check_generation_preconditions;

/// Acknowledgement returned once generation has been started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationAck {
    /// The tale being generated.
    pub tale_id: Uuid,
    /// Always `Generating`.
    pub status: TaleStatus,
}

/// Owns the generation state machine and the detached generation tasks.
pub struct GenerationOrchestrator {
    tales: Arc<dyn TaleRepository>,
    generator: Arc<dyn TaleGenerator>,
    clock: Arc<dyn Clock>,
    deadline: Duration,
    tasks: TaskTracker,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("deadline", &self.deadline)
            .field("in_flight", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl GenerationOrchestrator {
    /// Creates an orchestrator using the default generation deadline.
    #[must_use]
    pub fn new(
        tales: Arc<dyn TaleRepository>,
        generator: Arc<dyn TaleGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tales,
            generator,
            clock,
            deadline: GENERATION_DEADLINE,
            tasks: TaskTracker::new(),
        }
    }

    /// Overrides the generation deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Moves the tale to `Generating` and launches the detached generation
    /// task. Returns as soon as the status write is durable; the outcome is
    /// observable only by re-reading the tale.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the tale does not exist,
    /// `DomainError::PermissionDenied` if the caller is not the owner,
    /// `DomainError::FailedPrecondition` if the hero or style is missing or
    /// another generation holds the tale, and `DomainError::Infrastructure`
    /// if the store fails. No state changes in any of these cases.
    pub async fn request_generation(
        &self,
        command: &RequestGeneration,
    ) -> Result<GenerationAck, DomainError> {
        let tale = load_owned_tale(&*self.tales, command.tale_id, &command.caller_id).await?;
        check_generation_preconditions(&tale)?;

        let swapped = self
            .tales
            .compare_and_set_status(
                tale.id,
                tale.status,
                TaleStatus::Generating,
                self.clock.now(),
            )
            .await?;
        if !swapped {
            return Err(DomainError::FailedPrecondition(
                "tale changed while starting generation".into(),
            ));
        }

        info!(
            correlation_id = %command.correlation_id,
            tale_id = %tale.id,
            previous_status = %tale.status,
            "tale generation started"
        );

        let span = info_span!(
            "generation",
            tale_id = %tale.id,
            correlation_id = %command.correlation_id
        );
        let job = GenerationJob {
            tale_id: tale.id,
            components: tale.components,
            style: tale.style,
            tales: Arc::clone(&self.tales),
            generator: Arc::clone(&self.generator),
            clock: Arc::clone(&self.clock),
            deadline: self.deadline,
        };
        self.tasks.spawn(job.run().instrument(span));

        Ok(GenerationAck {
            tale_id: tale.id,
            status: TaleStatus::Generating,
        })
    }

    /// Number of generation tasks still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every running generation task to settle. Tasks started
    /// after this call are still tracked and awaited.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

/// Everything the detached task needs; owned so it outlives the request.
struct GenerationJob {
    tale_id: Uuid,
    components: TaleComponents,
    style: TaleStyle,
    tales: Arc<dyn TaleRepository>,
    generator: Arc<dyn TaleGenerator>,
    clock: Arc<dyn Clock>,
    deadline: Duration,
}

impl GenerationJob {
    async fn run(self) {
        info!("calling generator");

        let outcome = match tokio::time::timeout(
            self.deadline,
            self.generator.generate(&self.components, &self.style),
        )
        .await
        {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => Err(GenerationError::InvalidResponse(
                "generator returned blank text".into(),
            )),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GenerationError::Timeout(self.deadline)),
        };

        match outcome {
            Ok(text) => {
                match self
                    .tales
                    .record_generation_success(self.tale_id, &text, self.clock.now())
                    .await
                {
                    Ok(()) => info!(chars = text.len(), "tale generation completed"),
                    Err(DomainError::NotFound { .. }) => {
                        warn!("tale was deleted during generation; discarding text");
                    }
                    Err(e) => {
                        error!(error = %e, "failed to store generated tale");
                        self.mark_failed().await;
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "tale generation failed");
                self.mark_failed().await;
            }
        }
    }

    async fn mark_failed(&self) {
        match self
            .tales
            .record_generation_failure(self.tale_id, self.clock.now())
            .await
        {
            Ok(()) => {}
            Err(DomainError::NotFound { .. }) => {
                warn!("tale was deleted during generation");
            }
            Err(e) => error!(error = %e, "failed to mark tale as failed"),
        }
    }
}
