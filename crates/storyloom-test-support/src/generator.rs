//! Scripted `TaleGenerator` implementations for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use storyloom_core::generator::{GenerationError, TaleGenerator};
use storyloom_core::tale::{TaleComponents, TaleStyle};
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
enum Outcome {
    Text(String),
    Timeout(Duration),
    Transport(String),
    InvalidResponse(String),
}

/// A generator that returns a fixed outcome on every call. Optionally gated:
/// a gated generator holds every call until `release` is invoked, so tests
/// can observe the tale while it is `Generating`.
#[derive(Debug)]
pub struct ScriptedGenerator {
    outcome: Outcome,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Succeeds with `text`.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Text(text.into()))
    }

    /// Fails with `GenerationError::Timeout`.
    #[must_use]
    pub fn timeout(after: Duration) -> Self {
        Self::with_outcome(Outcome::Timeout(after))
    }

    /// Fails with `GenerationError::Transport`.
    #[must_use]
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Transport(message.into()))
    }

    /// Fails with `GenerationError::InvalidResponse`.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::InvalidResponse(message.into()))
    }

    /// Holds each call until `release` is invoked.
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Lets one held call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaleGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _components: &TaleComponents,
        _style: &TaleStyle,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        match &self.outcome {
            Outcome::Text(text) => Ok(text.clone()),
            Outcome::Timeout(after) => Err(GenerationError::Timeout(*after)),
            Outcome::Transport(message) => Err(GenerationError::Transport(message.clone())),
            Outcome::InvalidResponse(message) => {
                Err(GenerationError::InvalidResponse(message.clone()))
            }
        }
    }
}

/// A generator whose calls never complete. Only a deadline ends them.
#[derive(Debug)]
pub struct StalledGenerator;

#[async_trait]
impl TaleGenerator for StalledGenerator {
    async fn generate(
        &self,
        _components: &TaleComponents,
        _style: &TaleStyle,
    ) -> Result<String, GenerationError> {
        std::future::pending().await
    }
}
