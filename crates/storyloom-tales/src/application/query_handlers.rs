//! Query handlers for the Tales context.

use serde::Serialize;
use storyloom_core::error::DomainError;
use storyloom_core::repository::TaleRepository;
use storyloom_core::tale::Tale;
use uuid::Uuid;

use crate::application::command_handlers::load_owned_tale;

/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// One page of the caller's tales, newest first.
#[derive(Debug, Serialize)]
pub struct TalePage {
    /// The tales on this page.
    pub tales: Vec<Tale>,
    /// Whether the page was filled, meaning more tales may follow.
    pub has_more: bool,
    /// Cursor for the next page: the id of the last tale on this page.
    pub last_id: Option<Uuid>,
}

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn effective_page_size(requested: Option<u32>) -> u32 {
    requested
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
}

/// Retrieves a tale for its owner.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the tale does not exist and
/// `DomainError::PermissionDenied` if the caller is not the owner.
pub async fn get_tale(
    tale_id: Uuid,
    caller_id: &str,
    repo: &dyn TaleRepository,
) -> Result<Tale, DomainError> {
    load_owned_tale(repo, tale_id, caller_id).await
}

/// Lists the caller's tales, newest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn list_tales(
    caller_id: &str,
    limit: Option<u32>,
    start_after: Option<Uuid>,
    repo: &dyn TaleRepository,
) -> Result<TalePage, DomainError> {
    let limit = effective_page_size(limit);
    let tales = repo.list_for_user(caller_id, limit, start_after).await?;

    Ok(TalePage {
        has_more: tales.len() == limit as usize,
        last_id: tales.last().map(|tale| tale.id),
        tales,
    })
}
