//! Two-step confirmation protocol for destructive actions.
//!
//! Deleting a shop never blocks on a confirmation primitive. The view first
//! hands out a [`DeleteRequest`] carrying the prompt to show; the caller
//! presents it however its environment allows (HTML dialog, terminal prompt)
//! and comes back with a [`Confirmation`].

use partner_shops_core::ShopId;

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(accepted: bool) -> Self {
        if accepted { Self::Accepted } else { Self::Declined }
    }
}

/// Step one of a deletion: the prompt awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    id: ShopId,
    name: String,
}

impl DeleteRequest {
    pub(crate) const fn new(id: ShopId, name: String) -> Self {
        Self { id, name }
    }

    #[must_use]
    pub const fn id(&self) -> ShopId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text of the confirmation prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Voulez-vous vraiment supprimer la boutique \"{}\" ?", self.name)
    }
}

/// A confirmed deletion whose remote call is outstanding.
///
/// Only [`super::ShopListView::confirm_delete`] creates one, and
/// [`super::ShopListView::finish_delete`] consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending delete must be resolved with finish_delete"]
pub struct PendingDelete {
    id: ShopId,
    name: String,
}

impl PendingDelete {
    pub(crate) const fn new(id: ShopId, name: String) -> Self {
        Self { id, name }
    }

    #[must_use]
    pub const fn id(&self) -> ShopId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Why a deletion could not even be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeleteRejected {
    #[error("deletion requires admin mode")]
    NotAdmin,
    #[error("shop {0} is not in the list")]
    UnknownShop(ShopId),
    #[error("deletion of shop {0} is already in progress")]
    InProgress(ShopId),
}

/// Result of resolving a [`PendingDelete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The remote call succeeded and the entry left the collection.
    Removed(ShopId),
    /// The remote call failed; `notice` is shown to the user.
    Failed { id: ShopId, notice: &'static str },
    /// The view was unmounted before the call resolved.
    Discarded,
}

/// Notice shown when a remote deletion fails.
pub const DELETE_FAILED_NOTICE: &str = "Erreur lors de la suppression.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_quotes_name() {
        let request = DeleteRequest::new(ShopId::new(7), "Boutique X".to_string());
        assert_eq!(
            request.prompt(),
            "Voulez-vous vraiment supprimer la boutique \"Boutique X\" ?"
        );
    }

    #[test]
    fn test_confirmation_from_bool() {
        assert_eq!(Confirmation::from(true), Confirmation::Accepted);
        assert_eq!(Confirmation::from(false), Confirmation::Declined);
    }
}
