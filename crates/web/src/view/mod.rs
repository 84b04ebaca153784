//! Shop list view state.
//!
//! [`ShopListView`] owns everything the shop directory page shows: the shop
//! collection, the loading flag, the selected shop and the per-row deletion
//! markers. It performs no I/O itself. Each remote operation is split into a
//! `begin`/`finish` pair around the collaborator call, so a resolution that
//! arrives after [`ShopListView::unmount`] is ignored instead of mutating a
//! dead view. The async helpers [`ShopListView::load`] and
//! [`ShopListView::delete_shop`] chain the pairs for callers that hold the
//! view across the await.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut view = ShopListView::new(ViewMode::Admin);
//! view.load(&client, false).await;
//!
//! let request = view.request_delete(ShopId::new(7))?;
//! // show request.prompt() to the user, then:
//! let outcome = view.delete_shop(&client, request, Confirmation::Accepted).await;
//! ```

mod confirm;
mod render;

pub use confirm::{
    Confirmation, DELETE_FAILED_NOTICE, DeleteOutcome, DeleteRejected, DeleteRequest,
    PendingDelete,
};
pub use render::{
    ContactPanel, DeleteAffordance, EMPTY_STATE_MESSAGE, ShopDetail, ShopListModel, ShopRow,
};

use std::collections::HashSet;

use partner_shops_core::{Shop, ShopId};

use crate::data::{DataError, ShopSource};

/// Whether destructive affordances are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Public,
    Admin,
}

impl ViewMode {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Handle for an outstanding load. Stale tickets are ignored on completion.
#[derive(Debug)]
#[must_use = "a load ticket must be resolved with finish_load"]
pub struct LoadTicket {
    generation: u64,
}

/// Result of resolving a [`LoadTicket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with this many shops.
    Loaded(usize),
    /// The collaborator failed; the previous collection is kept.
    Failed,
    /// The view was unmounted, or a newer load superseded this one.
    Discarded,
}

/// State of the partner shop list.
#[derive(Debug, Clone)]
pub struct ShopListView {
    mode: ViewMode,
    shops: Vec<Shop>,
    loading: bool,
    selected: Option<ShopId>,
    deleting: HashSet<ShopId>,
    mounted: bool,
    generation: u64,
}

impl ShopListView {
    /// Mount a new, empty view. It starts in the loading state.
    #[must_use]
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            shops: Vec::new(),
            loading: true,
            selected: None,
            deleting: HashSet::new(),
            mounted: true,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a deletion of `id` is outstanding.
    #[must_use]
    pub fn is_deleting(&self, id: ShopId) -> bool {
        self.deleting.contains(&id)
    }

    /// Look up a shop in the current collection.
    #[must_use]
    pub fn shop(&self, id: ShopId) -> Option<&Shop> {
        self.shops.iter().find(|shop| shop.id == id)
    }

    /// The highlighted shop, if any. Drives the detail modal.
    #[must_use]
    pub fn selected(&self) -> Option<&Shop> {
        self.selected.and_then(|id| self.shop(id))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Mark the view as loading and hand out a ticket for the request.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of a load.
    ///
    /// Clears the loading flag whether the request succeeded or not. On
    /// success the whole collection is replaced; on failure it is kept.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Shop>, DataError>,
    ) -> LoadOutcome {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!("Dropping stale shop list load");
            return LoadOutcome::Discarded;
        }

        self.loading = false;

        match result {
            Ok(shops) => {
                self.shops = dedupe_by_id(shops);
                LoadOutcome::Loaded(self.shops.len())
            }
            Err(e) => {
                // Rendered like an empty directory; only the log tells them apart.
                tracing::warn!(error = %e, "Failed to load shops");
                LoadOutcome::Failed
            }
        }
    }

    /// Load the collection from `source`, bypassing its cache when `force`.
    pub async fn load<S: ShopSource>(&mut self, source: &S, force: bool) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = source.fetch_shops(force).await;
        self.finish_load(ticket, result)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Highlight a shop, or close the detail modal with `None`.
    ///
    /// Selecting an id that is not in the collection closes the modal.
    pub fn select(&mut self, id: Option<ShopId>) {
        self.selected = id.filter(|id| self.shop(*id).is_some());
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Step one: ask for confirmation to delete `id`.
    ///
    /// # Errors
    ///
    /// Rejected outside admin mode, for unknown ids, and while a deletion of
    /// the same id is outstanding.
    pub fn request_delete(&self, id: ShopId) -> Result<DeleteRequest, DeleteRejected> {
        if !self.mode.is_admin() {
            return Err(DeleteRejected::NotAdmin);
        }
        if self.is_deleting(id) {
            return Err(DeleteRejected::InProgress(id));
        }
        let shop = self.shop(id).ok_or(DeleteRejected::UnknownShop(id))?;
        Ok(DeleteRequest::new(id, shop.name.clone()))
    }

    /// Step two: branch on the user's answer.
    ///
    /// `Declined` has no side effect. `Accepted` marks the row as being
    /// deleted and returns the pending deletion, unless one is already
    /// outstanding for that id or the view is gone.
    pub fn confirm_delete(
        &mut self,
        request: DeleteRequest,
        confirmation: Confirmation,
    ) -> Option<PendingDelete> {
        if confirmation == Confirmation::Declined || !self.mounted {
            return None;
        }

        let id = request.id();
        if !self.deleting.insert(id) {
            return None;
        }

        Some(PendingDelete::new(id, request.name().to_string()))
    }

    /// Step three: apply the collaborator's answer.
    ///
    /// The deletion marker is cleared in every case. Success removes exactly
    /// the deleted entry; failure leaves the collection untouched.
    pub fn finish_delete(
        &mut self,
        pending: PendingDelete,
        result: Result<(), DataError>,
    ) -> DeleteOutcome {
        let id = pending.id();
        self.deleting.remove(&id);

        if !self.mounted {
            return DeleteOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                self.shops.retain(|shop| shop.id != id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
                tracing::info!(shop_id = %id, name = %pending.name(), "Shop deleted");
                DeleteOutcome::Removed(id)
            }
            Err(e) => {
                tracing::error!(shop_id = %id, error = %e, "Failed to delete shop");
                DeleteOutcome::Failed {
                    id,
                    notice: DELETE_FAILED_NOTICE,
                }
            }
        }
    }

    /// Confirm and run a deletion against `source`.
    ///
    /// Returns `None` when the deletion was declined or suppressed.
    pub async fn delete_shop<S: ShopSource>(
        &mut self,
        source: &S,
        request: DeleteRequest,
        confirmation: Confirmation,
    ) -> Option<DeleteOutcome> {
        let pending = self.confirm_delete(request, confirmation)?;
        let result = source.delete_shop(pending.id()).await;
        Some(self.finish_delete(pending, result))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Discard all state. Later resolutions become no-ops.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
        self.shops.clear();
        self.selected = None;
        self.deleting.clear();
    }
}

/// Keep the first occurrence of each id.
fn dedupe_by_id(shops: Vec<Shop>) -> Vec<Shop> {
    let mut seen = HashSet::with_capacity(shops.len());
    let total = shops.len();
    let unique: Vec<Shop> = shops.into_iter().filter(|shop| seen.insert(shop.id)).collect();

    if unique.len() != total {
        tracing::warn!(
            duplicates = total - unique.len(),
            "Data service returned duplicate shop ids"
        );
    }

    unique
}
