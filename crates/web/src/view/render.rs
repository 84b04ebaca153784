//! Display model derived from [`ShopListView`].
//!
//! Templates and the CLI render these plain structs; they never reach into
//! the view state directly.

use partner_shops_core::{Shop, ShopId};

use super::ShopListView;

/// Shown instead of rows when the collection is empty.
pub const EMPTY_STATE_MESSAGE: &str = "Aucune boutique répertoriée";

/// Everything needed to draw the shop list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopListModel {
    pub is_admin: bool,
    pub loading: bool,
    pub rows: Vec<ShopRow>,
    pub detail: Option<ShopDetail>,
    /// Blocking notice (e.g. a failed deletion).
    pub notice: Option<String>,
}

/// One line of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopRow {
    pub id: ShopId,
    pub name: String,
    pub kind: String,
    pub image: String,
    pub verified: bool,
    /// `None` outside admin mode.
    pub delete: Option<DeleteAffordance>,
}

/// Admin-only delete button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAffordance {
    pub disabled: bool,
}

/// Content of the detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopDetail {
    pub id: ShopId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub contact: Option<ContactPanel>,
}

/// WhatsApp contact block, present only when the shop has a phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPanel {
    pub phone: String,
    pub url: String,
}

impl ShopListModel {
    #[must_use]
    pub fn from_view(view: &ShopListView) -> Self {
        let is_admin = view.mode().is_admin();

        let rows = view
            .shops()
            .iter()
            .map(|shop| ShopRow {
                id: shop.id,
                name: shop.name.clone(),
                kind: shop.kind.clone(),
                image: shop.image.clone(),
                verified: shop.verified,
                delete: is_admin.then(|| DeleteAffordance {
                    disabled: view.is_deleting(shop.id),
                }),
            })
            .collect();

        Self {
            is_admin,
            loading: view.is_loading(),
            rows,
            detail: view.selected().map(ShopDetail::from),
            notice: None,
        }
    }

    /// Attach a notice to display above the list.
    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// True when loading finished and there is nothing to list.
    #[must_use]
    pub const fn show_empty_state(&self) -> bool {
        !self.loading && self.rows.is_empty()
    }
}

impl From<&Shop> for ShopDetail {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id,
            name: shop.name.clone(),
            image: shop.image.clone(),
            description: shop.description.clone(),
            contact: shop.phone.as_ref().map(|phone| ContactPanel {
                phone: phone.to_string(),
                url: phone.whatsapp_url(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::super::tests::{shop, sample_shops};
    use super::super::{Confirmation, ViewMode};
    use super::*;

    fn loaded(mode: ViewMode, shops: Vec<Shop>) -> ShopListView {
        let mut view = ShopListView::new(mode);
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(shops));
        view
    }

    #[test]
    fn test_row_count_matches_collection_with_unique_ids() {
        for n in [1, 2, 5, 20] {
            let shops: Vec<Shop> = (1..=n).map(|i| shop(i, &format!("Boutique {i}"))).collect();
            let model = ShopListModel::from_view(&loaded(ViewMode::Public, shops));

            assert_eq!(model.rows.len(), usize::try_from(n).unwrap());
            let ids: HashSet<ShopId> = model.rows.iter().map(|r| r.id).collect();
            assert_eq!(ids.len(), model.rows.len());
            assert!(!model.show_empty_state());
        }
    }

    #[test]
    fn test_empty_collection_shows_empty_state() {
        let model = ShopListModel::from_view(&loaded(ViewMode::Public, vec![]));
        assert!(model.rows.is_empty());
        assert!(model.show_empty_state());
    }

    #[test]
    fn test_loading_hides_empty_state() {
        let model = ShopListModel::from_view(&ShopListView::new(ViewMode::Public));
        assert!(model.loading);
        assert!(!model.show_empty_state());
    }

    #[test]
    fn test_public_mode_has_no_delete_affordance() {
        let model = ShopListModel::from_view(&loaded(ViewMode::Public, sample_shops()));
        assert!(!model.is_admin);
        assert!(model.rows.iter().all(|row| row.delete.is_none()));
    }

    #[test]
    fn test_admin_mode_disables_row_being_deleted() {
        let mut view = loaded(ViewMode::Admin, sample_shops());
        let request = view.request_delete(ShopId::new(7)).unwrap();
        let _pending = view.confirm_delete(request, Confirmation::Accepted).unwrap();

        let model = ShopListModel::from_view(&view);
        for row in &model.rows {
            let delete = row.delete.as_ref().unwrap();
            assert_eq!(delete.disabled, row.id == ShopId::new(7));
        }
    }

    #[test]
    fn test_detail_shows_contact_only_with_phone() {
        let mut view = loaded(ViewMode::Public, sample_shops());

        view.select(Some(ShopId::new(3)));
        let detail = ShopListModel::from_view(&view).detail.unwrap();
        assert_eq!(detail.name, "Chez Awa");
        assert_eq!(detail.description, "Description de Chez Awa");
        let contact = detail.contact.unwrap();
        assert_eq!(contact.url, "https://wa.me/2250700000003");

        view.select(Some(ShopId::new(1)));
        let detail = ShopListModel::from_view(&view).detail.unwrap();
        assert_eq!(detail.name, "Boutique A");
        assert!(detail.contact.is_none());

        view.select(None);
        assert!(ShopListModel::from_view(&view).detail.is_none());
    }
}
