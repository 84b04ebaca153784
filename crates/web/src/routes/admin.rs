//! Admin deletion flow.
//!
//! Deletion is a two-step exchange. `GET /admin/shops/{id}/delete` renders
//! the list with a confirmation dialog over it; the dialog posts
//! `confirm=yes` or `confirm=no` back to the same path.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use partner_shops_core::ShopId;
use serde::Deserialize;
use tracing::instrument;

use super::shops::{ADMIN_BASE, ConfirmDialog, ListQuery, ShopsIndexTemplate, mount_view};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::view::{Confirmation, DeleteOutcome, ShopListModel, ViewMode};

/// Answer posted from the confirmation dialog.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirm: String,
}

impl DeleteForm {
    fn confirmation(&self) -> Confirmation {
        Confirmation::from(matches!(
            self.confirm.trim().to_lowercase().as_str(),
            "yes" | "oui" | "true"
        ))
    }
}

/// Step one: show the confirmation dialog.
#[instrument(skip(state))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
) -> Result<ShopsIndexTemplate> {
    let view = mount_view(&state, ViewMode::Admin, &ListQuery::default()).await;
    let request = view.request_delete(id)?;

    add_breadcrumb("shops", "Requested shop deletion", [("shop_id", id.to_string())]);

    let dialog = ConfirmDialog {
        id,
        prompt: request.prompt(),
    };

    Ok(ShopsIndexTemplate::new(ShopListModel::from_view(&view), ADMIN_BASE).with_confirm(dialog))
}

/// Step two: act on the answer.
///
/// A declined confirmation redirects back to the unchanged list. An accepted
/// one calls the data service and renders the list after removal, or with a
/// failure notice when the call failed.
#[instrument(skip(state, form))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let mut view = mount_view(&state, ViewMode::Admin, &ListQuery::default()).await;
    let request = view.request_delete(id)?;

    let Some(outcome) = view
        .delete_shop(state.shops(), request, form.confirmation())
        .await
    else {
        tracing::debug!(shop_id = %id, "Deletion declined");
        return Ok(Redirect::to(ADMIN_BASE).into_response());
    };

    let model = ShopListModel::from_view(&view);
    let page = match outcome {
        DeleteOutcome::Removed(_) => model,
        DeleteOutcome::Failed { notice, .. } => model.with_notice(notice),
        DeleteOutcome::Discarded => {
            return Err(AppError::Internal("view unmounted during deletion".to_string()));
        }
    };

    Ok(ShopsIndexTemplate::new(page, ADMIN_BASE).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_form_confirmation() {
        for (raw, expected) in [
            ("yes", Confirmation::Accepted),
            ("Oui", Confirmation::Accepted),
            ("no", Confirmation::Declined),
            ("", Confirmation::Declined),
        ] {
            let form = DeleteForm {
                confirm: raw.to_string(),
            };
            assert_eq!(form.confirmation(), expected, "confirm={raw:?}");
        }
    }
}
