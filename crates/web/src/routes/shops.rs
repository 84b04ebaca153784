//! Shop directory route handlers.
//!
//! Every request mounts a fresh [`ShopListView`], loads it through the data
//! service client (whose cache keeps this cheap) and renders the resulting
//! [`ShopListModel`]. Public and admin pages share these handlers; only the
//! [`ViewMode`] and base path differ.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use partner_shops_core::ShopId;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::view::{EMPTY_STATE_MESSAGE, ShopDetail, ShopListModel, ShopListView, ViewMode};

/// Path the public directory is mounted at.
pub const PUBLIC_BASE: &str = "/shops";
/// Path the admin directory is mounted at.
pub const ADMIN_BASE: &str = "/admin/shops";

/// List query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Bypass the data service cache.
    #[serde(default)]
    pub refresh: bool,
    /// Shop whose detail modal is open.
    pub selected: Option<ShopId>,
}

/// Confirmation dialog shown over the list before a deletion.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub id: ShopId,
    pub prompt: String,
}

/// Shop list page template.
#[derive(Template, WebTemplate)]
#[template(path = "shops/index.html")]
pub struct ShopsIndexTemplate {
    pub page: ShopListModel,
    pub base_path: &'static str,
    pub empty_message: &'static str,
    pub confirm: Option<ConfirmDialog>,
}

impl ShopsIndexTemplate {
    /// Render `page` with row links under `base_path`.
    #[must_use]
    pub fn new(page: ShopListModel, base_path: &'static str) -> Self {
        Self {
            page,
            base_path,
            empty_message: EMPTY_STATE_MESSAGE,
            confirm: None,
        }
    }

    /// Overlay a confirmation dialog.
    #[must_use]
    pub fn with_confirm(mut self, confirm: ConfirmDialog) -> Self {
        self.confirm = Some(confirm);
        self
    }
}

/// Detail modal fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shop_detail.html")]
pub struct ShopDetailTemplate {
    pub detail: ShopDetail,
    pub base_path: &'static str,
}

/// Mount a view for one request: load it, then apply the selection.
pub(crate) async fn mount_view(state: &AppState, mode: ViewMode, query: &ListQuery) -> ShopListView {
    let mut view = ShopListView::new(mode);
    view.load(state.shops(), query.refresh).await;
    view.select(query.selected);
    view
}

pub(crate) const fn base_path(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Public => PUBLIC_BASE,
        ViewMode::Admin => ADMIN_BASE,
    }
}

async fn render_index(state: &AppState, mode: ViewMode, query: &ListQuery) -> ShopsIndexTemplate {
    let view = mount_view(state, mode, query).await;
    ShopsIndexTemplate::new(ShopListModel::from_view(&view), base_path(mode))
}

async fn render_detail(state: &AppState, mode: ViewMode, id: ShopId) -> Result<ShopDetailTemplate> {
    let query = ListQuery {
        refresh: false,
        selected: Some(id),
    };
    let view = mount_view(state, mode, &query).await;
    let detail = view
        .selected()
        .map(ShopDetail::from)
        .ok_or_else(|| AppError::NotFound(format!("shop {id}")))?;

    Ok(ShopDetailTemplate {
        detail,
        base_path: base_path(mode),
    })
}

/// Display the public shop list.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ListQuery>) -> impl IntoResponse {
    render_index(&state, ViewMode::Public, &query).await
}

/// Display the admin shop list (delete affordances visible).
#[instrument(skip(state))]
pub async fn admin_index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    render_index(&state, ViewMode::Admin, &query).await
}

/// Detail modal fragment for the public list.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
) -> Result<ShopDetailTemplate> {
    render_detail(&state, ViewMode::Public, id).await
}

/// Detail modal fragment for the admin list.
#[instrument(skip(state))]
pub async fn admin_detail(
    State(state): State<AppState>,
    Path(id): Path<ShopId>,
) -> Result<ShopDetailTemplate> {
    render_detail(&state, ViewMode::Admin, id).await
}

/// Redirect to the shop's WhatsApp conversation.
#[instrument(skip(state))]
pub async fn contact(State(state): State<AppState>, Path(id): Path<ShopId>) -> Result<Redirect> {
    let shops = state.shops().list_shops(false).await?;
    let phone = shops
        .into_iter()
        .find(|shop| shop.id == id)
        .and_then(|shop| shop.phone)
        .ok_or_else(|| AppError::NotFound(format!("contact for shop {id}")))?;

    Ok(Redirect::to(&phone.whatsapp_url()))
}
