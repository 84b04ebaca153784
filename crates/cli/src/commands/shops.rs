//! Shop listing and deletion commands.
//!
//! Both commands drive the same [`ShopListView`] the web front end mounts per
//! request, so the CLI honors the same confirmation and in-progress rules.
//!
//! # Environment Variables
//!
//! - `DATA_SERVICE_URL` - Base URL of the shop data service
//! - `API_KEY` - Bearer token for the data service (optional)

use std::io::{self, BufRead, Write};

use partner_shops_core::ShopId;
use partner_shops_web::config::{ConfigError, DataServiceConfig};
use partner_shops_web::data::{DataError, ShopServiceClient};
use partner_shops_web::view::{
    Confirmation, DeleteOutcome, DeleteRejected, EMPTY_STATE_MESSAGE, LoadOutcome, ShopListView,
    ViewMode,
};
use thiserror::Error;

/// Errors that can occur while running a shops command.
#[derive(Debug, Error)]
pub enum ShopsCommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data service client could not be built.
    #[error("Data service error: {0}")]
    Data(#[from] DataError),

    /// The list could not be loaded.
    #[error("Failed to load shops from the data service")]
    LoadFailed,

    /// Deletion was refused before reaching the data service.
    #[error("{0}")]
    Rejected(#[from] DeleteRejected),

    /// The data service refused or failed the deletion.
    #[error("{notice} (shop {id})")]
    DeleteFailed { id: ShopId, notice: &'static str },

    /// Reading the confirmation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn connect() -> Result<ShopServiceClient, ShopsCommandError> {
    dotenvy::dotenv().ok();
    let config = DataServiceConfig::from_env()?;
    Ok(ShopServiceClient::new(&config)?)
}

async fn mount(
    client: &ShopServiceClient,
    mode: ViewMode,
    force: bool,
) -> Result<ShopListView, ShopsCommandError> {
    let mut view = ShopListView::new(mode);
    match view.load(client, force).await {
        LoadOutcome::Loaded(_) => Ok(view),
        LoadOutcome::Failed | LoadOutcome::Discarded => Err(ShopsCommandError::LoadFailed),
    }
}

/// List shops.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the list cannot be
/// loaded.
pub async fn list(refresh: bool) -> Result<(), ShopsCommandError> {
    let client = connect()?;
    let view = mount(&client, ViewMode::Public, refresh).await?;

    if view.shops().is_empty() {
        tracing::info!("{EMPTY_STATE_MESSAGE}");
        return Ok(());
    }

    for shop in view.shops() {
        let verified = if shop.verified { " [vérifiée]" } else { "" };
        let contact = shop
            .phone
            .as_ref()
            .map(|phone| format!(" {phone}"))
            .unwrap_or_default();
        tracing::info!("{:>6}  {} ({}){verified}{contact}", shop.id, shop.name, shop.kind);
    }
    tracing::info!("{} shop(s)", view.shops().len());

    Ok(())
}

/// Delete a shop after confirmation.
///
/// Without `assume_yes` the prompt is written to stdout and the answer read
/// from stdin.
///
/// # Errors
///
/// Returns an error if the shop is not listed or the data service fails the
/// deletion. A declined confirmation is not an error.
pub async fn delete(id: ShopId, assume_yes: bool) -> Result<(), ShopsCommandError> {
    let client = connect()?;
    let mut view = mount(&client, ViewMode::Admin, false).await?;
    let request = view.request_delete(id)?;

    let confirmation = if assume_yes {
        Confirmation::Accepted
    } else {
        let mut stdout = io::stdout();
        write!(stdout, "{} [o/N] ", request.prompt())?;
        stdout.flush()?;
        read_confirmation(io::stdin().lock())?
    };

    match view.delete_shop(&client, request, confirmation).await {
        None => {
            tracing::info!("Suppression annulée");
            Ok(())
        }
        Some(DeleteOutcome::Removed(id)) => {
            tracing::info!("Shop {id} deleted, {} remaining", view.shops().len());
            Ok(())
        }
        Some(DeleteOutcome::Failed { id, notice }) => {
            Err(ShopsCommandError::DeleteFailed { id, notice })
        }
        Some(DeleteOutcome::Discarded) => Err(ShopsCommandError::LoadFailed),
    }
}

/// Read one line and interpret it as a yes/no answer. Anything other than an
/// explicit yes declines.
fn read_confirmation<R: BufRead>(mut reader: R) -> io::Result<Confirmation> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let accepted = matches!(
        line.trim().to_lowercase().as_str(),
        "o" | "oui" | "y" | "yes"
    );
    Ok(Confirmation::from(accepted))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_read_confirmation() {
        for (input, expected) in [
            ("oui\n", Confirmation::Accepted),
            ("O\n", Confirmation::Accepted),
            ("yes\n", Confirmation::Accepted),
            ("\n", Confirmation::Declined),
            ("non\n", Confirmation::Declined),
            ("", Confirmation::Declined),
        ] {
            let answer = read_confirmation(Cursor::new(input)).unwrap();
            assert_eq!(answer, expected, "input={input:?}");
        }
    }

    #[test]
    fn test_delete_failed_message() {
        let err = ShopsCommandError::DeleteFailed {
            id: ShopId::new(7),
            notice: "Erreur lors de la suppression.",
        };
        assert_eq!(err.to_string(), "Erreur lors de la suppression. (shop 7)");
    }
}
