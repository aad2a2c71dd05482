use thiserror::Error;

/// Errors raised by the menu store, the admin service and the ordering service.
///
/// Resolution and projection never fail, so nothing here originates there.
#[derive(Error, Debug)]
pub enum MenuError {
    /// Input rejected before any store call was made.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure (connection dropped, permission denied, ...).
    #[error("Store unavailable: {0}")]
    Store(String),

    /// Some of the per-item order updates failed. The ones that succeeded are
    /// not rolled back.
    #[error("Reorder failed for {failed} of {total} items")]
    PartialReorder { failed: usize, total: usize },
}

impl MenuError {
    pub fn category_not_found(id: &str) -> Self {
        MenuError::NotFound(format!("Category '{}'", id))
    }

    pub fn item_not_found(category_id: &str, item_id: crate::menu::ItemId) -> Self {
        MenuError::NotFound(format!("Item {} in category '{}'", item_id, category_id))
    }
}
