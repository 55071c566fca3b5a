//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::IngredientNotFound
            | Self::RecipeNotFound
            | Self::StockPresetNotFound
            | Self::TableNotFound
            | Self::ReservationNotFound
            | Self::CustomerNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::ReferenceConflict
            | Self::OrderAlreadyPaid
            | Self::MenuItemExists
            | Self::IngredientInUse
            | Self::RecipeAlreadyExists
            | Self::StockPresetNameExists
            | Self::TableOccupied
            | Self::TableAlreadyExists
            | Self::TableHasOrders
            | Self::TableHasReservations
            | Self::ReservationConflict
            | Self::CustomerHasReservations => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::BackupFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
