//! HTTP handlers for the portal endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::application::handlers::admin::UpdateProfileCommand;
use crate::domain::foundation::{BookingId, InvoiceId};
use crate::ports::ProfileUpdate;

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::AppState;
use super::dto::{BookingDto, InvoiceDto, UpdateProfileRequestDto, UpdateProfileResponseDto};

/// POST /api/profile - Update the authenticated user's own profile.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequestDto>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.update_profile_handler();

    handler
        .handle(UpdateProfileCommand {
            user_id: user.user_id,
            update: ProfileUpdate {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                new_email: request.new_email,
            },
        })
        .await?;

    Ok(Json(UpdateProfileResponseDto {
        success: true,
        message: "Profile updated successfully.".to_string(),
    }))
}

/// GET /api/invoices/{id} - Invoice ledger read.
pub async fn get_invoice(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice_id: InvoiceId = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid invoice id"))?;

    let invoice = state
        .ledger
        .get_invoice(&invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice not found"))?;

    Ok(Json(InvoiceDto::from(invoice)))
}

/// GET /api/bookings/{id} - Booking ledger read.
pub async fn get_booking(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let booking_id: BookingId = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid booking id"))?;

    let booking = state
        .ledger
        .get_booking(&booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    Ok(Json(BookingDto::from(booking)))
}
