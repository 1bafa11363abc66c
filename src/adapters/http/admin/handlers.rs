//! HTTP handlers for the admin endpoints.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::domain::foundation::UserId;

use super::super::auth::AuthenticatedUser;
use super::super::error::ApiError;
use super::super::AppState;
use super::dto::{AdminSummaryDto, ManageAdminRequestDto, ManageAdminResponseDto, PaymentRecordDto};

/// How many ledger entries the transactions view fetches per request.
const TRANSACTIONS_PAGE_SIZE: u32 = 50;

/// POST /api/admin/manage - Admin role management.
///
/// Dispatches on the `action` field the way the callable interface does:
/// `list`, `grant`, or `revoke`. All actions are super-admin gated inside
/// the handler.
pub async fn manage_admin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ManageAdminRequestDto>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.manage_admins_handler();

    match request.action.as_str() {
        "list" => {
            let admins = handler.list(&user.user_id).await?;
            Ok(Json(ManageAdminResponseDto::admins(
                admins.into_iter().map(AdminSummaryDto::from).collect(),
            )))
        }
        "grant" => {
            let target_email = request.target_email.unwrap_or_default();
            handler.grant(&user.user_id, &target_email).await?;
            Ok(Json(ManageAdminResponseDto::message(format!(
                "{} is now an admin.",
                target_email
            ))))
        }
        "revoke" => {
            let target_uid = request
                .target_uid
                .as_deref()
                .and_then(|s| UserId::new(s).ok())
                .ok_or_else(|| ApiError::bad_request("targetUid is required"))?;
            handler.revoke(&user.user_id, &target_uid).await?;
            Ok(Json(ManageAdminResponseDto::message(
                "Admin access revoked.",
            )))
        }
        other => Err(ApiError::bad_request(format!("Unknown action: {}", other))),
    }
}

/// GET /api/admin/payments - Processed payment events, newest first.
///
/// Ledger visibility is admin-gated: the caller's user record must hold an
/// elevated role.
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state
        .users
        .find_by_id(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::forbidden("Admin access required"))?;

    if !caller.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    let records = state
        .ledger
        .list_recent_payments(TRANSACTIONS_PAGE_SIZE)
        .await?;

    let dtos: Vec<PaymentRecordDto> = records.into_iter().map(PaymentRecordDto::from).collect();
    Ok(Json(dtos))
}
