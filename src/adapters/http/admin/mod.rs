//! Admin HTTP endpoints: role management and the transactions view.

mod dto;
mod handlers;
mod routes;

pub use dto::{AdminSummaryDto, ManageAdminRequestDto, ManageAdminResponseDto, PaymentRecordDto};
pub use handlers::{list_payments, manage_admin};
pub use routes::admin_routes;
