//! Client portal HTTP endpoints: profile updates and ledger reads.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BookingDto, InvoiceDto, LedgerPaymentDto, UpdateProfileRequestDto, UpdateProfileResponseDto,
};
pub use handlers::{get_booking, get_invoice, update_profile};
pub use routes::portal_routes;
