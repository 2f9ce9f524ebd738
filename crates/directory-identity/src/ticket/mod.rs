//! Invitation ticket decoding.

pub mod claims;
pub mod decoder;

pub use claims::TicketClaims;
pub use decoder::decode_ticket;
