//! Ticket payload decoding.
//!
//! The ticket is a JWT issued by the identity provider. Its signature is
//! not checked here: the ticket only correlates an acceptance call with an
//! invitation this system already created, and the invitation id is then
//! checked against the local store.

use jsonwebtoken::dangerous::insecure_decode;
use jsonwebtoken::errors::ErrorKind;

use directory_core::error::AppError;
use directory_core::result::AppResult;

use super::claims::TicketClaims;

/// Decode the claims of a ticket without verifying its signature.
pub fn decode_ticket(ticket: &str) -> AppResult<TicketClaims> {
    let data = insecure_decode::<TicketClaims>(ticket.trim()).map_err(|e| match e.kind() {
        ErrorKind::InvalidToken => AppError::validation("Invalid ticket: not a token"),
        ErrorKind::Base64(_) => AppError::validation("Invalid ticket: segment is not base64url"),
        ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            AppError::validation("Invalid ticket: payload is not a claims object")
        }
        _ => AppError::validation(format!("Invalid ticket: {e}")),
    })?;
    Ok(data.claims)
}
