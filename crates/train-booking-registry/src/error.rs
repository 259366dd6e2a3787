//! Errors reported by the registry

use thiserror::Error;
use train_booking_core::{ErrorStatus, Section, UnknownSection};

/// Why a registry operation was refused
///
/// Every error is detected before the registry state is touched, so a failed
/// operation never leaves a partial change behind.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum BookingError {
    /// No booking exists for the contact
    #[error("no booking found for `{contact}`")]
    NotFound { contact: String },

    /// Every section is at capacity
    #[error("train is full")]
    Capacity,

    /// The contact already holds a booking and duplicates are rejected
    #[error("`{contact}` already holds a booking")]
    AlreadyBooked { contact: String },

    /// Another passenger sits on the requested seat
    #[error("seat {seat} in section {section} is taken by `{holder}`")]
    SeatTaken {
        section: Section,
        seat: u32,
        holder: String,
    },

    /// The requested section has no room left
    #[error("section {section} is full")]
    SectionFull { section: Section },

    /// The seat number does not exist in the section
    #[error("section {section} has no seat {seat}")]
    SeatOutOfRange { section: Section, seat: u32 },

    /// The section label names no section of the train
    #[error(transparent)]
    UnknownSection(#[from] UnknownSection),
}

impl BookingError {
    pub(crate) fn not_found(contact: &str) -> Self {
        BookingError::NotFound {
            contact: contact.to_owned(),
        }
    }

    /// Status to report the error with
    pub fn status(&self) -> ErrorStatus {
        match self {
            BookingError::NotFound { .. } => ErrorStatus::NotFound,
            BookingError::Capacity
            | BookingError::AlreadyBooked { .. }
            | BookingError::SeatTaken { .. }
            | BookingError::SectionFull { .. } => ErrorStatus::Conflict,
            BookingError::SeatOutOfRange { .. } | BookingError::UnknownSection(_) => {
                ErrorStatus::BadRequest
            }
        }
    }
}
