//! 🏗 Infrastructure for handling booking requests, and the types they carry.
#![warn(missing_docs)]

use std::ffi::OsStr;

mod booking;
mod request;

pub use booking::{
    Booking, ContactRequest, Occupancy, Passenger, ReassignRequest, ReserveRequest,
    SeatAssignment, Section, SectionRequest, UnknownSection, FARE, SEAT_CAPACITY,
};
pub use request::{ErrorStatus, RawRequest, Request, RequestHandler, RequestKind, RequestMethod};

/// What `reserve` does for a contact that already holds a booking
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum DuplicateReservePolicy {
    /// Replace the old booking. The old roster entry is only replaced when the
    /// new seat lands in the same section, otherwise it stays behind.
    #[default]
    Overwrite,
    /// Refuse the reservation and leave the existing booking untouched
    Reject,
}

/// How much `reassign_seat` checks about the target seat
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ReassignPolicy {
    /// Move the passenger wherever asked, even onto an occupied seat or into a
    /// full section
    #[default]
    Unchecked,
    /// Refuse seats outside the section, seats held by someone else and
    /// sections that are already full
    Validated,
}

/// Configuration of the booking system
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Behaviour of a reservation for an already booked contact
    pub duplicate_reserve: DuplicateReservePolicy,
    /// Checks applied when moving a passenger to another seat
    pub reassign: ReassignPolicy,

    /// Run the registry on a single thread fed through a channel instead of
    /// behind a lock
    pub serial: bool,
}

impl Config {
    /// Configuration with both hardening policies switched on
    pub fn strict() -> Self {
        Self {
            duplicate_reserve: DuplicateReservePolicy::Reject,
            reassign: ReassignPolicy::Validated,
            serial: false,
        }
    }
}

/// Reads a boolean switch, as found in environment variables
///
/// Anything but `0`, `false`, `no`, `off`, `n` and `f` counts as true.
pub fn is_truthy(v: &OsStr) -> bool {
    v != "0"
        && !v.eq_ignore_ascii_case("false")
        && !v.eq_ignore_ascii_case("no")
        && !v.eq_ignore_ascii_case("off")
        && !v.eq_ignore_ascii_case("n")
        && !v.eq_ignore_ascii_case("f")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_words() {
        for v in ["1", "true", "yes", "on", "TRUE", ""] {
            assert!(is_truthy(OsStr::new(v)), "{v:?}");
        }
        for v in ["0", "false", "No", "off", "n", "F"] {
            assert!(!is_truthy(OsStr::new(v)), "{v:?}");
        }
    }
}
