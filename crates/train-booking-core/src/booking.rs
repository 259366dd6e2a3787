//! Passengers, seats and bookings as they travel over the wire

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of seats in every section
pub const SEAT_CAPACITY: u32 = 50;

/// Price of every ticket, whatever the route
pub const FARE: u32 = 20;

/// A section of the train
///
/// The set of sections is closed. Reservations fill them in the order of
/// [`Section::ALL`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Section {
    /// Front section, filled first
    A,
    /// Rear section, used once `A` is full
    B,
}

impl Section {
    /// All sections in allocation order
    pub const ALL: [Section; 2] = [Section::A, Section::B];

    /// Number of seats in this section
    #[inline]
    pub fn capacity(self) -> u32 {
        SEAT_CAPACITY
    }

    /// Label used on the wire
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Section::A => "A",
            Section::B => "B",
        }
    }

    /// Position in [`Section::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A section label that names none of the train's sections
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("unknown section `{0}`")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.label() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

/// A passenger, identified by their contact address
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact address, unique per passenger
    pub contact: String,
}

impl Passenger {
    /// Create a new [`Passenger`]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            contact: contact.into(),
        }
    }
}

/// A specific seat of the train
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Section the seat is in
    pub section: Section,
    /// Seat number within the section, starting at 1
    pub seat: u32,
}

impl fmt::Display for SeatAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section, self.seat)
    }
}

/// A passenger's ticket: who travels, where to, and on which seat
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// The travelling passenger
    pub passenger: Passenger,
    /// Where the trip starts
    pub origin: String,
    /// Where the trip ends
    pub destination: String,
    /// Price paid
    pub fare: u32,
    /// The seat held, serialized as `section` and `seat`
    #[serde(flatten)]
    pub assignment: SeatAssignment,
}

/// Payload of a reservation
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    /// The passenger to seat
    pub passenger: Passenger,
    /// Where the trip starts
    pub origin: String,
    /// Where the trip ends
    pub destination: String,
}

/// Payload naming a passenger by contact address
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Contact address of the passenger
    pub contact: String,
}

/// Payload naming a section
///
/// The label is kept as a string: listing an unknown section is not an error.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    /// Section label
    pub section: String,
}

/// Payload of a seat change
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignRequest {
    /// Contact address of the passenger
    pub contact: String,
    /// Label of the section to move to
    pub new_section: String,
    /// Seat number to move to
    pub new_seat: u32,
}

/// How full a section is
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Occupancy {
    /// The section
    pub section: Section,
    /// Entries currently in the section's roster
    pub occupied: u32,
    /// Seats in the section
    pub capacity: u32,
}
