//! The train's manifest: bookings and the section rosters they occupy
//!
//! [`Manifest`] is plain single-threaded state. The registries in
//! [`crate::registry`] and [`crate::serial`] decide how access to it is
//! serialized.

use std::collections::HashMap;

use train_booking_core::{
    Booking, Config, DuplicateReservePolicy, Occupancy, Passenger, ReassignPolicy,
    SeatAssignment, Section, FARE,
};

use crate::error::BookingError;

/// A contact seated in a section
#[derive(Clone, Debug)]
struct RosterEntry {
    contact: String,
    seat: u32,
}

/// The contacts seated in one section, in insertion order
#[derive(Clone, Debug, Default)]
struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    fn len(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Seat `contact`, replacing their existing entry in place if any
    fn insert(&mut self, contact: &str, seat: u32) {
        match self.entries.iter_mut().find(|entry| entry.contact == contact) {
            Some(entry) => entry.seat = seat,
            None => self.entries.push(RosterEntry {
                contact: contact.to_owned(),
                seat,
            }),
        }
    }

    fn remove(&mut self, contact: &str) -> Option<RosterEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.contact == contact)?;
        Some(self.entries.remove(index))
    }

    fn contains(&self, contact: &str) -> bool {
        self.entries.iter().any(|entry| entry.contact == contact)
    }

    /// Someone other than `contact` sitting on `seat`
    fn holder(&self, seat: u32, contact: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.seat == seat && entry.contact != contact)
            .map(|entry| entry.contact.as_str())
    }

    fn contacts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.contact.as_str())
    }
}

/// Outcome of a successful reservation
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Reservation {
    /// The new booking
    pub booking: Booking,
    /// Seat of an overwritten booking whose roster entry was left behind
    pub stale: Option<SeatAssignment>,
}

/// Outcome of a successful seat change
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Reassignment {
    /// The updated booking
    pub booking: Booking,
    /// Where the passenger sat before
    pub previous: SeatAssignment,
    /// Contact of another passenger already holding the new seat
    pub shared_with: Option<String>,
    /// Whether the target section now holds more passengers than seats
    pub over_capacity: bool,
}

/// Bookings keyed by contact, plus one roster per section
///
/// Rosters only hold contacts. Names are resolved through `passengers`, the
/// latest details each contact reserved with, which outlives releases so that
/// stale roster entries still list a name.
#[derive(Clone, Debug)]
pub struct Manifest {
    config: Config,
    bookings: HashMap<String, Booking>,
    passengers: HashMap<String, Passenger>,
    rosters: [Roster; Section::ALL.len()],
}

impl Manifest {
    /// Create an empty [`Manifest`]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            bookings: HashMap::new(),
            passengers: HashMap::new(),
            rosters: Default::default(),
        }
    }

    fn roster(&self, section: Section) -> &Roster {
        &self.rosters[section.index()]
    }

    fn roster_mut(&mut self, section: Section) -> &mut Roster {
        &mut self.rosters[section.index()]
    }

    /// The next seat a reservation gets: one past the roster size of the
    /// first section that still has room
    fn next_seat(&self) -> Option<SeatAssignment> {
        Section::ALL.into_iter().find_map(|section| {
            let seat = self.roster(section).len() + 1;
            (seat <= section.capacity()).then_some(SeatAssignment { section, seat })
        })
    }

    /// Seat `passenger` on the next free seat
    ///
    /// An existing booking for the same contact is overwritten, or refused
    /// under [`DuplicateReservePolicy::Reject`]. When overwriting moves the
    /// passenger to another section, the old roster entry is kept and reported
    /// as [`Reservation::stale`].
    pub fn reserve(
        &mut self,
        passenger: Passenger,
        origin: String,
        destination: String,
    ) -> Result<Reservation, BookingError> {
        let previous = self
            .bookings
            .get(&passenger.contact)
            .map(|booking| booking.assignment);
        if previous.is_some() && self.config.duplicate_reserve == DuplicateReservePolicy::Reject
        {
            return Err(BookingError::AlreadyBooked {
                contact: passenger.contact,
            });
        }

        let assignment = self.next_seat().ok_or(BookingError::Capacity)?;
        self.roster_mut(assignment.section)
            .insert(&passenger.contact, assignment.seat);
        self.passengers
            .insert(passenger.contact.clone(), passenger.clone());

        let booking = Booking {
            passenger,
            origin,
            destination,
            fare: FARE,
            assignment,
        };
        self.bookings
            .insert(booking.passenger.contact.clone(), booking.clone());

        let stale = previous.filter(|old| old.section != assignment.section);
        Ok(Reservation { booking, stale })
    }

    /// The booking held by `contact`
    pub fn lookup(&self, contact: &str) -> Result<Booking, BookingError> {
        self.bookings
            .get(contact)
            .cloned()
            .ok_or_else(|| BookingError::not_found(contact))
    }

    /// Passengers in the roster of the section labelled `label`
    ///
    /// Unknown labels have no passengers.
    pub fn list_by_section(&self, label: &str) -> Vec<Passenger> {
        let Ok(section) = label.parse::<Section>() else {
            return Vec::new();
        };
        self.roster(section)
            .contacts()
            .filter_map(|contact| self.passengers.get(contact).cloned())
            .collect()
    }

    /// Cancel the booking of `contact` and free its seat
    pub fn release(&mut self, contact: &str) -> Result<Booking, BookingError> {
        let booking = self
            .bookings
            .remove(contact)
            .ok_or_else(|| BookingError::not_found(contact))?;
        self.roster_mut(booking.assignment.section).remove(contact);
        Ok(booking)
    }

    /// Move `contact` to `seat` in the section labelled `label`
    ///
    /// A missing booking is reported before a bad label or seat. Seat 0 never
    /// exists. Everything else is only checked under
    /// [`ReassignPolicy::Validated`].
    pub fn reassign_seat(
        &mut self,
        contact: &str,
        label: &str,
        seat: u32,
    ) -> Result<Reassignment, BookingError> {
        let previous = self
            .bookings
            .get(contact)
            .map(|booking| booking.assignment)
            .ok_or_else(|| BookingError::not_found(contact))?;
        let section = label.parse::<Section>()?;
        if seat == 0 {
            return Err(BookingError::SeatOutOfRange { section, seat });
        }
        if self.config.reassign == ReassignPolicy::Validated {
            self.validate_seat(contact, section, seat)?;
        }

        let shared_with = self
            .roster(section)
            .holder(seat, contact)
            .map(str::to_owned);

        self.roster_mut(previous.section).remove(contact);
        self.roster_mut(section).insert(contact, seat);
        let over_capacity = self.roster(section).len() > section.capacity();

        let booking = self
            .bookings
            .get_mut(contact)
            .ok_or_else(|| BookingError::not_found(contact))?;
        booking.assignment = SeatAssignment { section, seat };

        Ok(Reassignment {
            booking: booking.clone(),
            previous,
            shared_with,
            over_capacity,
        })
    }

    fn validate_seat(&self, contact: &str, section: Section, seat: u32) -> Result<(), BookingError> {
        if seat > section.capacity() {
            return Err(BookingError::SeatOutOfRange { section, seat });
        }
        let roster = self.roster(section);
        if let Some(holder) = roster.holder(seat, contact) {
            return Err(BookingError::SeatTaken {
                section,
                seat,
                holder: holder.to_owned(),
            });
        }
        let others = roster.len() - u32::from(roster.contains(contact));
        if others >= section.capacity() {
            return Err(BookingError::SectionFull { section });
        }
        Ok(())
    }

    /// Roster sizes of all sections
    pub fn occupancy(&self) -> Vec<Occupancy> {
        Section::ALL
            .into_iter()
            .map(|section| Occupancy {
                section,
                occupied: self.roster(section).len(),
                capacity: section.capacity(),
            })
            .collect()
    }

    /// Number of bookings held
    pub fn num_bookings(&self) -> usize {
        self.bookings.len()
    }
}
