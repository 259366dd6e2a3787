//! Implementation of the lock-guarded booking registry

use parking_lot::Mutex;
use train_booking_core::{Booking, Config, Occupancy, Passenger};

use crate::error::BookingError;
use crate::manifest::{Manifest, Reassignment, Reservation};

/// The five booking operations, plus an occupancy snapshot
///
/// Every call observes and changes the manifest as one step: calls are
/// totally ordered, and no call sees another one half done.
pub trait Registry: Send + Sync {
    /// Seat `passenger` on the first free seat
    fn reserve(
        &self,
        passenger: Passenger,
        origin: String,
        destination: String,
    ) -> Result<Booking, BookingError>;

    /// The booking held by `contact`
    fn lookup(&self, contact: &str) -> Result<Booking, BookingError>;

    /// Passengers seated in the section labelled `section`
    fn list_by_section(&self, section: &str) -> Vec<Passenger>;

    /// Cancel the booking held by `contact`
    fn release(&self, contact: &str) -> Result<(), BookingError>;

    /// Move `contact` to `seat` in the section labelled `section`
    fn reassign_seat(
        &self,
        contact: &str,
        section: &str,
        seat: u32,
    ) -> Result<Booking, BookingError>;

    /// Roster sizes of all sections
    fn occupancy(&self) -> Vec<Occupancy>;

    /// Stop any threads owned by the registry
    fn shutdown(self: Box<Self>) {}
}

/// Registry keeping the whole manifest behind one lock
pub struct BookingRegistry {
    manifest: Mutex<Manifest>,
}

impl BookingRegistry {
    /// Create an empty [`BookingRegistry`]
    pub fn new(config: Config) -> Self {
        Self {
            manifest: Mutex::new(Manifest::new(config)),
        }
    }
}

impl Registry for BookingRegistry {
    fn reserve(
        &self,
        passenger: Passenger,
        origin: String,
        destination: String,
    ) -> Result<Booking, BookingError> {
        let contact = passenger.contact.clone();
        let result = self.manifest.lock().reserve(passenger, origin, destination);
        reserved(&contact, result)
    }

    fn lookup(&self, contact: &str) -> Result<Booking, BookingError> {
        let result = self.manifest.lock().lookup(contact);
        looked_up(contact, result)
    }

    fn list_by_section(&self, section: &str) -> Vec<Passenger> {
        let passengers = self.manifest.lock().list_by_section(section);
        listed(section, passengers)
    }

    fn release(&self, contact: &str) -> Result<(), BookingError> {
        let result = self.manifest.lock().release(contact);
        released(contact, result)
    }

    fn reassign_seat(
        &self,
        contact: &str,
        section: &str,
        seat: u32,
    ) -> Result<Booking, BookingError> {
        let result = self.manifest.lock().reassign_seat(contact, section, seat);
        reassigned(contact, result)
    }

    fn occupancy(&self) -> Vec<Occupancy> {
        self.manifest.lock().occupancy()
    }
}

// The functions below turn manifest outcomes into log events. Registries call
// them after the manifest has been let go of.

pub(crate) fn reserved(
    contact: &str,
    result: Result<Reservation, BookingError>,
) -> Result<Booking, BookingError> {
    match result {
        Ok(Reservation { booking, stale }) => {
            if let Some(stale) = stale {
                tracing::warn!(
                    contact,
                    %stale,
                    seat = %booking.assignment,
                    "booking overwritten, old roster entry left behind"
                );
            }
            tracing::info!(contact, seat = %booking.assignment, "seat reserved");
            Ok(booking)
        }
        Err(err) => {
            match &err {
                BookingError::Capacity => tracing::warn!(contact, "train is full"),
                _ => tracing::info!(contact, %err, "reservation refused"),
            }
            Err(err)
        }
    }
}

pub(crate) fn looked_up(
    contact: &str,
    result: Result<Booking, BookingError>,
) -> Result<Booking, BookingError> {
    tracing::debug!(contact, found = result.is_ok(), "booking lookup");
    result
}

pub(crate) fn listed(section: &str, passengers: Vec<Passenger>) -> Vec<Passenger> {
    tracing::debug!(section, count = passengers.len(), "section listed");
    passengers
}

pub(crate) fn released(
    contact: &str,
    result: Result<Booking, BookingError>,
) -> Result<(), BookingError> {
    match result {
        Ok(booking) => {
            tracing::info!(contact, seat = %booking.assignment, "booking released");
            Ok(())
        }
        Err(err) => {
            tracing::debug!(contact, %err, "release refused");
            Err(err)
        }
    }
}

pub(crate) fn reassigned(
    contact: &str,
    result: Result<Reassignment, BookingError>,
) -> Result<Booking, BookingError> {
    match result {
        Ok(Reassignment {
            booking,
            previous,
            shared_with,
            over_capacity,
        }) => {
            let seat = booking.assignment;
            if let Some(holder) = shared_with {
                tracing::warn!(contact, %seat, holder = %holder, "seat now shared by two passengers");
            }
            if over_capacity {
                tracing::warn!(contact, section = %seat.section, "section over capacity");
            }
            tracing::info!(contact, %previous, %seat, "seat reassigned");
            Ok(booking)
        }
        Err(err) => {
            tracing::info!(contact, %err, "reassignment refused");
            Err(err)
        }
    }
}
