//! :train: The seat booking registry of a single train.
//!
//! The [manifest] holds the bookings and section rosters. It is served either
//! behind one lock by the [registry] or by a single worker thread in [serial]
//! mode. The [dispatcher] decodes requests and hands them to whichever is
//! running.

#![allow(rustdoc::private_intra_doc_links)]
use train_booking_core::Config;

mod dispatcher;
mod error;
mod manifest;
mod registry;
mod serial;

pub use dispatcher::Dispatcher;
pub use error::BookingError;
pub use manifest::{Manifest, Reassignment, Reservation};
pub use registry::{BookingRegistry, Registry};
pub use serial::SerialRegistry;

/// Entrypoint of the booking system
///
/// Constructs a dispatcher which is served requests by the surrounding
/// infrastructure.
pub fn launch(config: &Config) -> Dispatcher {
    tracing::info!(
        serial = config.serial,
        duplicate_reserve = ?config.duplicate_reserve,
        reassign = ?config.reassign,
        "launching booking registry"
    );

    if config.serial {
        return Dispatcher::new(Box::new(SerialRegistry::spawn(*config)));
    }

    Dispatcher::new(Box::new(BookingRegistry::new(*config)))
}
