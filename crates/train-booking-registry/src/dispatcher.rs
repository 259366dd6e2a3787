//! Implementation of the request dispatcher
use serde::Serialize;
use train_booking_core::{
    ContactRequest, ErrorStatus, ReassignRequest, Request, RequestHandler, RequestKind,
    ReserveRequest, SectionRequest,
};

use crate::error::BookingError;
use crate::registry::Registry;

/// Dispatcher decoding requests and handing them to the registry
///
/// ⚠️ This struct implements the [`RequestHandler`] trait and is exposed from
/// the crate root, to be served by the HTTP server and the test harness.
pub struct Dispatcher {
    registry: Box<dyn Registry>,
}

impl Dispatcher {
    /// Create a new [`Dispatcher`]
    pub fn new(registry: Box<dyn Registry>) -> Self {
        Self { registry }
    }
}

/// Answer `rq` with `result`
fn reply<T: Serialize>(rq: Request, result: Result<T, BookingError>) {
    match result {
        Ok(value) => rq.respond_with_json(&value),
        Err(err) => rq.respond_with_err(err.status(), err.to_string()),
    }
}

impl RequestHandler for Dispatcher {
    fn handle(&self, mut rq: Request) {
        match rq.kind() {
            RequestKind::Reserve => match rq.read_json::<ReserveRequest>() {
                Some(ReserveRequest {
                    passenger,
                    origin,
                    destination,
                }) => {
                    let result = self.registry.reserve(passenger, origin, destination);
                    reply(rq, result);
                }
                None => rq.respond_with_err(
                    ErrorStatus::BadRequest,
                    "No passenger and route provided!",
                ),
            },
            RequestKind::Lookup => match rq.read_json::<ContactRequest>() {
                Some(ContactRequest { contact }) => {
                    let result = self.registry.lookup(&contact);
                    reply(rq, result);
                }
                None => rq.respond_with_err(ErrorStatus::BadRequest, "No contact provided!"),
            },
            RequestKind::ListBySection => match rq.read_json::<SectionRequest>() {
                Some(SectionRequest { section }) => {
                    let passengers = self.registry.list_by_section(&section);
                    rq.respond_with_json(&passengers);
                }
                None => rq.respond_with_err(ErrorStatus::BadRequest, "No section provided!"),
            },
            RequestKind::Release => match rq.read_json::<ContactRequest>() {
                Some(ContactRequest { contact }) => match self.registry.release(&contact) {
                    Ok(()) => rq.respond_with_empty(),
                    Err(err) => rq.respond_with_err(err.status(), err.to_string()),
                },
                None => rq.respond_with_err(ErrorStatus::BadRequest, "No contact provided!"),
            },
            RequestKind::ReassignSeat => match rq.read_json::<ReassignRequest>() {
                Some(ReassignRequest {
                    contact,
                    new_section,
                    new_seat,
                }) => {
                    let result = self.registry.reassign_seat(&contact, &new_section, new_seat);
                    reply(rq, result);
                }
                None => rq.respond_with_err(
                    ErrorStatus::BadRequest,
                    "No contact and new seat provided!",
                ),
            },
            RequestKind::Debug => {
                if rq.url().ends_with("/occupancy") {
                    let occupancy = self.registry.occupancy();
                    rq.respond_with_json(&occupancy);
                } else {
                    rq.respond_with_string("Happy Debugging! 🚫🐛");
                }
            }
        }
    }

    fn shutdown(self) {
        self.registry.shutdown();
    }
}
