//! Registry owned by a single worker thread
//!
//! Instead of sharing the manifest behind a lock, [`SerialRegistry`] moves it
//! onto one thread and sends every operation there as a [`Command`]. The
//! channel serializes the operations the same way the lock does.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use train_booking_core::{Booking, Config, Occupancy, Passenger};

use crate::error::BookingError;
use crate::manifest::{Manifest, Reassignment, Reservation};
use crate::registry::{self, Registry};

enum Command {
    Reserve {
        passenger: Passenger,
        origin: String,
        destination: String,
        reply: Sender<Result<Reservation, BookingError>>,
    },
    Lookup {
        contact: String,
        reply: Sender<Result<Booking, BookingError>>,
    },
    ListBySection {
        section: String,
        reply: Sender<Vec<Passenger>>,
    },
    Release {
        contact: String,
        reply: Sender<Result<Booking, BookingError>>,
    },
    ReassignSeat {
        contact: String,
        section: String,
        seat: u32,
        reply: Sender<Result<Reassignment, BookingError>>,
    },
    Occupancy {
        reply: Sender<Vec<Occupancy>>,
    },
}

/// The worker's main routine: apply commands until every sender is gone
fn run(mut manifest: Manifest, commands: Receiver<Command>) {
    // A caller that went away no longer needs its reply, so send errors are
    // ignored.
    for command in commands {
        match command {
            Command::Reserve {
                passenger,
                origin,
                destination,
                reply,
            } => {
                let _ = reply.send(manifest.reserve(passenger, origin, destination));
            }
            Command::Lookup { contact, reply } => {
                let _ = reply.send(manifest.lookup(&contact));
            }
            Command::ListBySection { section, reply } => {
                let _ = reply.send(manifest.list_by_section(&section));
            }
            Command::Release { contact, reply } => {
                let _ = reply.send(manifest.release(&contact));
            }
            Command::ReassignSeat {
                contact,
                section,
                seat,
                reply,
            } => {
                let _ = reply.send(manifest.reassign_seat(&contact, &section, seat));
            }
            Command::Occupancy { reply } => {
                let _ = reply.send(manifest.occupancy());
            }
        }
    }
    tracing::debug!("booking worker stopped");
}

/// Registry whose manifest lives on a dedicated thread
pub struct SerialRegistry {
    commands: Sender<Command>,
    worker: JoinHandle<()>,
}

impl SerialRegistry {
    /// Spawn the worker thread and create a [`SerialRegistry`]
    pub fn spawn(config: Config) -> Self {
        let (commands, receiver) = unbounded();
        let manifest = Manifest::new(config);
        let worker = thread::Builder::new()
            .name(String::from("booking_worker"))
            .spawn(move || run(manifest, receiver))
            .expect("failed to spawn booking worker");
        Self { commands, worker }
    }

    /// Send a command and wait for its reply
    fn call<T>(&self, command: impl FnOnce(Sender<T>) -> Command) -> T {
        let (reply, response) = bounded(1);
        self.commands
            .send(command(reply))
            .expect("booking worker stopped");
        response.recv().expect("booking worker dropped a command")
    }
}

impl Registry for SerialRegistry {
    fn reserve(
        &self,
        passenger: Passenger,
        origin: String,
        destination: String,
    ) -> Result<Booking, BookingError> {
        let contact = passenger.contact.clone();
        let result = self.call(|reply| Command::Reserve {
            passenger,
            origin,
            destination,
            reply,
        });
        registry::reserved(&contact, result)
    }

    fn lookup(&self, contact: &str) -> Result<Booking, BookingError> {
        let result = self.call(|reply| Command::Lookup {
            contact: contact.to_owned(),
            reply,
        });
        registry::looked_up(contact, result)
    }

    fn list_by_section(&self, section: &str) -> Vec<Passenger> {
        let passengers = self.call(|reply| Command::ListBySection {
            section: section.to_owned(),
            reply,
        });
        registry::listed(section, passengers)
    }

    fn release(&self, contact: &str) -> Result<(), BookingError> {
        let result = self.call(|reply| Command::Release {
            contact: contact.to_owned(),
            reply,
        });
        registry::released(contact, result)
    }

    fn reassign_seat(
        &self,
        contact: &str,
        section: &str,
        seat: u32,
    ) -> Result<Booking, BookingError> {
        let result = self.call(|reply| Command::ReassignSeat {
            contact: contact.to_owned(),
            section: section.to_owned(),
            seat,
            reply,
        });
        registry::reassigned(contact, result)
    }

    fn occupancy(&self) -> Vec<Occupancy> {
        self.call(|reply| Command::Occupancy { reply })
    }

    fn shutdown(self: Box<Self>) {
        let SerialRegistry { commands, worker } = *self;
        // closing the channel ends the worker's loop
        drop(commands);
        worker.join().unwrap();
    }
}
