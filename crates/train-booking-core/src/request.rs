use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Kind of the request
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum RequestKind {
    /// Seat a passenger on the first free seat
    ///
    /// The payload is a [`ReserveRequest`](crate::ReserveRequest), the
    /// response the resulting [`Booking`](crate::Booking).
    Reserve,

    /// Retrieve the booking of a passenger
    ///
    /// The payload is a [`ContactRequest`](crate::ContactRequest).
    Lookup,

    /// List the passengers seated in a section
    ///
    /// The payload is a [`SectionRequest`](crate::SectionRequest), the
    /// response a list of [`Passenger`](crate::Passenger)s.
    ListBySection,

    /// Cancel the booking of a passenger
    ///
    /// The payload is a [`ContactRequest`](crate::ContactRequest), the
    /// response is empty.
    Release,

    /// Move a passenger to another seat
    ///
    /// The payload is a [`ReassignRequest`](crate::ReassignRequest), the
    /// response the updated [`Booking`](crate::Booking).
    ReassignSeat,

    /// Useful for sending information for debugging
    Debug,
}

/// Status of a failed request
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorStatus {
    /// The payload could not be understood
    BadRequest,
    /// No booking exists for the passenger
    NotFound,
    /// The request clashes with the current state of the train
    Conflict,
    /// The response could not be produced
    Internal,
}

impl ErrorStatus {
    /// HTTP status code
    #[inline]
    pub fn code(self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::NotFound => 404,
            ErrorStatus::Conflict => 409,
            ErrorStatus::Internal => 500,
        }
    }
}

/// Request sent by a booking client
pub struct Request {
    kind: RequestKind,
    id: Uuid,
    raw: Box<dyn RawRequest + Send>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("raw", &format_args!(".."))
            .finish()
    }
}

/// HTTP request method
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum RequestMethod {
    /// GET request
    Get,
    /// POST request, may have a payload
    Post,
}

/// Interface for handling booking requests
pub trait RequestHandler {
    /// Handle a request
    ///
    /// This method may be called concurrently from different threads.
    fn handle(&self, request: Request);

    /// Shut the booking system down
    ///
    /// This method waits for all threads spawned by the booking system to have
    /// terminated.
    fn shutdown(self);
}

/// A raw request, implemented by the HTTP server and the test harness
pub trait RawRequest {
    /// Get the URL
    fn url(&self) -> &str;
    /// Get the request method
    fn method(&self) -> RequestMethod;

    /// Read the request body as bytes
    fn read_bytes(&mut self) -> io::Result<Vec<u8>>;
    /// Read the request body as string
    fn read_string(&mut self) -> io::Result<String>;

    /// Respond with an error message
    fn respond_with_err(self: Box<Self>, status: ErrorStatus, err: String, id: Uuid);
    /// Respond with a JSON document
    fn respond_with_json(self: Box<Self>, body: String, id: Uuid);
    /// Respond with a plain string
    fn respond_with_string(self: Box<Self>, s: String, id: Uuid);
    /// Respond with an empty success
    fn respond_with_empty(self: Box<Self>, id: Uuid);
}

impl Request {
    /// Get the request's kind
    #[inline]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Get the request's correlation id
    ///
    /// If the client did not send one, it is randomly generated.
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the request URL, e.g., `/api/debug/occupancy`
    #[inline]
    pub fn url(&self) -> &str {
        self.raw.url()
    }

    /// Get the request method
    #[inline]
    #[allow(unused)]
    pub fn method(&self) -> RequestMethod {
        self.raw.method()
    }

    /// Read the payload as bytes
    ///
    /// Returns [`Err`] in case of a communication error. This method has side
    /// effects and should be called only once per request.
    #[inline]
    #[allow(unused)]
    pub fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        self.raw.read_bytes()
    }

    /// Read the payload as a UTF-8 string
    ///
    /// Like [`Self::read_bytes()`], this method has side effects and should be
    /// called only once per request.
    #[inline]
    #[allow(unused)]
    pub fn read_string(&mut self) -> io::Result<String> {
        self.raw.read_string()
    }

    /// Read the payload as a JSON document of type `T`
    ///
    /// In case the body is not valid JSON for `T` (or some communication error
    /// happened), [`None`] is returned.
    pub fn read_json<T: DeserializeOwned>(&mut self) -> Option<T> {
        let bytes = self.raw.read_bytes().ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Respond with an error
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_err(self, status: ErrorStatus, err: impl Into<String>) {
        self.raw.respond_with_err(status, err.into(), self.id);
    }

    /// Respond with `value` encoded as JSON
    ///
    /// This method blocks until the response has been sent.
    pub fn respond_with_json<T: Serialize + ?Sized>(self, value: &T) {
        match serde_json::to_string(value) {
            Ok(body) => self.raw.respond_with_json(body, self.id),
            Err(err) => self.raw.respond_with_err(
                ErrorStatus::Internal,
                format!("could not encode response: {err}"),
                self.id,
            ),
        }
    }

    /// Respond with an arbitrary string
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_string(self, s: impl Into<String>) {
        self.raw.respond_with_string(s.into(), self.id);
    }

    /// Respond with an empty success
    ///
    /// This method blocks until the response has been sent.
    #[inline]
    pub fn respond_with_empty(self) {
        self.raw.respond_with_empty(self.id);
    }

    /// Create a new request from a [`RawRequest`]
    #[inline]
    pub fn from_raw(kind: RequestKind, id: Uuid, raw: Box<dyn RawRequest + Send>) -> Self {
        Self { kind, id, raw }
    }
}
