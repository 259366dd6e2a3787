//! 🏗 HTTP request implementation

use std::io;
use std::io::{Read, Write};

use tiny_http::{Header, Response};
use train_booking_core::{ErrorStatus, RequestKind};
use uuid::Uuid;

/// Length of any hyphenated UUID
const UUID_LEN: usize = b"a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8".len();

/// Answer for unknown paths
const ROUTES: &str = "🚆 could not find the service you are looking for!

Valid requests are:
  POST /api/bookings
  POST /api/bookings/lookup
  POST /api/bookings/release
  POST /api/bookings/reassign
  POST /api/sections/list
  GET  /api/debug(.*)
  POST /api/debug(.*)";

struct HTTPRequest(tiny_http::Request);

impl train_booking_core::RawRequest for HTTPRequest {
    fn url(&self) -> &str {
        self.0.url()
    }

    fn method(&self) -> train_booking_core::RequestMethod {
        match self.0.method() {
            tiny_http::Method::Get => train_booking_core::RequestMethod::Get,
            tiny_http::Method::Post => train_booking_core::RequestMethod::Post,
            _ => unreachable!(),
        }
    }

    fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.0.body_length().unwrap_or(0));
        self.0.as_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn read_string(&mut self) -> io::Result<String> {
        let mut s = String::with_capacity(self.0.body_length().unwrap_or(0));
        self.0.as_reader().read_to_string(&mut s)?;
        Ok(s)
    }

    fn respond_with_err(self: Box<Self>, status: ErrorStatus, err: String, id: Uuid) {
        self.respond(
            Response::from_string(err).with_status_code(status.code()),
            id,
        )
    }

    fn respond_with_json(self: Box<Self>, body: String, id: Uuid) {
        let mut res = Response::from_string(body).with_status_code(200);
        res.add_header(header(b"Content-Type", b"application/json"));
        self.respond(res, id)
    }

    fn respond_with_string(self: Box<Self>, s: String, id: Uuid) {
        self.respond(Response::from_string(s).with_status_code(200), id)
    }

    fn respond_with_empty(self: Box<Self>, id: Uuid) {
        self.respond(Response::empty(204), id)
    }
}

impl HTTPRequest {
    /// Add HTTP headers (CORS, X-Request-Id) to `res` and send it
    fn respond<R: Read>(self, mut res: Response<R>, id: Uuid) {
        add_response_cors_headers(&mut res);

        let mut rid = Vec::<u8>::with_capacity(UUID_LEN);
        write!(&mut rid, "{}", id.hyphenated()).expect("writing to a Vec cannot fail");
        res.add_header(header(b"X-Request-Id", &rid));

        send(self.0, res);
    }
}

/// Send `res`, logging clients that hung up
fn send<R: Read>(rq: tiny_http::Request, res: Response<R>) {
    if let Err(err) = rq.respond(res) {
        tracing::warn!(%err, "HTTP response failed");
    }
}

/// Build a header from static ASCII parts
fn header(field: &[u8], value: &[u8]) -> Header {
    Header::from_bytes(field, value).expect("header parts are valid ASCII")
}

/// Parse the given HTTP request
///
/// If [`None`] is returned, the request was already answered with a
/// corresponding error message.
pub fn parse(rq: tiny_http::Request) -> Option<train_booking_core::Request> {
    use tiny_http::Method::*;

    let kind = match (rq.method(), rq.url()) {
        (Options, _) => {
            let mut res = Response::empty(204);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
        (Post, "/api/bookings") => RequestKind::Reserve,
        (Post, "/api/bookings/lookup") => RequestKind::Lookup,
        (Post, "/api/bookings/release") => RequestKind::Release,
        (Post, "/api/bookings/reassign") => RequestKind::ReassignSeat,
        (Post, "/api/sections/list") => RequestKind::ListBySection,
        (Get, url) | (Post, url) => {
            if url.starts_with("/api/debug") {
                RequestKind::Debug
            } else {
                let mut res = Response::from_string(ROUTES).with_status_code(404);
                add_response_cors_headers(&mut res);
                send(rq, res);
                return None;
            }
        }
        _ => {
            let mut res = Response::empty(405);
            add_response_cors_headers(&mut res);
            send(rq, res);
            return None;
        }
    };

    let id = rq
        .headers()
        .iter()
        .find(|hdr| hdr.field.equiv("x-request-id"))
        .and_then(|hdr| Uuid::parse_str(hdr.value.as_str()).ok())
        .unwrap_or_else(Uuid::new_v4);
    tracing::trace!(?kind, %id, url = rq.url(), "request received");

    Some(train_booking_core::Request::from_raw(
        kind,
        id,
        Box::new(HTTPRequest(rq)),
    ))
}

/// Add CORS headers to `res`
fn add_response_cors_headers<R: Read>(res: &mut Response<R>) {
    res.add_header(header(b"Access-Control-Request-Method", b"*"));
    res.add_header(header(b"Access-Control-Allow-Origin", b"*"));
    res.add_header(header(b"Access-Control-Allow-Headers", b"*"));
    res.add_header(header(b"Access-Control-Expose-Headers", b"*"));
}
