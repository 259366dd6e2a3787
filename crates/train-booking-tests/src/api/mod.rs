use std::sync::Arc;

use eyre::{eyre, Result};
use flume::Sender;
use nanorand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;
use train_booking_core::{
    Booking, ContactRequest, ErrorStatus, Occupancy, Passenger, ReassignRequest, RequestKind,
    ReserveRequest, SectionRequest,
};
use uuid::Uuid;

pub mod mock;

#[derive(Debug, Error)]
#[error("Error {status}: {msg}")]
pub struct ApiError {
    pub status: u16,
    pub msg: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum Response {
    Error {
        status: ErrorStatus,
        msg: String,
        id: Uuid,
    },
    Json {
        body: String,
        id: Uuid,
    },
    Text {
        s: String,
        id: Uuid,
    },
    Empty {
        id: Uuid,
    },
}

impl Response {
    fn into_api_response_json<T: DeserializeOwned>(
        self,
        rq_kind: RequestKind,
    ) -> Result<ApiResponse<T>> {
        Ok(match self {
            Response::Error { status, msg, id } => ApiResponse::failed(id, status, msg),
            Response::Json { body, id } => ApiResponse {
                request_id: id,
                result: Ok(serde_json::from_str(&body)?),
            },
            resp => panic!("{rq_kind:?} must not be answered by {resp:?}"),
        })
    }
}

struct RequestMsg {
    kind: RequestKind,
    url: &'static str,
    payload: Vec<u8>,
    id: Uuid,
    response_channel: oneshot::Sender<Response>,
}

pub struct Api {
    /// One channel per dispatcher thread
    channels: Arc<Vec<Sender<RequestMsg>>>,

    my_channel: Sender<RequestMsg>,
    my_index: usize,
}

impl Api {
    fn new(channels: Vec<Sender<RequestMsg>>) -> Self {
        let my_channel = channels[0].clone();
        Self {
            channels: Arc::new(channels),
            my_channel,
            my_index: 0,
        }
    }
}

impl Clone for Api {
    fn clone(&self) -> Self {
        let my_index = (self.my_index + 1) % self.channels.len();
        Self {
            channels: self.channels.clone(),
            my_channel: self.channels[my_index].clone(),
            my_index,
        }
    }
}

fn url(kind: RequestKind) -> &'static str {
    use RequestKind::*;
    match kind {
        Reserve => "/api/bookings",
        Lookup => "/api/bookings/lookup",
        Release => "/api/bookings/release",
        ReassignSeat => "/api/bookings/reassign",
        ListBySection => "/api/sections/list",
        Debug => "/api/debug/occupancy",
    }
}

impl Api {
    async fn make_request(&self, kind: RequestKind, payload: Vec<u8>) -> Result<Response> {
        let (sender, receiver) = oneshot::channel();
        let msg = RequestMsg {
            kind,
            url: url(kind),
            payload,
            id: Uuid::new_v4(),
            response_channel: sender,
        };
        self.my_channel.send_async(msg).await?;
        Ok(receiver.await?)
    }

    async fn make_json_request<P: Serialize, T: DeserializeOwned>(
        &self,
        kind: RequestKind,
        payload: &P,
    ) -> Result<ApiResponse<T>> {
        let response = self.make_request(kind, serde_json::to_vec(payload)?);
        response.await?.into_api_response_json(kind)
    }

    pub async fn reserve(
        &self,
        passenger: &Passenger,
        origin: &str,
        destination: &str,
    ) -> Result<ApiResponse<Booking>> {
        let payload = ReserveRequest {
            passenger: passenger.clone(),
            origin: origin.into(),
            destination: destination.into(),
        };
        self.make_json_request(RequestKind::Reserve, &payload).await
    }

    pub async fn lookup(&self, contact: &str) -> Result<ApiResponse<Booking>> {
        let payload = ContactRequest {
            contact: contact.into(),
        };
        self.make_json_request(RequestKind::Lookup, &payload).await
    }

    pub async fn list_by_section(&self, section: &str) -> Result<ApiResponse<Vec<Passenger>>> {
        let payload = SectionRequest {
            section: section.into(),
        };
        self.make_json_request(RequestKind::ListBySection, &payload)
            .await
    }

    pub async fn release(&self, contact: &str) -> Result<ApiResponse<()>> {
        let kind = RequestKind::Release;
        let payload = serde_json::to_vec(&ContactRequest {
            contact: contact.into(),
        })?;
        Ok(match self.make_request(kind, payload).await? {
            Response::Error { status, msg, id } => ApiResponse::failed(id, status, msg),
            Response::Empty { id } => ApiResponse {
                request_id: id,
                result: Ok(()),
            },
            resp => panic!("{kind:?} must not be answered by {resp:?}"),
        })
    }

    pub async fn reassign_seat(
        &self,
        contact: &str,
        section: &str,
        seat: u32,
    ) -> Result<ApiResponse<Booking>> {
        let payload = ReassignRequest {
            contact: contact.into(),
            new_section: section.into(),
            new_seat: seat,
        };
        self.make_json_request(RequestKind::ReassignSeat, &payload)
            .await
    }

    pub async fn occupancy(&self) -> Result<ApiResponse<Vec<Occupancy>>> {
        let kind = RequestKind::Debug;
        let response = self.make_request(kind, Vec::new());
        response.await?.into_api_response_json(kind)
    }

    /// Send `payload` as is, and return the error or the raw response body
    pub async fn send_raw(&self, kind: RequestKind, payload: &str) -> Result<ApiResponse<String>> {
        Ok(match self.make_request(kind, payload.into()).await? {
            Response::Error { status, msg, id } => ApiResponse::failed(id, status, msg),
            Response::Json { body, id } | Response::Text { s: body, id } => ApiResponse {
                request_id: id,
                result: Ok(body),
            },
            Response::Empty { id } => ApiResponse {
                request_id: id,
                result: Ok(String::new()),
            },
        })
    }
}

/// A passenger with a random contact address
pub fn random_passenger() -> Passenger {
    let mut bytes = [0u8; 16];
    nanorand::tls_rng().fill(&mut bytes);
    let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
    Passenger::new("Random", "Traveller", format!("{}@example.com", id.simple()))
}

pub struct ApiResponse<T> {
    pub request_id: Uuid,
    pub result: ApiResult<T>,
}

impl<T> ApiResponse<T> {
    fn failed(request_id: Uuid, status: ErrorStatus, msg: String) -> Self {
        ApiResponse {
            request_id,
            result: Err(ApiError {
                status: status.code(),
                msg,
            }),
        }
    }

    /// Status code of a failed request
    pub fn status(&self) -> Result<u16> {
        match &self.result {
            Ok(_) => Err(eyre!("request succeeded when it shall have failed")),
            Err(err) => Ok(err.status),
        }
    }
}
