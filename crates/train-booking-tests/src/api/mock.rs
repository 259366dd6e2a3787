//! Mock API implementation directly using the `train-booking-registry` crate

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use train_booking_core::{ErrorStatus, RawRequest, Request, RequestHandler, RequestKind};
use uuid::Uuid;

use super::{Api, RequestMsg, Response};

pub struct MockDispatcher {
    dispatcher: Arc<train_booking_registry::Dispatcher>,
    join_handles: Vec<JoinHandle<()>>,
}

struct MockRawRequest {
    url: &'static str,
    payload: Option<Vec<u8>>,
    kind: RequestKind,
    response_channel: oneshot::Sender<Response>,
}

pub async fn start(threads: u16, config: train_booking_core::Config) -> (MockDispatcher, Api) {
    let dispatcher = Arc::new(
        tokio::task::spawn_blocking(move || train_booking_registry::launch(&config))
            .await
            .unwrap(),
    );
    tracing::debug!(threads, ?config, "mock dispatcher started");

    let it = (0..threads).map(|_| {
        let (sender, receiver) = flume::bounded::<RequestMsg>(65536);
        let dispatcher = dispatcher.clone();
        let handle = task::spawn_blocking(move || {
            let dispatcher = &*dispatcher;
            for msg in receiver.into_iter() {
                let raw = Box::new(MockRawRequest {
                    url: msg.url,
                    payload: Some(msg.payload),
                    kind: msg.kind,
                    response_channel: msg.response_channel,
                });
                dispatcher.handle(Request::from_raw(msg.kind, msg.id, raw))
            }
        });
        (sender, handle)
    });
    let (senders, join_handles) = it.unzip();

    let mock_dispatcher = MockDispatcher {
        dispatcher,
        join_handles,
    };
    (mock_dispatcher, Api::new(senders))
}

impl MockDispatcher {
    pub async fn shutdown(self) {
        for handle in self.join_handles {
            handle.await.unwrap()
        }
        task::spawn_blocking(move || Arc::into_inner(self.dispatcher).unwrap().shutdown())
            .await
            .unwrap();
    }
}

impl RawRequest for MockRawRequest {
    fn url(&self) -> &str {
        self.url
    }

    fn method(&self) -> train_booking_core::RequestMethod {
        match self.kind {
            RequestKind::Debug => train_booking_core::RequestMethod::Get,
            _ => train_booking_core::RequestMethod::Post,
        }
    }

    fn read_bytes(&mut self) -> std::io::Result<Vec<u8>> {
        Ok(self.payload.take().unwrap_or_default())
    }
    fn read_string(&mut self) -> std::io::Result<String> {
        String::from_utf8(self.payload.take().unwrap_or_default())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }

    fn respond_with_err(self: Box<Self>, status: ErrorStatus, msg: String, id: Uuid) {
        let response = Response::Error { status, msg, id };
        self.response_channel.send(response).unwrap()
    }

    fn respond_with_json(self: Box<Self>, body: String, id: Uuid) {
        let response = Response::Json { body, id };
        self.response_channel.send(response).unwrap()
    }

    fn respond_with_string(self: Box<Self>, s: String, id: Uuid) {
        let response = Response::Text { s, id };
        self.response_channel.send(response).unwrap()
    }

    fn respond_with_empty(self: Box<Self>, id: Uuid) {
        let response = Response::Empty { id };
        self.response_channel.send(response).unwrap()
    }
}
