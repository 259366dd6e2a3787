use eyre::Result;
use train_booking_core::{is_truthy, Config, DuplicateReservePolicy, ReassignPolicy};

mod api;
pub use api::{random_passenger, Api, ApiError, ApiResponse};

/// Whether the environment variable `name` is set to a truthy value
fn env_flag(name: &str) -> Option<bool> {
    std::env::var_os(name).map(|v| is_truthy(&v))
}

pub struct TestCtxBuilder {
    /// Whether to run the registry on a single worker thread
    pub serial: bool,
    /// Count of dispatcher threads
    pub dispatcher_threads: u16,
    /// Behaviour of duplicate reservations
    pub duplicate_reserve: DuplicateReservePolicy,
    /// Checks applied to seat changes
    pub reassign: ReassignPolicy,
}

impl TestCtxBuilder {
    /// Create a test context builder initialized with environment defaults
    ///
    /// `TRAIN_BOOKING_SERIAL` selects the single-threaded registry.
    pub fn from_env() -> Result<Self> {
        Ok(TestCtxBuilder {
            serial: env_flag("TRAIN_BOOKING_SERIAL").unwrap_or(false),
            dispatcher_threads: 2,
            duplicate_reserve: DuplicateReservePolicy::Overwrite,
            reassign: ReassignPolicy::Unchecked,
        })
    }

    /// Set the number of dispatcher threads to use
    pub fn with_dispatcher_threads(mut self, threads: u16) -> Self {
        assert_ne!(threads, 0);
        self.dispatcher_threads = threads;
        self
    }

    /// Run the registry on a single worker thread
    pub fn serial(mut self) -> Self {
        self.serial = true;
        self
    }

    /// Refuse reservations for contacts that already hold a booking
    pub fn reject_duplicates(mut self) -> Self {
        self.duplicate_reserve = DuplicateReservePolicy::Reject;
        self
    }

    /// Check seat, occupancy and capacity when reassigning
    pub fn validate_reassign(mut self) -> Self {
        self.reassign = ReassignPolicy::Validated;
        self
    }

    /// Get the [`train_booking_core::Config`] for launching the booking system
    fn config(&self) -> Config {
        Config {
            duplicate_reserve: self.duplicate_reserve,
            reassign: self.reassign,
            serial: self.serial,
        }
    }

    /// Build the test context
    pub async fn build(self) -> Result<TestCtx> {
        let config = self.config();
        let (dispatcher, api) = api::mock::start(self.dispatcher_threads, config).await;

        Ok(TestCtx {
            api,
            dispatcher,
            config,
            drop_bomb: DropBomb,
        })
    }
}

/// Test context
pub struct TestCtx {
    /// API allowing to interact with the booking system
    pub api: Api,
    dispatcher: api::mock::MockDispatcher,
    /// Configuration the booking system was launched with
    pub config: Config,

    drop_bomb: DropBomb,
}

impl TestCtx {
    /// Shut down the booking system and finish the test
    pub async fn finish(self) {
        std::mem::forget(self.drop_bomb);
        drop(self.api);
        self.dispatcher.shutdown().await
    }
}

struct DropBomb;

impl Drop for DropBomb {
    fn drop(&mut self) {
        eprintln!("@TestAuthor: You should call `ctx.finish().await` to shut the booking system down");
    }
}
