//! Server implementation

#![warn(missing_docs)]

mod http;
mod settings;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use eyre::{bail, Result, WrapErr};
use train_booking_core::RequestHandler;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

/// Command line options
#[derive(Debug)]
struct Opts {
    /// Settings after all layers have been applied
    settings: Settings,
}

impl Opts {
    /// Load the settings file, then apply the command line on top
    fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();

        let config_path = args
            .iter()
            .position(|arg| arg == "-config")
            .map(|i| match args.get(i + 1) {
                Some(path) => Ok(PathBuf::from(path)),
                None => Err(eyre::eyre!("-config takes a path")),
            })
            .transpose()?;
        let mut settings = Settings::load(config_path.as_deref())?;

        let mut option: Option<String> = None;
        for arg in args {
            if let Some(opt) = option {
                match opt.as_str() {
                    "-config" => {}
                    "-port" => {
                        settings.port = arg.parse().wrap_err("-port takes a decimal u16")?
                    }
                    "-host" => settings.host = arg,
                    "-worker-threads" => {
                        settings.worker_threads = arg
                            .parse()
                            .wrap_err("-worker-threads takes a decimal u32")?
                    }
                    _ => bail!("unknown option {opt}"),
                }
                option = None;
            } else {
                match arg.as_str() {
                    "-serial" => settings.serial = true,
                    "-reject-duplicates" => settings.reject_duplicates = true,
                    "-validate-reassign" => settings.validate_reassign = true,
                    _ => option = Some(arg),
                }
            }
        }
        if let Some(opt) = option {
            bail!("leftover option {opt}");
        }
        if settings.worker_threads == 0 {
            bail!("at least one worker thread is required");
        }

        Ok(Opts { settings })
    }
}

/// How often an idle worker checks whether it should stop
const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn http_loop<H: RequestHandler>(server: &tiny_http::Server, handler: &H, stop: &AtomicBool) {
    while !stop.load(Ordering::Relaxed) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(rq)) => {
                if let Some(rq) = http::parse(rq) {
                    handler.handle(rq);
                }
            }
            Ok(None) => {}
            Err(err) => tracing::error!(%err, "HTTP receive failed"),
        }
    }
}

/// Serve `server` on `worker_threads` threads
///
/// If a worker cannot be spawned, the ones already running are stopped and
/// the error is returned.
fn serve<H: RequestHandler + Sync>(
    server: &tiny_http::Server,
    handler: &H,
    worker_threads: u32,
) -> Result<()> {
    let stop = AtomicBool::new(false);
    thread::scope(|s| {
        for i in 0..worker_threads {
            let spawned = thread::Builder::new()
                .name(format!("worker_{i}"))
                .spawn_scoped(s, || http_loop(server, handler, &stop));
            if let Err(err) = spawned {
                stop.store(true, Ordering::Relaxed);
                return Err(err).wrap_err("could not spawn worker thread");
            }
        }
        Ok(())
    })
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "train_booking=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Opts { settings } = Opts::from_args()?;

    let server = tiny_http::Server::http((settings.host.as_str(), settings.port))
        .map_err(|err| eyre::eyre!(err))
        .wrap_err_with(|| format!("could not listen on {}:{}", settings.host, settings.port))?;
    tracing::info!(
        host = %settings.host,
        port = settings.port,
        worker_threads = settings.worker_threads,
        "server is listening"
    );

    let dispatcher = train_booking_registry::launch(&settings.config());
    serve(&server, &dispatcher, settings.worker_threads)
}
