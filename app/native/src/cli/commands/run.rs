//! `homescreen run`: serves the message bus on stdin/stdout.
//!
//! Each stdin line is one `{ "event": ..., "data": ... }` envelope. Each
//! stdout line is one [`Outbound`] message. A malformed line is logged and
//! skipped; end of input shuts the event loop down.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::actor::{
    ActorServices, HomescreenActor, HomescreenHandle, HomescreenMessage, InboundEvent,
};
use crate::config::LoadedConfig;
use crate::constants::DEFAULT_TICK_SECS;
use crate::error::HomescreenError;
use crate::host::{HostCapabilities, HostContract, Outbound};
use crate::idle::BuildInfo;
use crate::settings::{JsonFileSettings, Settings};
use crate::wallpaper::watcher::watch_user_directory;
use crate::wallpaper::{LocalFetcher, WallpaperManager};

/// Arguments for `homescreen run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Seconds between clock ticks.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TICK_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_secs: u64,
}

impl Default for RunArgs {
    fn default() -> Self { Self { tick_secs: DEFAULT_TICK_SECS } }
}

/// Runs the event loop until stdin closes.
///
/// # Errors
///
/// Returns an error if the runtime cannot start, the wallpaper directories
/// cannot be prepared, or stdin cannot be read.
pub fn execute(args: &RunArgs, loaded: &LoadedConfig) -> Result<(), HomescreenError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("homescreen")
        .build()?;

    runtime.block_on(serve(args, loaded))
}

async fn serve(args: &RunArgs, loaded: &LoadedConfig) -> Result<(), HomescreenError> {
    let config = loaded.config.clone();
    let base_dir = loaded.base_dir();

    let wallpapers = WallpaperManager::new(&config.wallpapers, &base_dir)?;
    let user_dir = wallpapers.user_dir().to_path_buf();
    let settings: Arc<dyn Settings> =
        Arc::new(JsonFileSettings::open(&config.settings_file(&base_dir)));
    let contract = HostContract::detect(HostCapabilities::from_config(&config.host));
    let build_info = BuildInfo::load(&config.device);
    let watch = config.wallpapers.watch_user_directory;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_outbound(outbound_rx, tokio::io::stdout()));

    let handle = HomescreenActor::spawn(ActorServices {
        config,
        wallpapers,
        settings,
        fetcher: Arc::new(LocalFetcher),
        surface: contract.surface(outbound_tx),
        build_info,
    });

    if watch {
        let watcher_handle = handle.clone();
        watch_user_directory(user_dir, move || {
            watcher_handle.blocking_send(HomescreenMessage::Rescan).is_ok()
        });
    }

    handle.activate_idle().await?;
    let ticker = tokio::spawn(tick_loop(handle.clone(), Duration::from_secs(args.tick_secs)));

    let result = read_inbound(&handle, BufReader::new(tokio::io::stdin())).await;

    ticker.abort();
    if let Err(err) = handle.send_async(HomescreenMessage::Shutdown).await {
        tracing::debug!(error = %err, "event loop already stopped");
    }
    drop(handle);
    if let Err(err) = writer.await {
        tracing::warn!(error = %err, "output writer task failed");
    }

    result
}

/// Sends a clock tick every `period`.
async fn tick_loop(handle: HomescreenHandle, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and the idle page was just published.
    interval.tick().await;

    loop {
        interval.tick().await;
        if handle.tick(Local::now().naive_local()).await.is_err() {
            return;
        }
    }
}

/// Decodes bus lines and forwards them to the actor until end of input.
async fn read_inbound<R>(handle: &HomescreenHandle, reader: R) -> Result<(), HomescreenError>
where R: AsyncBufRead + Unpin {
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match InboundEvent::from_json_line(line) {
            Ok(event) => {
                tracing::trace!(event = event.name(), "bus event");
                handle.dispatch(event).await?;
            }
            Err(err) => tracing::warn!(error = %err, "ignoring malformed bus line"),
        }
    }

    tracing::debug!("input closed, stopping");
    Ok(())
}

/// Writes outbound messages as JSON lines until every sender is gone.
async fn write_outbound<W>(mut receiver: mpsc::UnboundedReceiver<Outbound>, mut writer: W)
where W: AsyncWrite + Unpin {
    while let Some(message) = receiver.recv().await {
        let mut line = match serde_json::to_vec(&message) {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode outbound message");
                continue;
            }
        };
        line.push(b'\n');

        if let Err(err) = writer.write_all(&line).await {
            tracing::warn!(error = %err, "output closed, dropping view-model updates");
            return;
        }
        if let Err(err) = writer.flush().await {
            tracing::warn!(error = %err, "failed to flush output");
            return;
        }
    }
}
