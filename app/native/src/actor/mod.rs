//! Homescreen actor.
//!
//! The actor owns the notification store, the wallpaper manager, and the idle
//! clock, and processes messages one at a time. Bus events are decoded into
//! messages before they reach it; everything it produces goes out through the
//! [`DisplaySurface`].
//!
//! Blocking work (wallpaper downloads) and delays (the notification show
//! pause) run in separate tasks that post their result back as a message, so
//! state is only ever mutated inside [`HomescreenActor::handle_message`].
//!
//! # Panic Recovery
//!
//! A panicking handler is caught and logged and the actor moves on to the
//! next message.

mod handle;
pub mod handlers;
mod messages;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
pub use handle::{ActorError, HomescreenHandle};
pub use messages::{HomescreenMessage, HomescreenSnapshot, InboundEvent, SharedFetcher};
use serde_json::json;
use tokio::sync::mpsc;

use crate::config::HomescreenConfig;
use crate::constants::WALLPAPER_SETTING_KEY;
use crate::host::DisplaySurface;
use crate::idle::{BuildInfo, IdleClock};
use crate::notifications::NotificationStore;
use crate::settings::Settings;
use crate::wallpaper::WallpaperManager;

/// Channel buffer size for the actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Collaborators injected into the actor.
pub struct ActorServices {
    pub config: HomescreenConfig,
    pub wallpapers: WallpaperManager,
    pub settings: Arc<dyn Settings>,
    pub fetcher: SharedFetcher,
    pub surface: Box<dyn DisplaySurface>,
    pub build_info: BuildInfo,
}

/// The actor that owns all homescreen state.
pub struct HomescreenActor {
    store: NotificationStore,
    wallpapers: WallpaperManager,
    clock: IdleClock,
    build_info: BuildInfo,
    config: HomescreenConfig,
    settings: Arc<dyn Settings>,
    fetcher: SharedFetcher,
    surface: Box<dyn DisplaySurface>,
    ticks: u64,
    receiver: mpsc::Receiver<HomescreenMessage>,
    self_sender: mpsc::WeakSender<HomescreenMessage>,
}

impl HomescreenActor {
    /// Spawns the actor on the current tokio runtime.
    ///
    /// The persisted wallpaper is restored and published before the first
    /// message is handled.
    #[must_use]
    pub fn spawn(services: ActorServices) -> HomescreenHandle {
        tracing::debug!("spawning homescreen actor");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let handle = HomescreenHandle::new(sender);

        let ActorServices {
            config,
            mut wallpapers,
            settings,
            fetcher,
            surface,
            build_info,
        } = services;

        let persisted = settings.get(WALLPAPER_SETTING_KEY, json!(config.wallpapers.default));
        let restored = wallpapers.restore(persisted.as_str());
        tracing::info!(
            wallpaper = %restored.name,
            contract = ?surface.contract(),
            "homescreen starting"
        );

        let actor = Self {
            store: NotificationStore::new(),
            wallpapers,
            clock: IdleClock::new(),
            build_info,
            config,
            settings,
            fetcher,
            surface,
            ticks: 0,
            receiver,
            self_sender: handle.downgrade(),
        };

        tokio::spawn(actor.run());
        handle
    }

    async fn run(mut self) {
        handlers::wallpaper::publish_selection(&self.wallpapers, self.surface.as_ref());

        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, HomescreenMessage::Shutdown) {
                tracing::debug!("homescreen actor received shutdown");
                return;
            }

            let msg_name = msg.name();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.handle_message(msg);
            }));

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(
                    message = msg_name,
                    panic = %panic_msg,
                    "handler panicked, homescreen actor continues"
                );
            }
        }

        tracing::debug!("homescreen actor channel closed, exiting");
    }

    fn handle_message(&mut self, msg: HomescreenMessage) {
        let surface = self.surface.as_ref();

        match msg {
            HomescreenMessage::Bus(event) => self.handle_event(event),
            HomescreenMessage::Tick { now } => {
                self.ticks += 1;
                handlers::on_tick(&mut self.clock, &self.config.clock, surface, &now, self.ticks);
            }
            HomescreenMessage::NextWallpaper => {
                handlers::on_next_wallpaper(&mut self.wallpapers, surface, self.settings.as_ref());
            }
            HomescreenMessage::SelectWallpaper { name } => {
                handlers::on_select_wallpaper(
                    &mut self.wallpapers,
                    surface,
                    self.settings.as_ref(),
                    &name,
                );
            }
            HomescreenMessage::WallpaperFetched { url, result } => {
                handlers::on_wallpaper_fetched(
                    &mut self.wallpapers,
                    surface,
                    self.settings.as_ref(),
                    &url,
                    result,
                    Local::now().time(),
                );
            }
            HomescreenMessage::Rescan => handlers::on_rescan(&mut self.wallpapers, surface),
            HomescreenMessage::ActivateIdle => {
                let page = handlers::IdlePage {
                    clock: &mut self.clock,
                    config: &self.config.clock,
                    build_info: &self.build_info,
                    store: &self.store,
                    wallpapers: &self.wallpapers,
                };
                handlers::on_activate_idle(page, surface, &Local::now().naive_local());
            }
            HomescreenMessage::ShowNotification => {
                surface.emit(crate::events::notification::SHOW, serde_json::Value::Null);
            }
            HomescreenMessage::Query { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
            HomescreenMessage::Shutdown => {}
        }
    }

    fn handle_event(&mut self, event: InboundEvent) {
        let surface = self.surface.as_ref();

        match event {
            InboundEvent::NotificationSet(notification) => {
                if handlers::on_notification_set(&mut self.store, surface, notification) {
                    let delay = Duration::from_millis(self.config.notifications.show_delay_ms);
                    handlers::schedule_show(delay, surface, &self.self_sender);
                }
            }
            InboundEvent::NotificationPopClear(key) => {
                handlers::on_pop_clear(&mut self.store, surface, &key);
            }
            InboundEvent::NotificationPopClearDelete(key) => {
                handlers::on_pop_clear_delete(&mut self.store, surface, &key);
            }
            InboundEvent::NotificationStorageClear => {
                handlers::on_storage_clear(&mut self.store, surface);
            }
            InboundEvent::NotificationStorageItemRm(key) => {
                handlers::on_storage_item_rm(&mut self.store, surface, &key);
            }
            InboundEvent::WallpaperSet { url } => {
                handlers::on_wallpaper_set(url, Arc::clone(&self.fetcher), self.self_sender.clone());
            }
            InboundEvent::WallpaperNext => {
                handlers::on_next_wallpaper(&mut self.wallpapers, surface, self.settings.as_ref());
            }
            InboundEvent::WeatherResponse { temperature, weather_condition } => {
                handlers::on_weather_response(surface, temperature, weather_condition);
            }
            InboundEvent::AlarmsResponse { active_alarms } => {
                handlers::on_alarms_response(surface, active_alarms);
            }
        }
    }

    fn snapshot(&self) -> HomescreenSnapshot {
        HomescreenSnapshot {
            notifications: self.store.view(),
            wallpapers: self.wallpapers.collection().to_vec(),
            selected_wallpaper: self.wallpapers.selected().clone(),
            wallpaper_path: self.wallpapers.selected_path(),
            build_date: self.build_info.build_date.clone(),
            contract: self.surface.contract(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;
    use crate::actor::handlers::test_support::{Recorder, surface};
    use crate::config::{NotificationConfig, WallpaperConfig};
    use crate::events::{fields, notification, wallpaper};
    use crate::host::{HostContract, Outbound};
    use crate::notifications::Notification;
    use crate::settings::MemorySettings;
    use crate::wallpaper::LocalFetcher;
    use crate::wallpaper::processing::test_images;

    struct Harness {
        root: TempDir,
        handle: HomescreenHandle,
        out: Recorder,
        settings: Arc<MemorySettings>,
    }

    fn harness(show_delay_ms: u64, settings: MemorySettings) -> Harness {
        let root = TempDir::new().unwrap();
        let skill = root.path().join("skill");
        fs::create_dir_all(&skill).unwrap();
        for name in ["default.png", "a.png", "b.png"] {
            fs::write(skill.join(name), test_images::png()).unwrap();
        }

        let config = HomescreenConfig {
            wallpapers: WallpaperConfig {
                skill_directory: skill.display().to_string(),
                user_directory: root.path().join("user").display().to_string(),
                ..Default::default()
            },
            notifications: NotificationConfig { show_delay_ms },
            ..Default::default()
        };

        let wallpapers = WallpaperManager::new(&config.wallpapers, Path::new("/")).unwrap();
        let settings = Arc::new(settings);
        let (surface, out) = surface(HostContract::Legacy);

        let handle = HomescreenActor::spawn(ActorServices {
            config,
            wallpapers,
            settings: Arc::clone(&settings) as Arc<dyn Settings>,
            fetcher: Arc::new(LocalFetcher),
            surface,
            build_info: BuildInfo::default(),
        });

        Harness { root, handle, out, settings }
    }

    async fn settle(handle: &HomescreenHandle) -> HomescreenSnapshot {
        handle.snapshot_timeout(Duration::from_secs(5)).await.unwrap()
    }

    fn note(sender: &str, text: &str) -> Notification {
        Notification::new(sender, text, "open", "transient")
    }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let h = harness(0, MemorySettings::new());
        assert!(h.handle.is_alive());

        h.handle.shutdown().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!h.handle.is_alive());
    }

    #[tokio::test]
    async fn test_startup_restores_persisted_wallpaper() {
        let settings = MemorySettings::new();
        settings.set(WALLPAPER_SETTING_KEY, json!("b.png")).unwrap();
        let mut h = harness(0, settings);

        let snapshot = settle(&h.handle).await;
        assert_eq!(snapshot.selected_wallpaper.name, "b.png");
        assert_eq!(
            Recorder::fields(&h.out.drain(), fields::SELECTED_WALLPAPER),
            vec![json!("b.png")]
        );
    }

    #[tokio::test]
    async fn test_startup_with_stale_setting_selects_default() {
        let settings = MemorySettings::new();
        settings.set(WALLPAPER_SETTING_KEY, json!("deleted.jpg")).unwrap();
        let h = harness(0, settings);

        let snapshot = settle(&h.handle).await;
        assert_eq!(snapshot.selected_wallpaper.name, "default.png");
        assert_eq!(snapshot.wallpaper_path, h.root.path().join("skill").join("default.png"));
    }

    #[tokio::test]
    async fn test_notification_flow_through_bus() {
        let mut h = harness(0, MemorySettings::new());
        settle(&h.handle).await;
        h.out.drain();

        h.handle.dispatch(InboundEvent::NotificationSet(note("s1", "t1"))).await.unwrap();
        h.handle.dispatch(InboundEvent::NotificationSet(note("s1", "t1"))).await.unwrap();
        let snapshot = settle(&h.handle).await;

        assert_eq!(snapshot.notifications.active.len(), 1);
        assert_eq!(Recorder::triggers(&h.out.drain()), vec![notification::SHOW]);

        h.handle
            .dispatch(InboundEvent::NotificationPopClear(Notification::new("s1", "t1", "", "")))
            .await
            .unwrap();
        let snapshot = settle(&h.handle).await;

        assert!(snapshot.notifications.active.is_empty());
        assert_eq!(snapshot.notifications.archive, vec![note("s1", "t1")]);
        assert_eq!(snapshot.notifications.archive_count, 1);
    }

    #[tokio::test]
    async fn test_show_trigger_waits_for_delay() {
        let mut h = harness(30, MemorySettings::new());
        settle(&h.handle).await;
        h.out.drain();

        h.handle.dispatch(InboundEvent::NotificationSet(note("s1", "t1"))).await.unwrap();
        settle(&h.handle).await;
        let before = h.out.drain();
        assert!(Recorder::triggers(&before).is_empty());
        assert_eq!(Recorder::fields(&before, fields::NOTIFICATION_COUNTER), vec![json!(1)]);

        tokio::time::sleep(Duration::from_millis(200)).await;
        settle(&h.handle).await;
        assert_eq!(Recorder::triggers(&h.out.drain()), vec![notification::SHOW]);
    }

    #[tokio::test]
    async fn test_next_wallpaper_persists_selection() {
        let h = harness(0, MemorySettings::new());

        h.handle.next_wallpaper().await.unwrap();
        let snapshot = settle(&h.handle).await;

        // Collection is a.png, b.png, default.png; next wraps from the default.
        assert_eq!(snapshot.selected_wallpaper.name, "a.png");
        assert_eq!(h.settings.get_str(WALLPAPER_SETTING_KEY).as_deref(), Some("a.png"));
    }

    #[tokio::test]
    async fn test_wallpaper_set_downloads_off_task_and_commits() {
        let mut h = harness(0, MemorySettings::new());
        let source = h.root.path().join("download.jpg");
        fs::write(&source, test_images::jpeg()).unwrap();
        settle(&h.handle).await;
        h.out.drain();

        h.handle
            .dispatch(InboundEvent::WallpaperSet { url: format!("file://{}", source.display()) })
            .await
            .unwrap();

        let mut changed = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            settle(&h.handle).await;
            if Recorder::triggers(&h.out.drain()).iter().any(|t| t == wallpaper::CHANGED) {
                changed = true;
                break;
            }
        }
        assert!(changed);

        let snapshot = settle(&h.handle).await;
        assert!(snapshot.selected_wallpaper.name.starts_with("wallpaper-"));
        assert!(snapshot.wallpapers.contains(&snapshot.selected_wallpaper));
    }

    #[tokio::test]
    async fn test_wallpaper_set_missing_source_reports_error() {
        let mut h = harness(0, MemorySettings::new());
        settle(&h.handle).await;
        h.out.drain();

        h.handle
            .dispatch(InboundEvent::WallpaperSet { url: "file:///nonexistent/x.jpg".into() })
            .await
            .unwrap();

        let mut errors: Vec<Outbound> = Vec::new();
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            settle(&h.handle).await;
            errors.extend(h.out.drain());
            if !Recorder::triggers(&errors).is_empty() {
                break;
            }
        }
        assert_eq!(Recorder::triggers(&errors), vec![wallpaper::ERROR]);

        let snapshot = settle(&h.handle).await;
        assert_eq!(snapshot.selected_wallpaper.name, "default.png");
        assert_eq!(h.settings.get(WALLPAPER_SETTING_KEY, Value::Null), Value::Null);
    }

    #[tokio::test]
    async fn test_tick_counts_toward_weather_request() {
        let mut h = harness(0, MemorySettings::new());
        settle(&h.handle).await;
        h.out.drain();

        let now = Local::now().naive_local();
        for _ in 0..crate::constants::DEFAULT_WEATHER_EVERY_TICKS {
            h.handle.tick(now).await.unwrap();
        }
        settle(&h.handle).await;

        let triggers = Recorder::triggers(&h.out.drain());
        assert_eq!(triggers, vec![
            crate::events::weather::REQUEST,
            crate::events::alarms::QUERY
        ]);
    }
}
