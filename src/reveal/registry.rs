//! RevealRegistry: at-most-once reveal of page sections.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RevealConfig;

use super::visibility::{IntersectionEntry, ObserveOptions, VisibilityObserver};

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Whether a section has animated into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
    Pending,
    Revealed,
}

/// How a section earns its reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Revealed when it scrolls into view.
    Standard,
    /// Above the fold: revealed after a short fixed delay.
    Hero,
}

/// Broadcast when a section flips to `Revealed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealEvent {
    pub key: String,
}

#[derive(Debug)]
struct Entry {
    state: RevealState,
    kind: SectionKind,
    mounted: bool,
}

#[derive(Default)]
struct Sections {
    entries: HashMap<String, Entry>,
    hero_timers: HashMap<String, JoinHandle<()>>,
    torn_down: bool,
}

impl Sections {
    /// Cancel hero timers and unmount every section. Returns false if the
    /// registry was already torn down.
    fn tear_down(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        for (_, handle) in self.hero_timers.drain() {
            handle.abort();
        }
        for entry in self.entries.values_mut() {
            entry.mounted = false;
        }
        self.torn_down = true;
        true
    }
}

struct Shared {
    options: ObserveOptions,
    observer: Arc<dyn VisibilityObserver>,
    sections: RwLock<Sections>,
    tx: broadcast::Sender<RevealEvent>,
}

impl Shared {
    /// Flip `key` to revealed. Returns false if it already was, or is not
    /// currently mounted.
    async fn reveal(&self, key: &str) -> bool {
        let mut sections = self.sections.write().await;
        // The firing timer must not abort itself; just forget its handle.
        sections.hero_timers.remove(key);

        let Some(entry) = sections.entries.get_mut(key) else {
            return false;
        };
        if !entry.mounted || entry.state == RevealState::Revealed {
            return false;
        }

        entry.state = RevealState::Revealed;
        if entry.kind == SectionKind::Standard {
            self.observer.unobserve(key);
        }
        drop(sections);

        info!(key = key, "Section revealed");
        let _ = self.tx.send(RevealEvent {
            key: key.to_string(),
        });
        true
    }
}

/// Tracks reveal state for every section on one page.
///
/// Owned by the page; `teardown` (or dropping the registry) releases all
/// observation and cancels pending hero reveals.
pub struct RevealRegistry {
    shared: Arc<Shared>,
    hero_delay: std::time::Duration,
}

impl RevealRegistry {
    pub fn new(config: &RevealConfig, observer: Arc<dyn VisibilityObserver>) -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                options: ObserveOptions::from(config),
                observer,
                sections: RwLock::new(Sections::default()),
                tx,
            }),
            hero_delay: config.hero_delay,
        }
    }

    /// Subscribe to reveal events.
    pub fn subscribe(&self) -> broadcast::Receiver<RevealEvent> {
        self.shared.tx.subscribe()
    }

    /// Register a mounted section under a stable key.
    ///
    /// Registering a key that is already mounted does nothing. Remounting a
    /// key that was revealed earlier on this page keeps it revealed and does
    /// not observe it again.
    pub async fn register(&self, key: &str, kind: SectionKind) -> RevealState {
        let mut sections = self.shared.sections.write().await;
        if sections.torn_down {
            debug!(key = key, "Ignoring register after teardown");
            return RevealState::Pending;
        }

        if let Some(entry) = sections.entries.get_mut(key) {
            if entry.mounted || entry.state == RevealState::Revealed {
                entry.mounted = true;
                return entry.state;
            }
            entry.mounted = true;
            entry.kind = kind;
        } else {
            sections.entries.insert(
                key.to_string(),
                Entry {
                    state: RevealState::Pending,
                    kind,
                    mounted: true,
                },
            );
        }

        match kind {
            SectionKind::Standard => {
                self.shared.observer.observe(key, &self.shared.options);
            }
            SectionKind::Hero => {
                let shared = Arc::clone(&self.shared);
                let delay = self.hero_delay;
                let owned_key = key.to_string();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.reveal(&owned_key).await;
                });
                sections.hero_timers.insert(key.to_string(), handle);
            }
        }

        debug!(key = key, kind = ?kind, "Section registered");
        RevealState::Pending
    }

    /// The section unmounted: stop observing it and cancel any pending hero
    /// reveal. A section that was already revealed stays revealed.
    pub async fn deregister(&self, key: &str) {
        let mut sections = self.shared.sections.write().await;
        if let Some(handle) = sections.hero_timers.remove(key) {
            handle.abort();
        }
        let Some(entry) = sections.entries.get_mut(key) else {
            return;
        };
        if !entry.mounted {
            return;
        }
        entry.mounted = false;
        if entry.state == RevealState::Pending && entry.kind == SectionKind::Standard {
            self.shared.observer.unobserve(key);
        }
        debug!(key = key, "Section deregistered");
    }

    /// Feed a visibility report from the observer.
    ///
    /// The first report at or above the threshold reveals the section; every
    /// later report for that key is ignored.
    pub async fn on_intersection(&self, entry: &IntersectionEntry) -> bool {
        if !self.shared.options.is_entered(entry.ratio) {
            return false;
        }
        if self.shared.sections.read().await.torn_down {
            return false;
        }
        self.shared.reveal(&entry.key).await
    }

    pub async fn state(&self, key: &str) -> Option<RevealState> {
        self.shared
            .sections
            .read()
            .await
            .entries
            .get(key)
            .map(|e| e.state)
    }

    pub async fn is_revealed(&self, key: &str) -> bool {
        self.state(key).await == Some(RevealState::Revealed)
    }

    /// Release every observer and cancel pending hero reveals. Called when
    /// the owning page unmounts.
    pub async fn teardown(&self) {
        self.shared.teardown().await;
    }
}

impl Shared {
    async fn teardown(&self) {
        if self.sections.write().await.tear_down() {
            self.observer.disconnect();
            debug!("Reveal registry torn down");
        }
    }
}

impl Drop for RevealRegistry {
    fn drop(&mut self) {
        if let Ok(mut sections) = self.shared.sections.try_write() {
            if sections.tear_down() {
                drop(sections);
                self.shared.observer.disconnect();
            }
            return;
        }

        // Sections are locked elsewhere; finish on the runtime once released.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                debug!("Reveal registry busy at drop, deferring teardown");
                let shared = Arc::clone(&self.shared);
                runtime.spawn(async move { shared.teardown().await });
            }
            Err(_) => {
                warn!("Reveal registry dropped outside a runtime while locked, observer left connected");
            }
        }
    }
}
