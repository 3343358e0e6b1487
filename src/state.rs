//! Shared application state handed to Slack callbacks and background
//! tasks.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::config::GlobalConfig;
use crate::dialog::DialogStore;
use crate::managers::admins::AdminManager;
use crate::managers::links::{PendingQueue, TrackingLinks};
use crate::managers::tasks::TaskManager;
use crate::managers::users::UserManager;
use crate::persistence::db::Database;
use crate::slack::client::SlackService;

/// Shared state for the whole application.
///
/// Owns the store client; nothing else in the crate holds a pool of its
/// own. Managers are thin handles over the pool and are constructed on
/// demand.
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<GlobalConfig>,
    /// Store client.
    pub db: Arc<Database>,
    /// Slack service, absent when running without credentials.
    pub slack: Option<Arc<SlackService>>,
    /// Per-user conversation state.
    pub dialogs: DialogStore,
}

impl AppState {
    /// Build the state from its parts.
    #[must_use]
    pub fn new(
        config: Arc<GlobalConfig>,
        db: Arc<Database>,
        slack: Option<Arc<SlackService>>,
    ) -> Self {
        let ttl = Duration::from_secs(config.dialog_ttl_seconds);
        Self {
            config,
            db,
            slack,
            dialogs: DialogStore::new(ttl),
        }
    }

    /// Task manager bound to the shared store client.
    #[must_use]
    pub fn tasks(&self) -> TaskManager {
        TaskManager::new(Arc::clone(&self.db))
    }

    /// User manager bound to the shared store client.
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(Arc::clone(&self.db))
    }

    /// Admin manager bound to the shared store client.
    #[must_use]
    pub fn admins(&self) -> AdminManager {
        AdminManager::new(Arc::clone(&self.db), self.config.main_admin_id.clone())
    }

    /// Tracking link manager bound to the shared store client.
    #[must_use]
    pub fn tracking(&self) -> TrackingLinks {
        TrackingLinks::new(Arc::clone(&self.db))
    }

    /// Pending work-link queue bound to the shared store client.
    #[must_use]
    pub fn pending(&self) -> PendingQueue {
        PendingQueue::new(Arc::clone(&self.db))
    }
}

/// Late-bound slot for [`AppState`].
///
/// The Slack listener must be running before the final state (which
/// holds the Slack service) can exist, so the listener is given this
/// slot instead and reads it on each event. Events arriving before the
/// slot is filled are dropped.
#[derive(Default)]
pub struct AppStateSlot(OnceLock<Arc<AppState>>);

impl AppStateSlot {
    /// Fill the slot. A second call is a no-op.
    pub fn fill(&self, state: Arc<AppState>) {
        let _ = self.0.set(state);
    }

    /// The state, if already filled.
    #[must_use]
    pub fn get(&self) -> Option<Arc<AppState>> {
        self.0.get().cloned()
    }
}
