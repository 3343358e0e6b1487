//! Per-user conversation state tracking.
//!
//! Ephemeral scratch space recording where a user is in a multi-step
//! dialog: the task-creation wizard, admin-id collection, proof
//! collection, or work-link collection. At most one mode is active per
//! user at a time; free text is consumed by the active mode or ignored.
//!
//! Entries are created on dialog entry, cleared on completion or
//! cancellation, and expired after a TTL so the store cannot grow
//! without bound. Nothing here survives a process restart.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::models::task::{NewTask, TaskKind};

/// Steps of the task-creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Collecting the task title (free text).
    Title,
    /// Collecting the description (free text).
    Description,
    /// Collecting the task kind (button selection).
    Kind,
    /// Collecting the numeric target description (free text).
    Target,
    /// Collecting the reward (free text, must parse as a positive number).
    Reward,
    /// Collecting additional requirements (free text).
    Requirements,
}

impl WizardStep {
    /// 1-based position for "step N of 6" prompts.
    #[must_use]
    pub const fn position(self) -> u8 {
        match self {
            Self::Title => 1,
            Self::Description => 2,
            Self::Kind => 3,
            Self::Target => 4,
            Self::Reward => 5,
            Self::Requirements => 6,
        }
    }
}

/// Accumulating draft collected across wizard steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    /// Collected title.
    pub title: Option<String>,
    /// Collected description.
    pub description: Option<String>,
    /// Selected kind.
    pub kind: Option<TaskKind>,
    /// Collected target description.
    pub target: Option<String>,
    /// Collected reward.
    pub reward: Option<f64>,
    /// Collected requirements text.
    pub requirements: Option<String>,
}

impl TaskDraft {
    fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            kind: self.kind.unwrap_or(TaskKind::Other),
            target: self.target.unwrap_or_default(),
            reward: self.reward.unwrap_or_default(),
            requirements: self.requirements.unwrap_or_default(),
        }
    }
}

/// Input fed into the wizard: free text or a kind-button selection.
#[derive(Debug, Clone, Copy)]
pub enum WizardInput<'a> {
    /// A free-text message.
    Text(&'a str),
    /// A task-kind button selection.
    Kind(TaskKind),
}

/// Result of feeding one input into the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    /// Input accepted; prompt for the given next step.
    Advanced(WizardStep),
    /// Input rejected; re-prompt the same step.
    Reprompt(WizardStep),
    /// All steps collected; the draft is complete.
    Finished(NewTask),
}

/// Feed one input into the wizard, mutating the draft.
///
/// Invalid input (a non-positive or unparseable reward, text where a
/// button is expected) re-prompts the same step without advancing.
#[must_use]
pub fn advance_wizard(step: WizardStep, draft: &mut TaskDraft, input: WizardInput<'_>) -> WizardOutcome {
    match (step, input) {
        (WizardStep::Title, WizardInput::Text(text)) => {
            draft.title = Some(text.to_owned());
            WizardOutcome::Advanced(WizardStep::Description)
        }
        (WizardStep::Description, WizardInput::Text(text)) => {
            draft.description = Some(text.to_owned());
            WizardOutcome::Advanced(WizardStep::Kind)
        }
        (WizardStep::Kind, WizardInput::Kind(kind)) => {
            draft.kind = Some(kind);
            WizardOutcome::Advanced(WizardStep::Target)
        }
        (WizardStep::Target, WizardInput::Text(text)) => {
            draft.target = Some(text.to_owned());
            WizardOutcome::Advanced(WizardStep::Reward)
        }
        (WizardStep::Reward, WizardInput::Text(text)) => match text.trim().parse::<f64>() {
            Ok(reward) if reward > 0.0 => {
                draft.reward = Some(reward);
                WizardOutcome::Advanced(WizardStep::Requirements)
            }
            _ => WizardOutcome::Reprompt(WizardStep::Reward),
        },
        (WizardStep::Requirements, WizardInput::Text(text)) => {
            draft.requirements = Some(text.to_owned());
            WizardOutcome::Finished(draft.clone().into_new_task())
        }
        // Button where text is expected, or text where a button is
        // expected: stay on the current step.
        (step, _) => WizardOutcome::Reprompt(step),
    }
}

/// Active conversation mode for a single user.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode {
    /// Admin is walking through the task-creation wizard.
    CreatingTask {
        /// Current wizard step.
        step: WizardStep,
        /// Draft accumulated so far.
        draft: TaskDraft,
    },
    /// Main admin is about to send the id of a new admin.
    AwaitingAdminId,
    /// User is about to send a completion proof for the given task.
    AwaitingProof {
        /// Task awaiting proof.
        task_id: String,
    },
    /// Admin is about to send a work link for the given task.
    AwaitingWorkLink {
        /// Task awaiting a work link.
        task_id: String,
    },
}

struct Entry {
    mode: DialogMode,
    touched: Instant,
}

/// Session store mapping user ids to their active dialog mode.
pub struct DialogStore {
    inner: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

impl DialogStore {
    /// Create a store whose entries expire after `ttl` of inactivity.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Enter a dialog mode for a user, replacing any previous mode.
    pub async fn set(&self, user_id: &str, mode: DialogMode) {
        let mut map = self.inner.lock().await;
        map.insert(
            user_id.to_owned(),
            Entry {
                mode,
                touched: Instant::now(),
            },
        );
    }

    /// Fetch the active mode for a user, refreshing its TTL.
    ///
    /// An expired entry is removed and reported as absent.
    pub async fn get(&self, user_id: &str) -> Option<DialogMode> {
        let mut map = self.inner.lock().await;
        let expired = map
            .get(user_id)
            .is_some_and(|entry| entry.touched.elapsed() > self.ttl);
        if expired {
            map.remove(user_id);
            return None;
        }
        map.get_mut(user_id).map(|entry| {
            entry.touched = Instant::now();
            entry.mode.clone()
        })
    }

    /// Clear a user's dialog mode.
    pub async fn clear(&self, user_id: &str) {
        let mut map = self.inner.lock().await;
        map.remove(user_id);
    }

    /// Drop all expired entries and return how many were removed.
    pub async fn prune(&self) -> usize {
        let mut map = self.inner.lock().await;
        let before = map.len();
        map.retain(|_, entry| entry.touched.elapsed() <= self.ttl);
        before - map.len()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
