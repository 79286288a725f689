use std::sync::Arc;
use std::time::Duration;

use skmis_core::{AppError, AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction};
use tracing::{info, warn};

use crate::{Notification, NotificationLevel, Notifier, RecordGateway};

/// Visual weight of the confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmTone {
    /// Neutral, reversible action.
    Primary,
    /// Reversible but disruptive action.
    Warning,
    /// Irreversible action.
    Danger,
}

/// Records targeted by a pending action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// One record through the single-record endpoint.
    Single(RecordId),
    /// Many records through one batched call.
    Bulk(Vec<RecordId>),
}

impl ActionTarget {
    /// Returns the number of targeted records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Bulk(ids) => ids.len(),
        }
    }

    /// Returns whether no record is targeted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mutating action awaiting operator confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmAction {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Confirm button label.
    pub confirm_text: String,
    /// Confirm button tone.
    pub tone: ConfirmTone,
    /// Lifecycle transition to run.
    pub action: RecordAction,
    /// Targeted records.
    pub target: ActionTarget,
    /// Notification text on success.
    pub success_message: String,
    /// Notification text on failure without a server-supplied message.
    pub error_message: String,
}

impl ConfirmAction {
    /// Builds the dialog for a single-record transition.
    #[must_use]
    pub fn for_record<R: ManagedRecord>(action: RecordAction, id: RecordId) -> Self {
        let label = R::LABEL;
        let message = match action {
            RecordAction::Archive => {
                format!("Archive this {label}? It can be restored later.")
            }
            RecordAction::Restore => format!("Restore this {label}?"),
            RecordAction::Delete => {
                format!("Permanently delete this {label}? This cannot be undone.")
            }
        };

        Self {
            title: format!("{} {}", action.verb(), capitalize(label)),
            message,
            confirm_text: action.verb().to_owned(),
            tone: tone_for(action),
            action,
            target: ActionTarget::Single(id),
            success_message: format!("{} {} successfully.", capitalize(label), action.past_tense()),
            error_message: format!("Failed to {} {label}.", action.as_str()),
        }
    }

    /// Builds the dialog for a batched transition.
    pub fn for_bulk<R: ManagedRecord>(action: RecordAction, ids: Vec<RecordId>) -> AppResult<Self> {
        if ids.is_empty() {
            return Err(AppError::Validation(format!(
                "no selected {} records can be {}",
                R::LABEL,
                action.past_tense()
            )));
        }

        let label = R::LABEL;
        let count = ids.len();
        let irreversible = if action == RecordAction::Delete {
            " This cannot be undone."
        } else {
            ""
        };

        Ok(Self {
            title: format!("{} {count} {label} records", action.verb()),
            message: format!(
                "{} {count} selected {label} records?{irreversible}",
                action.verb()
            ),
            confirm_text: format!("{} {count}", action.verb()),
            tone: tone_for(action),
            action,
            target: ActionTarget::Bulk(ids),
            success_message: format!("{count} {label} records {} successfully.", action.past_tense()),
            error_message: format!("Failed to {} selected {label} records.", action.as_str()),
        })
    }
}

fn tone_for(action: RecordAction) -> ConfirmTone {
    match action {
        RecordAction::Archive => ConfirmTone::Warning,
        RecordAction::Restore => ConfirmTone::Primary,
        RecordAction::Delete => ConfirmTone::Danger,
    }
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dispatcher lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatcherState {
    /// No dialog open.
    Idle,
    /// One dialog open.
    PendingConfirmation(ConfirmAction),
    /// Confirmed action in flight; action controls are disabled.
    Executing,
}

/// Result of a confirmed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Backend accepted the transition.
    Succeeded {
        /// Transition that ran.
        action: RecordAction,
        /// Number of targeted records.
        count: usize,
    },
    /// Backend rejected the transition; an error notification was shown.
    Failed {
        /// Transition that was attempted.
        action: RecordAction,
        /// Message shown to the operator.
        message: String,
    },
}

/// Single-dialog confirmation state machine that maps confirmed actions to
/// backend calls and reports the result through the notifier.
pub struct ActionDispatcher<R: ManagedRecord> {
    gateway: Arc<dyn RecordGateway<R>>,
    notifier: Arc<dyn Notifier>,
    notification_duration: Duration,
    state: DispatcherState,
}

impl<R: ManagedRecord> ActionDispatcher<R> {
    /// Creates an idle dispatcher.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RecordGateway<R>>,
        notifier: Arc<dyn Notifier>,
        notification_duration: Duration,
    ) -> Self {
        Self {
            gateway,
            notifier,
            notification_duration,
            state: DispatcherState::Idle,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    /// Returns the open dialog, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&ConfirmAction> {
        match &self.state {
            DispatcherState::PendingConfirmation(action) => Some(action),
            DispatcherState::Idle | DispatcherState::Executing => None,
        }
    }

    /// Returns whether a confirmed action is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state == DispatcherState::Executing
    }

    /// Opens a dialog, replacing any open one; returns the replaced dialog.
    pub fn request_confirmation(
        &mut self,
        action: ConfirmAction,
    ) -> AppResult<Option<ConfirmAction>> {
        if self.is_busy() {
            return Err(AppError::Conflict(
                "another action is still in progress".to_owned(),
            ));
        }

        let previous = std::mem::replace(
            &mut self.state,
            DispatcherState::PendingConfirmation(action),
        );
        Ok(match previous {
            DispatcherState::PendingConfirmation(replaced) => Some(replaced),
            DispatcherState::Idle | DispatcherState::Executing => None,
        })
    }

    /// Closes the open dialog without side effects.
    pub fn cancel(&mut self) -> Option<ConfirmAction> {
        match std::mem::replace(&mut self.state, DispatcherState::Idle) {
            DispatcherState::PendingConfirmation(action) => Some(action),
            DispatcherState::Executing => {
                self.state = DispatcherState::Executing;
                None
            }
            DispatcherState::Idle => None,
        }
    }

    /// Runs the open dialog's action and notifies the outcome.
    ///
    /// Backend failures are reported as [`DispatchOutcome::Failed`]; an error
    /// is returned only when no dialog is open or an action is in flight.
    pub async fn confirm(&mut self) -> AppResult<DispatchOutcome> {
        let pending = match std::mem::replace(&mut self.state, DispatcherState::Executing) {
            DispatcherState::PendingConfirmation(action) => action,
            DispatcherState::Executing => {
                return Err(AppError::Conflict(
                    "another action is still in progress".to_owned(),
                ));
            }
            DispatcherState::Idle => {
                self.state = DispatcherState::Idle;
                return Err(AppError::Validation(
                    "there is no pending action to confirm".to_owned(),
                ));
            }
        };

        let gateway = Arc::clone(&self.gateway);
        let notifier = Arc::clone(&self.notifier);
        let display_for = self.notification_duration;
        let _idle_on_exit = IdleOnDrop(&mut self.state);

        let result = match &pending.target {
            ActionTarget::Single(id) => gateway.apply_action(pending.action, *id).await,
            ActionTarget::Bulk(ids) => gateway.apply_bulk_action(pending.action, ids).await,
        };

        let (outcome, notification) = match result {
            Ok(()) => {
                info!(
                    resource = R::RESOURCE,
                    action = pending.action.as_str(),
                    count = pending.target.len(),
                    "record action applied"
                );
                (
                    DispatchOutcome::Succeeded {
                        action: pending.action,
                        count: pending.target.len(),
                    },
                    Notification {
                        level: NotificationLevel::Success,
                        message: pending.success_message.clone(),
                        display_for,
                    },
                )
            }
            Err(error) => {
                warn!(
                    resource = R::RESOURCE,
                    action = pending.action.as_str(),
                    error = %error,
                    "record action failed"
                );
                let message = match &error {
                    AppError::Internal(_) => pending.error_message.clone(),
                    other => other.user_message().to_owned(),
                };
                (
                    DispatchOutcome::Failed {
                        action: pending.action,
                        message: message.clone(),
                    },
                    Notification {
                        level: NotificationLevel::Error,
                        message,
                        display_for,
                    },
                )
            }
        };

        notifier.notify(notification).await;
        Ok(outcome)
    }
}

/// Returns the dispatcher to idle even when the confirm future is dropped mid-flight.
struct IdleOnDrop<'a>(&'a mut DispatcherState);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = DispatcherState::Idle;
    }
}
