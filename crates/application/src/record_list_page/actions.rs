use skmis_core::{AppError, AppResult, RecordId};
use skmis_domain::{ManagedRecord, RecordAction, can_author, can_manage};
use tracing::warn;

use crate::action_dispatcher::capitalize;
use crate::{
    AuditTrailPage, AuditTrailQuery, ConfirmAction, DispatchOutcome, NotificationLevel,
};

use super::{FormSubmission, RecordListPage};

impl<R: ManagedRecord> RecordListPage<R> {
    /// Opens a confirmation dialog for a single-record transition.
    pub fn request_action(&mut self, action: RecordAction, id: RecordId) -> AppResult<&ConfirmAction> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("{} {id} does not exist", R::LABEL)))?;

        if !can_manage(&self.current_user, record) {
            return Err(AppError::Forbidden(format!(
                "you may not {} {} {id}",
                action.as_str(),
                R::LABEL
            )));
        }

        if !action.is_eligible(record.status()) {
            return Err(AppError::Validation(format!(
                "{} {id} cannot be {} while {}",
                R::LABEL,
                action.past_tense(),
                record.status().as_str()
            )));
        }

        self.open_dialog(ConfirmAction::for_record::<R>(action, id))
    }

    /// Opens a confirmation dialog for a batched transition over the
    /// selected records that are eligible and manageable.
    pub fn request_bulk_action(&mut self, action: RecordAction) -> AppResult<&ConfirmAction> {
        let eligibility = self.bulk_eligibility();
        let ids: Vec<RecordId> = eligibility
            .for_action(action)
            .iter()
            .copied()
            .filter(|id| {
                self.store
                    .get(*id)
                    .is_some_and(|record| can_manage(&self.current_user, record))
            })
            .collect();

        self.open_dialog(ConfirmAction::for_bulk::<R>(action, ids)?)
    }

    /// Returns the open confirmation dialog.
    #[must_use]
    pub fn pending_confirmation(&self) -> Option<&ConfirmAction> {
        self.dispatcher.pending()
    }

    /// Returns whether a confirmed action is in flight.
    #[must_use]
    pub fn is_action_in_flight(&self) -> bool {
        self.dispatcher.is_busy()
    }

    /// Closes the open dialog without contacting the backend.
    pub fn cancel_confirmation(&mut self) -> Option<ConfirmAction> {
        self.dispatcher.cancel()
    }

    /// Runs the open dialog's action, then re-fetches regardless of outcome
    /// and clears the selection.
    pub async fn confirm(&mut self) -> AppResult<DispatchOutcome> {
        let outcome = self.dispatcher.confirm().await?;
        self.selection.select_none();

        if let Err(error) = self.refresh().await {
            warn!(resource = R::RESOURCE, error = %error, "re-fetch after action failed");
        }

        Ok(outcome)
    }

    /// Submits a create or update form, then re-fetches on success.
    ///
    /// Validation errors from the backend are shown as one notification.
    pub async fn submit_form(&mut self, submission: FormSubmission) -> AppResult<R> {
        let (result, verb) = match submission {
            FormSubmission::Create(payload) => {
                if !can_author(&self.current_user) {
                    return Err(AppError::Forbidden(format!(
                        "you may not create {} records",
                        R::LABEL
                    )));
                }
                (self.gateway.create_record(&payload).await, "created")
            }
            FormSubmission::Update { id, payload } => {
                let record = self.store.get(id).ok_or_else(|| {
                    AppError::NotFound(format!("{} {id} does not exist", R::LABEL))
                })?;
                if !can_manage(&self.current_user, record) {
                    return Err(AppError::Forbidden(format!(
                        "you may not update {} {id}",
                        R::LABEL
                    )));
                }
                (self.gateway.update_record(id, &payload).await, "updated")
            }
        };

        match result {
            Ok(record) => {
                self.notify(
                    NotificationLevel::Success,
                    format!("{} {verb} successfully.", capitalize(R::LABEL)),
                )
                .await;
                if let Err(error) = self.refresh().await {
                    warn!(resource = R::RESOURCE, error = %error, "re-fetch after save failed");
                }
                Ok(record)
            }
            Err(error) => {
                let message = match &error {
                    AppError::Internal(_) => format!("Failed to save {}.", R::LABEL),
                    other => other.user_message().to_owned(),
                };
                self.notify(NotificationLevel::Error, message).await;
                Err(error)
            }
        }
    }

    /// Loads one page of the collection's audit trail.
    pub async fn load_audit_trail(&self, query: &AuditTrailQuery) -> AppResult<AuditTrailPage> {
        match self.gateway.audit_trail(query).await {
            Ok(page) => Ok(page),
            Err(error) => {
                warn!(resource = R::RESOURCE, error = %error, "failed to load audit trail");
                self.notify(
                    NotificationLevel::Error,
                    "Failed to load audit trail.".to_owned(),
                )
                .await;
                Err(error)
            }
        }
    }

    fn open_dialog(&mut self, dialog: ConfirmAction) -> AppResult<&ConfirmAction> {
        self.dispatcher.request_confirmation(dialog)?;
        self.dispatcher
            .pending()
            .ok_or_else(|| AppError::Internal("confirmation dialog was not opened".to_owned()))
    }
}
