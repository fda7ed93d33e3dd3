//! User-facing workflows.
//!
//! Every workflow either completes or stops at its first failure, reports
//! exactly one notification, and leaves [`AppState`] as it found it on
//! failure. Nothing is retried.

use cipherkeep_types::{CryptoMode, EngineOutcome};
use tracing::{debug, warn};

use crate::api::RouterClient;
use crate::error::WorkflowError;
use crate::state::AppState;
use crate::ui::{Notification, Ui};

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Drives workflows against the router on behalf of a [`Ui`].
pub struct Orchestrator<U: Ui> {
    client: RouterClient,
    ui: U,
    state: AppState,
}

impl<U: Ui> Orchestrator<U> {
    pub fn new(client: RouterClient, ui: U) -> Self {
        Self {
            client,
            ui,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Selects the record at `index` in the current snapshot.
    pub fn select(&mut self, index: usize) -> bool {
        self.state.select(index)
    }

    /// Selects the record carrying `label` in the current snapshot.
    pub fn select_label(&mut self, label: &str) -> bool {
        self.state.select_label(label)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Re-fetches the store snapshot.
    pub async fn refresh(&mut self) -> WorkflowResult<()> {
        match self.reload().await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(
                Notification::error(e.user_message("Failed to load records.")),
                e.into(),
            )),
        }
    }

    /// Encrypts `message` and puts the ciphertext on the clipboard.
    pub async fn encrypt_and_copy(&mut self, password: &str, message: &str) -> WorkflowResult<String> {
        let (password, message) = (password.trim(), message.trim());
        if password.is_empty() || message.is_empty() {
            return Err(self.input_error("Please enter both password and message."));
        }

        let cipher = self.encrypt(password, message, "Encryption failed.").await?;
        if let Err(e) = self.ui.copy_to_clipboard(&cipher) {
            return Err(self.fail(Notification::error("Copy failed."), WorkflowError::Clipboard(e)));
        }
        self.ui
            .notify(Notification::success("Encrypted message copied to clipboard."));
        Ok(cipher)
    }

    /// Encrypts `message`, saves the ciphertext under `label`, and refreshes
    /// the snapshot.
    pub async fn encrypt_and_save(
        &mut self,
        password: &str,
        message: &str,
        label: &str,
    ) -> WorkflowResult<String> {
        let (password, message, label) = (password.trim(), message.trim(), label.trim());
        if password.is_empty() || message.is_empty() || label.is_empty() {
            return Err(self.input_error("Please enter password, message, and label."));
        }

        let cipher = self.encrypt(password, message, "Failed to save.").await?;
        let saved = match self.client.save(label, &cipher).await {
            Ok(msg) => msg,
            Err(e) => {
                return Err(self.fail(Notification::error(e.user_message("Failed to save.")), e.into()));
            }
        };

        if let Err(e) = self.reload().await {
            warn!("snapshot refresh after save failed: {e}");
        }
        self.ui.notify(Notification::success(non_empty(saved, "Saved successfully.")));
        Ok(cipher)
    }

    /// Decrypts the selected record's ciphertext, shows the plaintext, and
    /// copies it.
    pub async fn decrypt_and_copy(&mut self, password: &str) -> WorkflowResult<String> {
        let password = password.trim();
        if password.is_empty() {
            return Err(self.input_error("Please enter a password."));
        }
        let Some(cipher) = self.state.selected_record().map(|r| r.cipher.clone()) else {
            return Err(self.input_error("Invalid selection."));
        };

        let raw = match self.client.crypto(CryptoMode::Decrypt, password, &cipher).await {
            Ok(raw) => raw,
            Err(e) => {
                return Err(self.fail(
                    Notification::error(e.user_message("Decryption failed.")),
                    e.into(),
                ));
            }
        };
        let plaintext = match EngineOutcome::from_wire(&raw) {
            EngineOutcome::Failure(reason) => {
                return Err(self.fail(Notification::error(reason.clone()), WorkflowError::Refused(reason)));
            }
            EngineOutcome::Success(text) if text.is_empty() => {
                return Err(self.empty_result("Decryption returned nothing."));
            }
            EngineOutcome::Success(text) => text,
        };

        self.ui.show_result(&plaintext);
        if let Err(e) = self.ui.copy_to_clipboard(&plaintext) {
            return Err(self.fail(Notification::error("Copy failed."), WorkflowError::Clipboard(e)));
        }
        self.ui.notify(Notification::success("Copied to clipboard."));
        Ok(plaintext)
    }

    /// Deletes the selected record after confirmation. Returns `Ok(false)`
    /// when the user declines; no request is made in that case.
    pub async fn delete_selected(&mut self) -> WorkflowResult<bool> {
        let Some(label) = self.state.selected_record().map(|r| r.label.to_string()) else {
            return Err(self.input_error("Please select an item to delete."));
        };
        if !self
            .ui
            .confirm(&format!("Are you sure you want to delete \"{label}\"?"))
        {
            debug!(%label, "delete declined");
            return Ok(false);
        }

        let msg = match self.client.delete(&label).await {
            Ok(msg) => msg,
            Err(e) => {
                return Err(self.fail(Notification::error(e.user_message("Failed to delete.")), e.into()));
            }
        };

        self.state.clear_selection();
        if let Err(e) = self.reload().await {
            warn!("snapshot refresh after delete failed: {e}");
        }
        self.ui.notify(Notification::success(non_empty(msg, "Deleted successfully.")));
        Ok(true)
    }

    /// Runs an encrypt request and decodes the engine's answer.
    async fn encrypt(&mut self, password: &str, message: &str, fallback: &str) -> WorkflowResult<String> {
        let raw = match self.client.crypto(CryptoMode::Encrypt, password, message).await {
            Ok(raw) => raw,
            Err(e) => return Err(self.fail(Notification::error(e.user_message(fallback)), e.into())),
        };
        match EngineOutcome::from_wire(&raw) {
            EngineOutcome::Failure(reason) => {
                Err(self.fail(Notification::error(reason.clone()), WorkflowError::Refused(reason)))
            }
            EngineOutcome::Success(cipher) if cipher.is_empty() => {
                Err(self.empty_result("Empty encryption result."))
            }
            EngineOutcome::Success(cipher) => Ok(cipher),
        }
    }

    async fn reload(&mut self) -> Result<(), crate::error::ClientError> {
        let records = self.client.records().await?;
        debug!(count = records.len(), "snapshot refreshed");
        self.state.refresh_snapshot(records);
        Ok(())
    }

    fn fail(&mut self, notification: Notification, err: WorkflowError) -> WorkflowError {
        self.ui.notify(notification);
        err
    }

    fn input_error(&mut self, message: &'static str) -> WorkflowError {
        self.fail(Notification::error(message), WorkflowError::Input(message))
    }

    fn empty_result(&mut self, message: &'static str) -> WorkflowError {
        self.fail(Notification::error(message), WorkflowError::EmptyResult(message))
    }
}

fn non_empty(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}
