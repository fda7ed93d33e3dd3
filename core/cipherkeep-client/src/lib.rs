//! Client side of CipherKeep.
//!
//! [`Orchestrator`] runs the user workflows (encrypt-and-copy,
//! encrypt-and-save, decrypt-and-copy, delete-selected) against the router
//! through [`RouterClient`], keeping its only state in an explicit
//! [`AppState`]. Front ends plug in through the [`Ui`] trait.

mod api;
mod error;
mod orchestrator;
mod state;
mod ui;

pub use api::RouterClient;
pub use error::{ClientError, ClientResult, WorkflowError};
pub use orchestrator::{Orchestrator, WorkflowResult};
pub use state::AppState;
pub use ui::{Notification, NotificationKind, Ui};
