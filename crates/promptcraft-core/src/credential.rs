//! Credential-selection collaborator interface.
//!
//! Consulted only before a Video test-stage invocation: video generation
//! requires a billable API key, and selecting one is an application-surface
//! concern the engine delegates.

use async_trait::async_trait;

/// Access to the user's billable API credential.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    /// Returns the currently selected billable API key, if any.
    async fn billable_key(&self) -> Option<String>;

    /// Asks the surrounding application to let the user select a billable
    /// key.
    ///
    /// # Returns
    ///
    /// The newly selected key, or `None` when the user declined or no
    /// selection surface exists.
    async fn request_selection(&self) -> Option<String>;
}

#[async_trait]
impl<T: CredentialGate + ?Sized> CredentialGate for std::sync::Arc<T> {
    async fn billable_key(&self) -> Option<String> {
        (**self).billable_key().await
    }

    async fn request_selection(&self) -> Option<String> {
        (**self).request_selection().await
    }
}
