use anyhow::Result;
use shared::domain::Collection;
use tracing::warn;

use crate::{
    form::{FormAction, FormState},
    BeerMenuClient,
};

/// One editing session: the local buffer plus the client that persists it.
///
/// Local state stays authoritative after a save; nothing is re-fetched.
pub struct FormSession {
    client: BeerMenuClient,
    state: FormState,
}

impl FormSession {
    pub async fn open(client: BeerMenuClient) -> Result<Self> {
        let collection = client.load().await?;
        Ok(Self::new(client, &collection))
    }

    pub fn new(client: BeerMenuClient, collection: &Collection) -> Self {
        Self {
            client,
            state: FormState::from_collection(collection),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn dispatch(&mut self, action: FormAction) {
        self.state = self.state.reduce(action);
    }

    /// Marks the session as saving and hands back the write to perform.
    /// Returns `None` if a save is already in flight.
    pub fn start_save(&mut self) -> Option<PendingSave> {
        let (next, payload) = self.state.begin_save()?;
        self.state = next;
        Some(PendingSave {
            client: self.client.clone(),
            payload,
        })
    }

    /// Saves and waits for the round trip. `Ok(false)` means a save was
    /// already running and this one was not started.
    pub async fn save(&mut self) -> Result<bool> {
        let Some(pending) = self.start_save() else {
            return Ok(false);
        };
        let result = pending.write().await;
        match &result {
            Ok(()) => self.dispatch(FormAction::SaveSucceeded),
            Err(err) => self.dispatch(FormAction::SaveFailed(format!("{err:#}"))),
        }
        result.map(|()| true)
    }
}

/// A detached save, so edits can continue while it runs.
pub struct PendingSave {
    client: BeerMenuClient,
    payload: Collection,
}

impl PendingSave {
    pub fn payload(&self) -> &Collection {
        &self.payload
    }

    pub async fn write(&self) -> Result<()> {
        self.client.replace(&self.payload).await
    }

    /// Performs the write and returns the completion action for the session.
    pub async fn run(self) -> FormAction {
        match self.write().await {
            Ok(()) => FormAction::SaveSucceeded,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "saving beer collection failed");
                FormAction::SaveFailed(format!("{err:#}"))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
