use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use shared::{
    domain::Collection,
    error::{ApiError, ApiException},
    protocol::{BeersResponse, MessageResponse, BEERS_ROUTE},
};
use tracing::info;
use url::Url;

pub mod form;
pub mod session;

pub use form::{EditableField, EditableRecord, FormAction, FormState, Notice};
pub use session::{FormSession, PendingSave};

/// HTTP counterpart of the server-side beer store.
#[derive(Clone)]
pub struct BeerMenuClient {
    http: Client,
    beers_url: Url,
}

impl BeerMenuClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let base = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!("server url must use http or https: '{server_url}'"));
        }
        let beers_url = base.join(BEERS_ROUTE)?;
        Ok(Self {
            http: Client::new(),
            beers_url,
        })
    }

    pub fn beers_url(&self) -> &Url {
        &self.beers_url
    }

    /// `None` when the server has never been seeded.
    pub async fn fetch(&self) -> Result<Option<Collection>> {
        let res = self.http.get(self.beers_url.clone()).send().await?;
        let body: BeersResponse = check_status(res).await?.json().await?;
        Ok(body.beers)
    }

    /// Unseeded servers read as an empty collection.
    pub async fn load(&self) -> Result<Collection> {
        Ok(self.fetch().await?.unwrap_or_default())
    }

    pub async fn replace(&self, collection: &Collection) -> Result<()> {
        let res = self
            .http
            .put(self.beers_url.clone())
            .json(collection)
            .send()
            .await?;
        let body: MessageResponse = check_status(res).await?.json().await?;
        info!(records = collection.len(), message = %body.message, "beer collection replaced");
        Ok(())
    }

    /// Resets the server to its starter menu.
    pub async fn seed(&self) -> Result<()> {
        let res = self.http.post(self.beers_url.clone()).send().await?;
        let body: MessageResponse = check_status(res).await?.json().await?;
        info!(message = %body.message, "beer collection seeded");
        Ok(())
    }
}

/// Error bodies the server sent as `ApiError` come back as [`ApiException`].
async fn check_status(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let text = res.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&text) {
        Ok(err) => Err(anyhow::Error::new(ApiException::from(err))
            .context(format!("server returned {status}"))),
        Err(_) if text.is_empty() => Err(anyhow!("server returned {status}")),
        Err(_) => Err(anyhow!("server returned {status}: {text}")),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
