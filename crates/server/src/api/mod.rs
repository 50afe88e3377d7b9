use shared::{
    domain::Collection,
    error::{ApiError, ErrorCode},
    protocol::{BeersResponse, MessageResponse, SEEDED_MESSAGE, UPDATED_MESSAGE},
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.storage.health_check().await.map_err(internal)
}

pub async fn fetch_beers(ctx: &ApiContext) -> Result<BeersResponse, ApiError> {
    let beers = ctx.storage.get().await.map_err(internal)?;
    Ok(BeersResponse { beers })
}

/// Overwrites whatever is stored with the starter menu.
pub async fn seed_beers(ctx: &ApiContext) -> Result<MessageResponse, ApiError> {
    ctx.storage.seed().await.map_err(internal)?;
    info!("beer collection seeded with starter dataset");
    Ok(MessageResponse::new(SEEDED_MESSAGE))
}

pub async fn update_beers(
    ctx: &ApiContext,
    collection: &Collection,
) -> Result<MessageResponse, ApiError> {
    ctx.storage.replace(collection).await.map_err(internal)?;
    Ok(MessageResponse::new(UPDATED_MESSAGE))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
