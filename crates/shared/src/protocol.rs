use serde::{Deserialize, Serialize};

use crate::domain::Collection;

pub const BEERS_ROUTE: &str = "/api/beers";

pub const SEEDED_MESSAGE: &str = "Data added";
pub const UPDATED_MESSAGE: &str = "Data updated";

/// Body of `GET /api/beers`. `beers` is `null` until the store has been seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeersResponse {
    pub beers: Option<Collection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
