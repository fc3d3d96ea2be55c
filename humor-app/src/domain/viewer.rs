use serde::{Deserialize, Serialize};

/// A user whose bearer token has been verified for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: uuid::Uuid,
    pub email: Option<String>,
}

impl Viewer {
    pub fn new(id: uuid::Uuid, email: Option<String>) -> Self {
        Self { id, email }
    }
}
