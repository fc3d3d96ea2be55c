use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: uuid::Uuid,
    pub name: String,
}

impl Category {
    pub fn new(id: uuid::Uuid, name: String) -> Self {
        Self { id, name }
    }
}
