use mongodb::results::{DeleteResult, UpdateResult};
use serde::Serialize;

/// Driver-style outcome of an update, as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateStatus {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        UpdateStatus {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

impl From<UpdateResult> for UpdateStatus {
    fn from(result: UpdateResult) -> Self {
        UpdateStatus::new(result.matched_count, result.modified_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStatus {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteStatus {
    pub fn new(deleted_count: u64) -> Self {
        DeleteStatus {
            acknowledged: true,
            deleted_count,
        }
    }
}

impl From<DeleteResult> for DeleteStatus {
    fn from(result: DeleteResult) -> Self {
        DeleteStatus::new(result.deleted_count)
    }
}
