use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 2,
        "name": "Sick Leave",
        "support_document": true
    })
)]
pub struct LeaveType {
    #[schema(example = 2)]
    pub id: u64,

    #[schema(example = "Sick Leave")]
    pub name: String,

    /// Whether requests of this type must carry a supporting document.
    #[schema(example = true)]
    pub support_document: bool,
}
