use serde::{Deserialize, Serialize};

/// One course of the template category, as listed by the block widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: i64,
    pub fullname: String,
}
