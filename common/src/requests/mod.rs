use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Request payload for the copy-activity endpoint.
/// Target section 0 means "append at the end of the course".
pub struct CopyActivityRequest {
    pub source_cmid: i64,
    pub target_course_id: i64,
    pub target_section: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Request payload for the copy-module wrapper endpoint, addressing the
/// activity by its instance id instead of its course module id.
pub struct CopyModuleRequest {
    pub instance_id: i64,
    pub target_course_id: i64,
    pub target_section: i64,
}
