use serde::{Deserialize, Serialize};

/// Flat module entry of the target course, annotated with its section
/// number. Only user-visible modules are listed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetModule {
    pub id: i64,
    pub section: i64,
    pub modname: String,
    pub name: String,
}
