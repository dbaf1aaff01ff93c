use serde::{Deserialize, Serialize};

/// A course section as offered in the target-section dropdown.
///
/// `name` is never empty: when the section has no name set, the backend
/// substitutes "Section N".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionRef {
    pub section: i64,
    pub name: String,
}
