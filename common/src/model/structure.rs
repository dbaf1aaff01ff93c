use serde::{Deserialize, Serialize};

/// Course title plus the ordered sections and activities of a template
/// course, as returned by `GET /api/library/structure/{course_id}`.
///
/// Section 0 is never part of `sections`, and neither are sections without
/// any activities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateStructure {
    pub title: String,
    pub sections: Vec<TemplateSection>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub section: i64,
    pub name: String,
    pub modules: Vec<TemplateModule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateModule {
    pub cmid: i64,
    pub modname: String,
    pub name: String,
    pub instance: i64,
}
