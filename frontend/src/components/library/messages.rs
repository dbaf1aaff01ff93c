use common::model::copy::CopyOutcome;
use common::model::section::SectionRef;
use common::model::structure::TemplateStructure;

#[derive(Clone)]
pub enum Msg {
    CourseSelected(Option<i64>),
    StructureLoaded(TemplateStructure),
    StructureFailed(String),
    ModuleSelected { cmid: i64, name: String },
    SectionsLoaded(Vec<SectionRef>),
    SectionsFailed(String),
    SectionChosen(i64),
    SubmitCopy,
    CopyFinished(CopyOutcome),
    CopyFailed(String),
    CancelCopy,
}
