//! Component state for the module library picker.

use common::model::section::SectionRef;
use common::model::structure::TemplateStructure;

/// The template module currently picked for copying.
#[derive(Clone, PartialEq)]
pub struct SelectedModule {
    pub cmid: i64,
    pub name: String,
}

/// Main state container for the `LibraryComponent`.
///
/// Fields are `pub` because they are accessed by the `view` and `update`
/// modules.
pub struct LibraryComponent {
    /// The template course whose structure is shown, if any.
    pub selected_course: Option<i64>,

    /// Structure of the selected template course once loaded.
    pub structure: Option<TemplateStructure>,

    /// True while the structure fetch is in flight.
    pub loading_structure: bool,

    /// The module picked for copying; `None` hides the copy form.
    pub selected_module: Option<SelectedModule>,

    /// Target-course sections once loaded for the copy form.
    pub sections: Option<Vec<SectionRef>>,

    /// Section number chosen in the copy form; 0 appends at the end.
    pub chosen_section: i64,

    /// True while the copy call is in flight; disables the submit button.
    pub copying: bool,
}

impl LibraryComponent {
    pub fn new() -> Self {
        Self {
            selected_course: None,
            structure: None,
            loading_structure: false,
            selected_module: None,
            sections: None,
            chosen_section: 0,
            copying: false,
        }
    }

    /// Clears the copy form back to its idle state.
    pub fn reset_copy_form(&mut self) {
        self.selected_module = None;
        self.sections = None;
        self.chosen_section = 0;
        self.copying = false;
    }
}
