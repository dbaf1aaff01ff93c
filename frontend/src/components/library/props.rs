//! Properties of the `LibraryComponent`, filled in by the widget shell.

use common::model::course::CourseSummary;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LibraryProps {
    /// The course the block is rendered in. Fixed at initialization;
    /// copies always land here.
    pub current_course_id: i64,

    /// Direct courses of the template category, resolved by the shell.
    pub courses: Vec<CourseSummary>,
}
