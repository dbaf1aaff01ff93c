pub mod copy;
pub mod course;
pub mod module;
pub mod section;
pub mod structure;
