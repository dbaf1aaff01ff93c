use std::fmt;

/// Marker error for lookups that must resolve to an existing record
/// (courses, course modules, sections). Kept as a dedicated type so
/// handlers can map it to a 404 while every other engine failure stays a
/// generic error.
#[derive(Debug)]
pub struct NotFound(pub String);

impl NotFound {
    pub fn new(what: impl Into<String>) -> Self {
        NotFound(what.into())
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found", self.0)
    }
}

impl std::error::Error for NotFound {}

/// True when any error in the chain is a `NotFound`.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|e| e.downcast_ref::<NotFound>().is_some())
}
