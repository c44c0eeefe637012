use crate::models::ElementId;

/// Programming errors: operations the caller should never have attempted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MisuseError {
    #[error("property key `{0}` is reserved for system fields")]
    ReservedKey(String),

    #[error("element payload has no usable `{0}` field")]
    MissingField(&'static str),

    #[error("expected a JSON object of properties")]
    NotAnObject,

    #[error("{collection}/{id} has been deleted")]
    Deleted {
        collection: &'static str,
        id: ElementId,
    },
}
