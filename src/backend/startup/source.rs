use std::collections::HashMap;
use std::io;

use crate::model::{StartupScope, StartupStatus};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The key, file or directory backing the source does not exist.
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("malformed entry: {0}")]
    Malformed(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn from_io(err: io::Error, context: impl Into<String>) -> Self {
        let context = context.into();
        match err.kind() {
            io::ErrorKind::NotFound => SourceError::Unavailable(context),
            io::ErrorKind::PermissionDenied => SourceError::AccessDenied(context),
            _ => SourceError::Io { context, source: err },
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Registration (name -> path) and approval (name -> status) stores, one
/// pair per scope.
pub trait KeyValueSource {
    fn registrations(&self, scope: StartupScope) -> SourceResult<HashMap<String, String>>;

    fn set_registration(&mut self, scope: StartupScope, name: &str, path: &str) -> SourceResult<()>;

    /// Returns `Ok(false)` when `name` was not registered in `scope`.
    fn delete_registration(&mut self, scope: StartupScope, name: &str) -> SourceResult<bool>;

    fn approvals(&self, scope: StartupScope) -> SourceResult<HashMap<String, StartupStatus>>;

    fn set_approval(
        &mut self,
        scope: StartupScope,
        name: &str,
        status: StartupStatus,
    ) -> SourceResult<()>;
}

/// Reject values that would break a line-oriented store.
pub(crate) fn check_single_line(what: &str, value: &str) -> SourceResult<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(SourceError::Malformed(format!("{} contains a line break", what)));
    }
    Ok(())
}
