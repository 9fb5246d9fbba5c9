use std::collections::{HashMap, HashSet};

use super::source::{KeyValueSource, SourceError, SourceResult};
use crate::model::{StartupScope, StartupStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Registration,
    Approval,
}

/// In-memory source with per-table failure injection.
#[derive(Debug, Default)]
pub struct MemorySource {
    registrations: HashMap<StartupScope, HashMap<String, String>>,
    approvals: HashMap<StartupScope, HashMap<String, StartupStatus>>,
    failing_reads: HashSet<(StartupScope, Table)>,
    failing_writes: HashSet<(StartupScope, Table)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registration(mut self, scope: StartupScope, name: &str, path: &str) -> Self {
        self.registrations
            .entry(scope)
            .or_default()
            .insert(name.to_string(), path.to_string());
        self
    }

    pub fn with_approval(mut self, scope: StartupScope, name: &str, status: StartupStatus) -> Self {
        self.approvals
            .entry(scope)
            .or_default()
            .insert(name.to_string(), status);
        self
    }

    pub fn fail_reads(&mut self, scope: StartupScope, table: Table) {
        self.failing_reads.insert((scope, table));
    }

    pub fn fail_writes(&mut self, scope: StartupScope, table: Table) {
        self.failing_writes.insert((scope, table));
    }

    pub fn registration(&self, scope: StartupScope, name: &str) -> Option<&str> {
        self.registrations
            .get(&scope)
            .and_then(|m| m.get(name))
            .map(|p| p.as_str())
    }

    pub fn approval(&self, scope: StartupScope, name: &str) -> Option<StartupStatus> {
        self.approvals.get(&scope).and_then(|m| m.get(name)).copied()
    }

    fn check_read(&self, scope: StartupScope, table: Table) -> SourceResult<()> {
        if self.failing_reads.contains(&(scope, table)) {
            return Err(SourceError::AccessDenied(format!("{:?} {:?}", scope, table)));
        }
        Ok(())
    }

    fn check_write(&self, scope: StartupScope, table: Table) -> SourceResult<()> {
        if self.failing_writes.contains(&(scope, table)) {
            return Err(SourceError::AccessDenied(format!("{:?} {:?}", scope, table)));
        }
        Ok(())
    }
}

impl KeyValueSource for MemorySource {
    fn registrations(&self, scope: StartupScope) -> SourceResult<HashMap<String, String>> {
        self.check_read(scope, Table::Registration)?;
        Ok(self.registrations.get(&scope).cloned().unwrap_or_default())
    }

    fn set_registration(&mut self, scope: StartupScope, name: &str, path: &str) -> SourceResult<()> {
        self.check_write(scope, Table::Registration)?;
        self.registrations
            .entry(scope)
            .or_default()
            .insert(name.to_string(), path.to_string());
        Ok(())
    }

    fn delete_registration(&mut self, scope: StartupScope, name: &str) -> SourceResult<bool> {
        self.check_write(scope, Table::Registration)?;
        Ok(self
            .registrations
            .get_mut(&scope)
            .map(|m| m.remove(name).is_some())
            .unwrap_or(false))
    }

    fn approvals(&self, scope: StartupScope) -> SourceResult<HashMap<String, StartupStatus>> {
        self.check_read(scope, Table::Approval)?;
        Ok(self.approvals.get(&scope).cloned().unwrap_or_default())
    }

    fn set_approval(
        &mut self,
        scope: StartupScope,
        name: &str,
        status: StartupStatus,
    ) -> SourceResult<()> {
        self.check_write(scope, Table::Approval)?;
        self.approvals
            .entry(scope)
            .or_default()
            .insert(name.to_string(), status);
        Ok(())
    }
}
