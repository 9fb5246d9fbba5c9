//! Auto-start entries: merging registration and approval sources into one
//! view and keeping them consistent across enable/disable.

mod cache;
#[cfg(unix)]
mod keyfile;
#[cfg(test)]
mod memory;
#[cfg(windows)]
mod registry;
mod source;
#[cfg(unix)]
mod xdg;

use std::collections::{HashMap, HashSet};

use crate::model::{StartupEntry, StartupScope, StartupStatus};

pub use cache::PathCache;
#[cfg(windows)]
pub use registry::RegistrySource;
#[cfg(test)]
pub(crate) use memory::{MemorySource, Table};
pub use source::KeyValueSource;
use source::SourceResult;
#[cfg(unix)]
pub use xdg::XdgSource;

#[cfg(windows)]
pub type PlatformSource = RegistrySource;
#[cfg(unix)]
pub type PlatformSource = XdgSource;

/// Reconciles the per-scope registration and approval sources.
///
/// Reads never fail: a source that cannot be read contributes nothing.
/// Mutations report plain success/failure and are not rolled back, so a
/// registration written before a failed approval write stays in place.
pub struct StartupManager<S> {
    source: S,
    cache: PathCache,
}

impl<S: KeyValueSource> StartupManager<S> {
    pub fn new(source: S, cache: PathCache) -> Self {
        Self { source, cache }
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[cfg(test)]
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn list(&self) -> Vec<StartupEntry> {
        let run_user = or_empty(self.source.registrations(StartupScope::User), "registrations", StartupScope::User);
        let run_machine = or_empty(self.source.registrations(StartupScope::Machine), "registrations", StartupScope::Machine);
        let approved_user = or_empty(self.source.approvals(StartupScope::User), "approvals", StartupScope::User);
        let approved_machine = or_empty(self.source.approvals(StartupScope::Machine), "approvals", StartupScope::Machine);

        let names: HashSet<&String> = run_user
            .keys()
            .chain(run_machine.keys())
            .chain(approved_user.keys())
            .chain(approved_machine.keys())
            .collect();

        names
            .into_iter()
            .map(|name| {
                let path = non_empty(run_user.get(name))
                    .or_else(|| non_empty(run_machine.get(name)))
                    .map(|p| p.to_string())
                    .or_else(|| self.cache.get(name).map(|p| p.to_string()));

                let status = approved_user
                    .get(name)
                    .or_else(|| approved_machine.get(name))
                    .copied()
                    .unwrap_or(StartupStatus::Enabled);

                let scope = if run_user.contains_key(name) || approved_user.contains_key(name) {
                    StartupScope::User
                } else {
                    StartupScope::Machine
                };

                StartupEntry {
                    name: name.clone(),
                    path,
                    status,
                    scope,
                }
            })
            .collect()
    }

    /// Register `name` in `scope` and mark it enabled. Without an explicit
    /// path, falls back to the cached path and then to any live registration.
    pub fn enable(&mut self, name: &str, path: Option<&str>, scope: StartupScope) -> bool {
        let path = match self.resolve_path(name, path) {
            Some(p) => p,
            None => {
                log::warn!("Cannot enable '{}': no path supplied or known", name);
                return false;
            }
        };

        match self.write_enabled(name, &path, scope) {
            Ok(()) => {
                log::info!("Enabled startup entry '{}' ({}) -> {}", name, scope, path);
                true
            }
            Err(e) => {
                log::warn!("Failed to enable startup entry '{}' ({}): {}", name, scope, e);
                false
            }
        }
    }

    /// Remove `name` from every registration source, remembering its path,
    /// and mark it disabled in every approval source. Returns whether any
    /// registration was removed.
    pub fn disable(&mut self, name: &str) -> bool {
        let mut removed = false;

        for scope in StartupScope::ALL {
            match self.source.registrations(scope) {
                Ok(registered) => {
                    if let Some(path) = registered.get(name) {
                        self.cache.remember(name, path);
                        match self.source.delete_registration(scope, name) {
                            Ok(true) => {
                                removed = true;
                                log::info!("Removed startup registration '{}' ({})", name, scope);
                            }
                            Ok(false) => {}
                            Err(e) => log::warn!(
                                "Failed to remove startup registration '{}' ({}): {}",
                                name,
                                scope,
                                e
                            ),
                        }
                    }
                }
                Err(e) => log::debug!("{} registrations unreadable: {}", scope, e),
            }

            if let Err(e) = self.source.set_approval(scope, name, StartupStatus::Disabled) {
                log::warn!("Failed to mark '{}' disabled ({}): {}", name, scope, e);
            }
        }

        removed
    }

    fn write_enabled(&mut self, name: &str, path: &str, scope: StartupScope) -> SourceResult<()> {
        self.source.set_registration(scope, name, path)?;
        self.source.set_approval(scope, name, StartupStatus::Enabled)
    }

    fn resolve_path(&self, name: &str, supplied: Option<&str>) -> Option<String> {
        if let Some(path) = supplied.filter(|p| !p.trim().is_empty()) {
            return Some(path.to_string());
        }
        if let Some(path) = self.cache.get(name) {
            return Some(path.to_string());
        }
        StartupScope::ALL.iter().find_map(|&scope| {
            self.source
                .registrations(scope)
                .ok()
                .and_then(|mut registered| registered.remove(name))
                .filter(|p| !p.is_empty())
        })
    }
}

fn or_empty<T>(result: SourceResult<HashMap<String, T>>, what: &str, scope: StartupScope) -> HashMap<String, T> {
    match result {
        Ok(map) => map,
        Err(e) => {
            log::debug!("{} {} unreadable, treating as empty: {}", scope, what, e);
            HashMap::new()
        }
    }
}

fn non_empty(path: Option<&String>) -> Option<&String> {
    path.filter(|p| !p.is_empty())
}
