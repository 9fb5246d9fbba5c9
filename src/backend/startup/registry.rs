use std::collections::HashMap;

use winreg::enums::*;
use winreg::types::FromRegValue;
use winreg::{RegKey, RegValue};

use super::source::{KeyValueSource, SourceError, SourceResult};
use crate::model::{StartupScope, StartupStatus};

const RUN_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
const APPROVED_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\StartupApproved\Run";

/// `Run` and `StartupApproved\Run` keys under HKCU (user) and HKLM (machine).
#[derive(Debug, Default)]
pub struct RegistrySource;

impl RegistrySource {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, scope: StartupScope, path: &str, access: u32) -> SourceResult<RegKey> {
        let (root, access) = match scope {
            StartupScope::User => (HKEY_CURRENT_USER, access),
            StartupScope::Machine => (HKEY_LOCAL_MACHINE, access | KEY_WOW64_64KEY),
        };
        RegKey::predef(root)
            .open_subkey_with_flags(path, access)
            .map_err(|e| SourceError::from_io(e, format!("{}\\{}", hive_name(scope), path)))
    }
}

fn hive_name(scope: StartupScope) -> &'static str {
    match scope {
        StartupScope::User => "HKCU",
        StartupScope::Machine => "HKLM",
    }
}

impl KeyValueSource for RegistrySource {
    fn registrations(&self, scope: StartupScope) -> SourceResult<HashMap<String, String>> {
        let key = self.open(scope, RUN_PATH, KEY_READ)?;
        let mut programs = HashMap::new();
        for (name, value) in key.enum_values().filter_map(|x| x.ok()) {
            match String::from_reg_value(&value) {
                Ok(path) => {
                    programs.insert(name, path);
                }
                Err(e) => log::debug!("Skipping non-string Run value '{}': {}", name, e),
            }
        }
        Ok(programs)
    }

    fn set_registration(&mut self, scope: StartupScope, name: &str, path: &str) -> SourceResult<()> {
        let key = self.open(scope, RUN_PATH, KEY_SET_VALUE)?;
        key.set_value(name, &path)
            .map_err(|e| SourceError::from_io(e, format!("{}\\{}\\{}", hive_name(scope), RUN_PATH, name)))
    }

    fn delete_registration(&mut self, scope: StartupScope, name: &str) -> SourceResult<bool> {
        let key = self.open(scope, RUN_PATH, KEY_QUERY_VALUE | KEY_SET_VALUE)?;
        if key.get_raw_value(name).is_err() {
            return Ok(false);
        }
        key.delete_value(name)
            .map_err(|e| SourceError::from_io(e, format!("{}\\{}\\{}", hive_name(scope), RUN_PATH, name)))?;
        Ok(true)
    }

    fn approvals(&self, scope: StartupScope) -> SourceResult<HashMap<String, StartupStatus>> {
        let key = self.open(scope, APPROVED_PATH, KEY_READ)?;
        let mut status_map = HashMap::new();
        for (name, value) in key.enum_values().filter_map(|x| x.ok()) {
            // Only byte 0 carries the state; the rest is a timestamp.
            match value.bytes.first() {
                Some(&code) => {
                    status_map.insert(name, StartupStatus::from_code(code));
                }
                None => log::debug!("Skipping empty StartupApproved value '{}'", name),
            }
        }
        Ok(status_map)
    }

    fn set_approval(
        &mut self,
        scope: StartupScope,
        name: &str,
        status: StartupStatus,
    ) -> SourceResult<()> {
        let key = self.open(scope, APPROVED_PATH, KEY_SET_VALUE)?;
        let value = RegValue {
            bytes: vec![status.code(), 0x00, 0x00, 0x00],
            vtype: REG_BINARY,
        };
        key.set_raw_value(name, &value)
            .map_err(|e| SourceError::from_io(e, format!("{}\\{}\\{}", hive_name(scope), APPROVED_PATH, name)))
    }
}
