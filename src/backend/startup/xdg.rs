use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::keyfile::KeyFile;
use super::source::{check_single_line, KeyValueSource, SourceError, SourceResult};
use crate::model::{StartupScope, StartupStatus};

const APPROVAL_SECTION: &str = "StartupApproved";

/// XDG autostart directories as registration sources, plus a key file per
/// scope recording approval codes.
pub struct XdgSource {
    user_autostart: PathBuf,
    machine_autostart: PathBuf,
    user_approvals: PathBuf,
    machine_approvals: PathBuf,
}

impl XdgSource {
    pub fn new() -> Self {
        let config = dirs::config_dir().unwrap_or_else(|| {
            PathBuf::from(format!("{}/.config", std::env::var("HOME").unwrap_or_default()))
        });
        Self::with_dirs(
            config.join("autostart"),
            PathBuf::from("/etc/xdg/autostart"),
            config.join("sysky").join("startup-approved"),
            PathBuf::from("/etc/xdg/sysky/startup-approved"),
        )
    }

    pub fn with_dirs(
        user_autostart: PathBuf,
        machine_autostart: PathBuf,
        user_approvals: PathBuf,
        machine_approvals: PathBuf,
    ) -> Self {
        Self {
            user_autostart,
            machine_autostart,
            user_approvals,
            machine_approvals,
        }
    }

    fn autostart_dir(&self, scope: StartupScope) -> &Path {
        match scope {
            StartupScope::User => &self.user_autostart,
            StartupScope::Machine => &self.machine_autostart,
        }
    }

    fn approvals_file(&self, scope: StartupScope) -> &Path {
        match scope {
            StartupScope::User => &self.user_approvals,
            StartupScope::Machine => &self.machine_approvals,
        }
    }

    fn read_approvals(&self, scope: StartupScope) -> SourceResult<KeyFile> {
        let path = self.approvals_file(scope);
        let content = fs::read_to_string(path)
            .map_err(|e| SourceError::from_io(e, path.display().to_string()))?;
        Ok(KeyFile::parse(&content))
    }
}

impl Default for XdgSource {
    fn default() -> Self {
        Self::new()
    }
}

impl XdgSource {
    /// Desktop files of `scope` with their resolved names. A user file named
    /// after a system file overrides it; when the user file carries no
    /// `Name=` it takes the system file's name.
    fn entries(&self, scope: StartupScope) -> SourceResult<Vec<DesktopEntry>> {
        match scope {
            StartupScope::User => {
                let machine = scan_autostart_dir(&self.machine_autostart).unwrap_or_default();
                let mut entries = scan_autostart_dir(&self.user_autostart)?;
                for entry in entries.iter_mut().filter(|e| !e.named) {
                    if let Some(system) = machine.iter().find(|m| m.file_name == entry.file_name) {
                        entry.name = system.name.clone();
                    }
                }
                Ok(entries)
            }
            StartupScope::Machine => {
                let user = scan_autostart_dir(&self.user_autostart).unwrap_or_default();
                let mut entries = scan_autostart_dir(&self.machine_autostart)?;
                for entry in entries.iter_mut() {
                    entry.overridden = user.iter().any(|u| u.file_name == entry.file_name);
                }
                Ok(entries)
            }
        }
    }
}

impl KeyValueSource for XdgSource {
    fn registrations(&self, scope: StartupScope) -> SourceResult<HashMap<String, String>> {
        let mut programs = HashMap::new();
        for entry in self.entries(scope)? {
            if !entry.is_active() {
                continue;
            }
            programs
                .entry(entry.name)
                .or_insert_with(|| entry.exec.unwrap_or_default());
        }
        Ok(programs)
    }

    fn set_registration(&mut self, scope: StartupScope, name: &str, path: &str) -> SourceResult<()> {
        check_single_line("name", name)?;
        check_single_line("path", path)?;

        let existing = match self.entries(scope) {
            Ok(entries) => entries.into_iter().find(|e| e.name == name),
            Err(SourceError::Unavailable(_)) => None,
            Err(e) => return Err(e),
        };

        if let Some(entry) = existing {
            set_desktop_key(&entry.file_path, "Exec", path)?;
            if !entry.named {
                set_desktop_key(&entry.file_path, "Name", name)?;
            }
            if entry.hidden {
                set_desktop_key(&entry.file_path, "Hidden", "false")?;
            }
            if !entry.autostart_enabled {
                set_desktop_key(&entry.file_path, "X-GNOME-Autostart-enabled", "true")?;
            }
            return Ok(());
        }

        let dir = self.autostart_dir(scope);
        fs::create_dir_all(dir).map_err(|e| SourceError::from_io(e, dir.display().to_string()))?;
        let file_path = unused_file_path(dir, name);
        let content = format!(
            "[Desktop Entry]\nType=Application\nName={}\nExec={}\nX-GNOME-Autostart-enabled=true\n",
            name, path
        );
        fs::write(&file_path, content)
            .map_err(|e| SourceError::from_io(e, file_path.display().to_string()))
    }

    fn delete_registration(&mut self, scope: StartupScope, name: &str) -> SourceResult<bool> {
        let entries = match self.entries(scope) {
            Ok(entries) => entries,
            Err(SourceError::Unavailable(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        let mut removed = false;
        for entry in entries.into_iter().filter(|e| e.name == name && e.is_active()) {
            fs::remove_file(&entry.file_path)
                .map_err(|e| SourceError::from_io(e, entry.file_path.display().to_string()))?;
            removed = true;
        }
        Ok(removed)
    }

    /// Key-file codes, plus Disabled for desktop files switched off with
    /// `Hidden=true` or `X-GNOME-Autostart-enabled=false`. The key file wins.
    fn approvals(&self, scope: StartupScope) -> SourceResult<HashMap<String, StartupStatus>> {
        let file = self.read_approvals(scope);
        let entries = self.entries(scope);
        if let (Err(SourceError::Unavailable(missing)), Err(SourceError::Unavailable(_))) = (&file, &entries) {
            return Err(SourceError::Unavailable(missing.clone()));
        }

        let mut status_map = HashMap::new();
        for entry in entries.unwrap_or_default() {
            if !entry.overridden && (entry.hidden || !entry.autostart_enabled) {
                status_map.insert(entry.name, StartupStatus::Disabled);
            }
        }

        let file = match file {
            Ok(file) => file,
            Err(SourceError::Unavailable(_)) => return Ok(status_map),
            Err(e) => return Err(e),
        };
        for (key, value) in file.section(APPROVAL_SECTION) {
            match value.parse::<u8>() {
                Ok(code) => {
                    status_map.insert(decode_key(key), StartupStatus::from_code(code));
                }
                Err(_) => log::warn!(
                    "Ignoring approval '{}' with unreadable code '{}' in {}",
                    key,
                    value,
                    self.approvals_file(scope).display()
                ),
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
        check_single_line("name", name)?;

        let mut file = match self.read_approvals(scope) {
            Ok(file) => file,
            Err(SourceError::Unavailable(_)) => KeyFile::default(),
            Err(e) => return Err(e),
        };
        file.set(APPROVAL_SECTION, &encode_key(name), &status.code().to_string());

        let path = self.approvals_file(scope);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SourceError::from_io(e, parent.display().to_string()))?;
        }
        fs::write(path, file.to_string())
            .map_err(|e| SourceError::from_io(e, path.display().to_string()))
    }
}

/// Percent-escapes the characters a key-file key cannot carry verbatim:
/// `%`, `=`, a leading `[`, `#` or `;`, and surrounding whitespace.
fn encode_key(name: &str) -> String {
    let lead_end = name.len() - name.trim_start().len();
    let trail_start = name.trim_end().len().max(lead_end);

    let mut key = String::with_capacity(name.len());
    for (i, c) in name.char_indices() {
        let escape = c == '%'
            || c == '='
            || (i == 0 && matches!(c, '[' | '#' | ';'))
            || i < lead_end
            || i >= trail_start;
        if escape {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                key.push_str(&format!("%{:02X}", b));
            }
        } else {
            key.push(c);
        }
    }
    key
}

fn decode_key(key: &str) -> String {
    let bytes = key.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

struct DesktopEntry {
    name: String,
    /// Whether `name` came from a `Name=` line rather than the file name.
    named: bool,
    exec: Option<String>,
    hidden: bool,
    autostart_enabled: bool,
    /// A user file of the same file name takes precedence.
    overridden: bool,
    file_name: std::ffi::OsString,
    file_path: PathBuf,
}

impl DesktopEntry {
    fn is_active(&self) -> bool {
        !self.hidden && self.autostart_enabled && !self.overridden
    }
}

fn scan_autostart_dir(dir: &Path) -> SourceResult<Vec<DesktopEntry>> {
    let read_dir = fs::read_dir(dir).map_err(|e| SourceError::from_io(e, dir.display().to_string()))?;

    let mut paths: Vec<PathBuf> = read_dir
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "desktop").unwrap_or(false))
        .collect();
    // read_dir order is unspecified; keep "first file wins" stable.
    paths.sort();

    let mut entries = Vec::new();
    for path in paths {
        match parse_desktop_file(&path) {
            Ok(entry) => entries.push(entry),
            Err(e) => log::debug!("Skipping unreadable {}: {}", path.display(), e),
        }
    }
    Ok(entries)
}

fn parse_desktop_file(path: &Path) -> io::Result<DesktopEntry> {
    let content = fs::read_to_string(path)?;

    let mut name = None;
    let mut exec = None;
    let mut hidden = false;
    let mut autostart_enabled = true;
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();
        if line == "[Desktop Entry]" {
            in_desktop_entry = true;
            continue;
        }
        if line.starts_with('[') {
            in_desktop_entry = false;
            continue;
        }
        if !in_desktop_entry {
            continue;
        }

        if let Some(val) = line.strip_prefix("Name=") {
            if name.is_none() {
                name = Some(val.to_string());
            }
        } else if let Some(val) = line.strip_prefix("Exec=") {
            exec = Some(val.to_string());
        } else if let Some(val) = line.strip_prefix("Hidden=") {
            hidden = val.trim().eq_ignore_ascii_case("true");
        } else if let Some(val) = line.strip_prefix("X-GNOME-Autostart-enabled=") {
            autostart_enabled = !val.trim().eq_ignore_ascii_case("false");
        }
    }

    let named = name.is_some();
    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });

    Ok(DesktopEntry {
        name,
        named,
        exec,
        hidden,
        autostart_enabled,
        overridden: false,
        file_name: path.file_name().unwrap_or_default().to_os_string(),
        file_path: path.to_path_buf(),
    })
}

/// Replace `key` inside `[Desktop Entry]`, appending it to that section if absent.
fn set_desktop_key(path: &Path, key: &str, value: &str) -> SourceResult<()> {
    let content =
        fs::read_to_string(path).map_err(|e| SourceError::from_io(e, path.display().to_string()))?;

    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    let prefix = format!("{}=", key);
    let entry_line = format!("{}={}", key, value);

    let mut in_desktop_entry = false;
    let mut section_end = None;
    let mut found = false;
    for (i, line) in lines.iter_mut().enumerate() {
        let trimmed = line.trim();
        if trimmed == "[Desktop Entry]" {
            in_desktop_entry = true;
            continue;
        }
        if trimmed.starts_with('[') {
            if in_desktop_entry && section_end.is_none() {
                section_end = Some(i);
            }
            in_desktop_entry = false;
            continue;
        }
        if in_desktop_entry && trimmed.starts_with(&prefix) {
            *line = entry_line.clone();
            found = true;
            break;
        }
    }

    if !found {
        let insert_pos = section_end.unwrap_or(lines.len());
        lines.insert(insert_pos, entry_line);
    }

    let mut new_content = lines.join("\n");
    new_content.push('\n');

    fs::write(path, new_content).map_err(|e| SourceError::from_io(e, path.display().to_string()))
}

fn unused_file_path(dir: &Path, name: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches(|c| c == '-' || c == '.');
    let stem = if stem.is_empty() { "entry" } else { stem };

    let mut candidate = dir.join(format!("{}.desktop", stem));
    let mut n = 2;
    while candidate.exists() {
        candidate = dir.join(format!("{}-{}.desktop", stem, n));
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::super::{PathCache, StartupManager};
    use super::*;
    use tempfile::TempDir;

    fn source(root: &TempDir) -> XdgSource {
        XdgSource::with_dirs(
            root.path().join("user/autostart"),
            root.path().join("machine/autostart"),
            root.path().join("user/sysky/startup-approved"),
            root.path().join("machine/sysky/startup-approved"),
        )
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn registrations_read_desktop_files() {
        let root = TempDir::new().unwrap();
        let src = source(&root);
        let dir = root.path().join("machine/autostart");
        write(
            &dir.join("nm-applet.desktop"),
            "[Desktop Entry]\nName=Network\nExec=nm-applet --indicator\n[Desktop Action Off]\nExec=false\n",
        );
        write(&dir.join("no-name.desktop"), "[Desktop Entry]\nExec=/usr/bin/no-name\n");
        write(&dir.join("masked.desktop"), "[Desktop Entry]\nName=Masked\nExec=x\nHidden=true\n");
        write(&dir.join("README"), "not a desktop file");

        let programs = src.registrations(StartupScope::Machine).unwrap();

        assert_eq!(programs.len(), 2);
        assert_eq!(programs["Network"], "nm-applet --indicator");
        assert_eq!(programs["no-name"], "/usr/bin/no-name");
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let root = TempDir::new().unwrap();
        let src = source(&root);
        assert!(matches!(
            src.registrations(StartupScope::User),
            Err(SourceError::Unavailable(_))
        ));
        assert!(matches!(
            src.approvals(StartupScope::User),
            Err(SourceError::Unavailable(_))
        ));
    }

    #[test]
    fn set_registration_creates_then_rewrites_in_place() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);

        src.set_registration(StartupScope::User, "My Tool", "/opt/tool --tray").unwrap();
        src.set_registration(StartupScope::User, "My Tool", "/opt/tool2").unwrap();

        let dir = root.path().join("user/autostart");
        let files: Vec<_> = fs::read_dir(&dir).unwrap().flatten().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name(), "My-Tool.desktop");
        let content = fs::read_to_string(files[0].path()).unwrap();
        assert!(content.contains("Name=My Tool\n"));
        assert!(content.contains("Exec=/opt/tool2\n"));
        assert!(!content.contains("/opt/tool --tray"));
    }

    #[test]
    fn set_registration_unhides_existing_entry() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);
        let file = root.path().join("user/autostart/app.desktop");
        write(&file, "[Desktop Entry]\nName=App\nExec=/old\nHidden=true\n[Extra]\nKey=1\n");

        src.set_registration(StartupScope::User, "App", "/new").unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content, "[Desktop Entry]\nName=App\nExec=/new\nHidden=false\n[Extra]\nKey=1\n");
        assert_eq!(src.registrations(StartupScope::User).unwrap()["App"], "/new");
    }

    #[test]
    fn set_registration_avoids_clobbering_other_files() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);
        write(
            &root.path().join("user/autostart/app.desktop"),
            "[Desktop Entry]\nName=Something Else\nExec=/else\n",
        );

        src.set_registration(StartupScope::User, "app", "/app").unwrap();

        let programs = src.registrations(StartupScope::User).unwrap();
        assert_eq!(programs["Something Else"], "/else");
        assert_eq!(programs["app"], "/app");
    }

    #[test]
    fn line_breaks_are_rejected() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);
        assert!(matches!(
            src.set_registration(StartupScope::User, "App", "/bin/x\nHidden=true"),
            Err(SourceError::Malformed(_))
        ));
        assert!(matches!(
            src.set_approval(StartupScope::User, "a\nb", StartupStatus::Enabled),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn delete_registration_reports_presence() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);
        assert!(!src.delete_registration(StartupScope::User, "App").unwrap());

        src.set_registration(StartupScope::User, "App", "/app").unwrap();
        assert!(src.delete_registration(StartupScope::User, "App").unwrap());
        assert!(!src.delete_registration(StartupScope::User, "App").unwrap());
        assert!(src.registrations(StartupScope::User).unwrap().is_empty());
    }

    #[test]
    fn approvals_round_trip_through_key_file() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);

        src.set_approval(StartupScope::User, "App1", StartupStatus::Enabled).unwrap();
        src.set_approval(StartupScope::User, "App2", StartupStatus::Disabled).unwrap();
        src.set_approval(StartupScope::User, "App1", StartupStatus::Disabled).unwrap();

        let approvals = src.approvals(StartupScope::User).unwrap();
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals["App1"], StartupStatus::Disabled);
        assert_eq!(approvals["App2"], StartupStatus::Disabled);

        let raw = fs::read_to_string(root.path().join("user/sysky/startup-approved")).unwrap();
        assert_eq!(raw, "[StartupApproved]\nApp1=3\nApp2=3\n");
    }

    #[test]
    fn approval_keys_survive_key_file_syntax() {
        let root = TempDir::new().unwrap();
        let mut src = source(&root);
        let names = ["Sync=Cloud", "#hash", "[bracket]", " padded ", "50%", ";semi", "Café"];

        for name in names {
            src.set_approval(StartupScope::User, name, StartupStatus::Disabled).unwrap();
        }

        let approvals = src.approvals(StartupScope::User).unwrap();
        assert_eq!(approvals.len(), names.len());
        for name in names {
            assert_eq!(approvals[name], StartupStatus::Disabled, "{:?}", name);
        }
        let raw = fs::read_to_string(root.path().join("user/sysky/startup-approved")).unwrap();
        assert!(raw.contains("Sync%3DCloud=3\n"));
        assert!(raw.contains("%20padded%20=3\n"));
    }

    #[test]
    fn key_encoding_leaves_plain_names_alone() {
        assert_eq!(encode_key("Discord"), "Discord");
        assert_eq!(encode_key("My App"), "My App");
        assert_eq!(encode_key("a#b[c]"), "a#b[c]");
        assert_eq!(decode_key("100%"), "100%");
        assert_eq!(decode_key("%zz"), "%zz");
    }

    #[test]
    fn disabling_a_name_with_equals_keeps_it_listed() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join("user/autostart/sync.desktop"),
            "[Desktop Entry]\nName=Sync=Cloud\nExec=/usr/bin/sync-cloud\n",
        );
        let mut mgr = StartupManager::new(source(&root), PathCache::new());

        assert!(mgr.disable("Sync=Cloud"));

        let entries = mgr.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Sync=Cloud");
        assert_eq!(entries[0].status, StartupStatus::Disabled);
        assert_eq!(entries[0].path.as_deref(), Some("/usr/bin/sync-cloud"));
    }

    #[test]
    fn gnome_disabled_entries_list_as_disabled() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join("machine/autostart/tracker.desktop"),
            "[Desktop Entry]\nName=Tracker\nExec=/usr/libexec/tracker\nX-GNOME-Autostart-enabled=false\n",
        );
        let mut mgr = StartupManager::new(source(&root), PathCache::new());

        assert!(mgr.source().registrations(StartupScope::Machine).unwrap().is_empty());
        let entries = mgr.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, StartupStatus::Disabled);
        assert_eq!(entries[0].scope, StartupScope::Machine);

        assert!(mgr.enable("Tracker", Some("/usr/libexec/tracker"), StartupScope::Machine));
        let content = fs::read_to_string(root.path().join("machine/autostart/tracker.desktop")).unwrap();
        assert!(content.contains("X-GNOME-Autostart-enabled=true"));
        assert_eq!(mgr.list()[0].status, StartupStatus::Enabled);
    }

    #[test]
    fn user_file_masks_system_file_of_same_name() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join("machine/autostart/applet.desktop"),
            "[Desktop Entry]\nName=Applet\nExec=/usr/bin/applet\n",
        );
        write(
            &root.path().join("user/autostart/applet.desktop"),
            "[Desktop Entry]\nHidden=true\n",
        );
        let mut mgr = StartupManager::new(source(&root), PathCache::new());

        assert!(mgr.source().registrations(StartupScope::Machine).unwrap().is_empty());
        let entries = mgr.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Applet");
        assert_eq!(entries[0].status, StartupStatus::Disabled);
        assert_eq!(entries[0].scope, StartupScope::User);

        assert!(mgr.enable("Applet", Some("/usr/bin/applet --tray"), StartupScope::User));
        let content = fs::read_to_string(root.path().join("user/autostart/applet.desktop")).unwrap();
        assert_eq!(
            content,
            "[Desktop Entry]\nHidden=false\nExec=/usr/bin/applet --tray\nName=Applet\n"
        );
        let entries = mgr.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, StartupStatus::Enabled);
        assert_eq!(entries[0].path.as_deref(), Some("/usr/bin/applet --tray"));
    }

    #[test]
    fn unreadable_codes_are_skipped() {
        let root = TempDir::new().unwrap();
        let src = source(&root);
        write(
            &root.path().join("machine/sysky/startup-approved"),
            "[StartupApproved]\nGood=2\nBad=yes\n",
        );

        let approvals = src.approvals(StartupScope::Machine).unwrap();
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals["Good"], StartupStatus::Enabled);
    }

    #[test]
    fn manager_disable_and_reenable_over_autostart_files() {
        let root = TempDir::new().unwrap();
        write(
            &root.path().join("user/autostart/app1.desktop"),
            "[Desktop Entry]\nType=Application\nName=App1\nExec=/usr/bin/app1\n",
        );
        let mut mgr = StartupManager::new(source(&root), PathCache::new());

        assert!(mgr.disable("App1"));
        assert!(!root.path().join("user/autostart/app1.desktop").exists());

        let entries = mgr.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.as_deref(), Some("/usr/bin/app1"));
        assert_eq!(entries[0].status, StartupStatus::Disabled);
        assert_eq!(entries[0].scope, StartupScope::User);

        assert!(mgr.enable("App1", None, StartupScope::User));
        let entries = mgr.list();
        assert_eq!(entries[0].status, StartupStatus::Enabled);
        assert_eq!(
            mgr.source().registrations(StartupScope::User).unwrap()["App1"],
            "/usr/bin/app1"
        );
    }
}
