/// Minimal INI-style key file: `[Section]` headers followed by `key=value`
/// lines. Blank lines and `#`/`;` comments are dropped on rewrite.
#[derive(Debug, Default)]
pub struct KeyFile {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl KeyFile {
    pub fn parse(content: &str) -> Self {
        let mut sections = Vec::new();
        let mut current_name = String::new();
        let mut current_kvs: Vec<(String, String)> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                if !current_name.is_empty() {
                    sections.push((current_name, current_kvs));
                }
                current_name = trimmed[1..trimmed.len() - 1].to_string();
                current_kvs = Vec::new();
            } else if let Some(eq_pos) = trimmed.find('=') {
                if current_name.is_empty() {
                    continue;
                }
                let key = trimmed[..eq_pos].trim().to_string();
                let val = trimmed[eq_pos + 1..].trim().to_string();
                current_kvs.push((key, val));
            }
        }
        if !current_name.is_empty() {
            sections.push((current_name, current_kvs));
        }

        Self { sections }
    }

    pub fn section<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.sections
            .iter()
            .filter(move |(n, _)| n == name)
            .flat_map(|(_, kvs)| kvs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|(n, _)| n == section)
            .flat_map(|(_, kvs)| kvs.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        if let Some((_, kvs)) = self.sections.iter_mut().find(|(n, _)| n == section) {
            if let Some(kv) = kvs.iter_mut().find(|(k, _)| k == key) {
                kv.1 = value.to_string();
            } else {
                kvs.push((key.to_string(), value.to_string()));
            }
        } else {
            self.sections.push((
                section.to_string(),
                vec![(key.to_string(), value.to_string())],
            ));
        }
    }
}

impl std::fmt::Display for KeyFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, kvs)) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", name)?;
            for (k, v) in kvs {
                writeln!(f, "{}={}", k, v)?;
            }
        }
        Ok(())
    }
}
