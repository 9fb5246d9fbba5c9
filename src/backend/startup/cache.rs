use std::collections::HashMap;

/// Last-known paths of entries whose registration was deleted by a disable.
/// Lives as long as its owner; never written to disk.
#[derive(Debug, Clone, Default)]
pub struct PathCache {
    paths: HashMap<String, String>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(|p| p.as_str())
    }

    pub fn remember(&mut self, name: &str, path: &str) {
        self.paths.insert(name.to_string(), path.to_string());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_overwrites_previous_path() {
        let mut cache = PathCache::new();
        assert!(cache.is_empty());
        cache.remember("App1", "C:\\Old\\App1.exe");
        cache.remember("App1", "C:\\App1.exe");
        assert_eq!(cache.get("App1"), Some("C:\\App1.exe"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("App2"), None);
    }
}
