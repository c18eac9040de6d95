//! Sender identity resolution.
//!
//! Exports sometimes record the same person under several spellings (a
//! renamed account, a trailing emoji that got mangled). The alias table maps
//! every known spelling to one canonical display name.

use std::collections::{BTreeMap, HashMap};

/// Alias table plus the archive owner.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    owner: Option<String>,
    lookup: HashMap<String, String>,
}

impl Identity {
    /// Build from an owner and a `canonical -> [spellings]` table.
    pub fn new(owner: Option<String>, aliases: &BTreeMap<String, Vec<String>>) -> Self {
        let mut lookup = HashMap::new();
        for (canonical, spellings) in aliases {
            lookup.insert(canonical.clone(), canonical.clone());
            for spelling in spellings {
                lookup.insert(spelling.clone(), canonical.clone());
            }
        }
        let owner = owner.filter(|o| !o.trim().is_empty());
        Self { owner, lookup }
    }

    /// Canonical name for `name`, or `name` itself if it is not aliased.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Canonical name of the archive owner, if configured.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref().map(|o| self.canonical(o))
    }

    /// Whether `name` (any spelling) is the archive owner.
    pub fn is_owner(&self, name: &str) -> bool {
        self.owner()
            .is_some_and(|owner| self.canonical(name) == owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn felipe() -> Identity {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            "Felipe".to_string(),
            vec![
                "Felipe Canales H.".to_string(),
                "Felipe Canales H.\u{f0}".to_string(),
            ],
        );
        Identity::new(Some("Felipe".to_string()), &aliases)
    }

    #[test]
    fn test_all_spellings_resolve_to_canonical() {
        let id = felipe();
        assert_eq!(id.canonical("Felipe Canales H."), "Felipe");
        assert_eq!(id.canonical("Felipe Canales H.\u{f0}"), "Felipe");
        assert_eq!(id.canonical("Felipe"), "Felipe");
        assert!(id.is_owner("Felipe Canales H."));
        assert!(id.is_owner("Felipe Canales H.\u{f0}"));
    }

    #[test]
    fn test_unknown_names_pass_through() {
        let id = felipe();
        assert_eq!(id.canonical("Camila"), "Camila");
        assert!(!id.is_owner("Camila"));
    }

    #[test]
    fn test_owner_given_as_alias() {
        let mut aliases = BTreeMap::new();
        aliases.insert("Felipe".to_string(), vec!["Felipe C.".to_string()]);
        let id = Identity::new(Some("Felipe C.".to_string()), &aliases);
        assert_eq!(id.owner(), Some("Felipe"));
        assert!(id.is_owner("Felipe"));
    }

    #[test]
    fn test_no_owner_means_nobody_is_owner() {
        let id = Identity::new(None, &BTreeMap::new());
        assert!(!id.is_owner("Felipe"));
        let blank = Identity::new(Some("  ".to_string()), &BTreeMap::new());
        assert!(blank.owner().is_none());
    }
}
