use std::collections::{HashMap, HashSet};

use super::slug::slugify;

/// Name allocated for one source id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredName {
    pub id: String,
    /// Slug shared by the resource and any per-resource variables
    pub stem: String,
    /// Terraform resource name (`stem` + registry suffix)
    pub name: String,
}

/// Maps source content ids to generated Terraform resource names.
///
/// Names are unique within the registry and valid HCL identifiers. Entries are
/// kept in registration order.
#[derive(Debug, Clone)]
pub struct ResourceNameRegistry {
    resource_type: &'static str,
    suffix: &'static str,
    entries: Vec<RegisteredName>,
    by_id: HashMap<String, usize>,
    stems: HashSet<String>,
}

impl ResourceNameRegistry {
    pub fn new(resource_type: &'static str, suffix: &'static str) -> Self {
        Self {
            resource_type,
            suffix,
            entries: Vec::new(),
            by_id: HashMap::new(),
            stems: HashSet::new(),
        }
    }

    /// Allocate a name for `id` derived from a human readable label.
    ///
    /// Re-registering an id returns its existing name.
    pub fn register(&mut self, id: &str, label: &str) -> &RegisteredName {
        if let Some(&pos) = self.by_id.get(id) {
            return &self.entries[pos];
        }

        let base = identifier_stem(label);
        let mut stem = base.clone();
        let mut n = 2;
        while self.stems.contains(&stem) {
            stem = format!("{}_{}", base, n);
            n += 1;
        }

        self.insert(id, stem)
    }

    /// Register `id` under a fixed stem (e.g. the integration root)
    pub fn register_exact(&mut self, id: &str, stem: &str) -> &RegisteredName {
        if let Some(&pos) = self.by_id.get(id) {
            return &self.entries[pos];
        }

        self.insert(id, stem.to_string())
    }

    fn insert(&mut self, id: &str, stem: String) -> &RegisteredName {
        let name = format!("{}{}", stem, self.suffix);
        self.stems.insert(stem.clone());
        self.by_id.insert(id.to_string(), self.entries.len());
        self.entries.push(RegisteredName {
            id: id.to_string(),
            stem,
            name,
        });

        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredName> {
        self.by_id.get(id).map(|&pos| &self.entries[pos])
    }

    /// `<type>.<name>.id` reference for the resource generated for `id`
    pub fn reference(&self, id: &str) -> Option<String> {
        self.get(id)
            .map(|entry| format!("{}.{}.id", self.resource_type, entry.name))
    }

    /// Resource names in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Slug that is also a valid identifier start
fn identifier_stem(label: &str) -> String {
    let slug = slugify(label);

    if slug.is_empty() {
        return "unnamed".to_string();
    }

    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("r_{}", slug);
    }

    slug
}
