use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::info;

use metascreen_core::models::reference::ReferenceEntry;
use metascreen_core::normalize::normalize_name;

use crate::error::ReferenceError;
use crate::loader;

/// Validated, indexed reference table.
///
/// Name resolution is exact identifier, then exact display name, then the
/// normalized form of identifiers, display names and aliases. A normalized
/// key never maps to two entries; that is rejected at construction.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    version: String,
    entries: Vec<ReferenceEntry>,
    by_id: HashMap<String, usize>,
    by_display_name: HashMap<String, usize>,
    by_normalized: HashMap<String, usize>,
}

impl ReferenceTable {
    /// The reference table embedded in the binary.
    pub fn builtin() -> Result<Self, ReferenceError> {
        let table = Self::from_entries(loader::BUILTIN_VERSION, loader::load_builtin_v1()?)?;
        info!(
            version = table.version(),
            entries = table.len(),
            "loaded built-in reference table"
        );
        Ok(table)
    }

    /// Load a TSV reference table. The version is the file stem.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let entries = loader::load_reference_tsv(path)?;
        let version = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom");
        let table = Self::from_entries(version, entries)?;
        info!(
            path = %path.display(),
            version = table.version(),
            entries = table.len(),
            "loaded reference table"
        );
        Ok(table)
    }

    pub fn from_entries(
        version: &str,
        entries: Vec<ReferenceEntry>,
    ) -> Result<Self, ReferenceError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_display_name = HashMap::with_capacity(entries.len());
        let mut by_normalized = HashMap::with_capacity(entries.len() * 3);
        let mut panel_orders: HashMap<String, u32> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            validate_bounds(entry)?;

            if by_id.insert(entry.id.clone(), idx).is_some() {
                return Err(ReferenceError::DuplicateId(entry.id.clone()));
            }
            by_display_name
                .entry(entry.display_name.clone())
                .or_insert(idx);

            let names = std::iter::once(&entry.id)
                .chain(std::iter::once(&entry.display_name))
                .chain(entry.aliases.iter());
            for name in names {
                let key = normalize_name(name);
                match by_normalized.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(idx);
                    }
                    Entry::Occupied(slot) if *slot.get() != idx => {
                        return Err(ReferenceError::AmbiguousName {
                            name: name.clone(),
                            first: entries[*slot.get()].id.clone(),
                            second: entry.id.clone(),
                        });
                    }
                    Entry::Occupied(_) => {}
                }
            }

            match panel_orders.get(entry.panel.as_str()) {
                Some(&order) if order != entry.panel_order => {
                    return Err(ReferenceError::InconsistentPanelOrder {
                        panel: entry.panel.clone(),
                        first: order,
                        second: entry.panel_order,
                    });
                }
                Some(_) => {}
                None => {
                    panel_orders.insert(entry.panel.clone(), entry.panel_order);
                }
            }
        }

        Ok(Self {
            version: version.to_string(),
            entries,
            by_id,
            by_display_name,
            by_normalized,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by identifier only.
    pub fn get(&self, id: &str) -> Option<&ReferenceEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Resolve a metabolite name as written in a laboratory file.
    pub fn resolve(&self, name: &str) -> Option<&ReferenceEntry> {
        self.by_id
            .get(name)
            .or_else(|| self.by_display_name.get(name))
            .or_else(|| self.by_normalized.get(&normalize_name(name)))
            .map(|&idx| &self.entries[idx])
    }

    /// Panel names with their display order, sorted by that order.
    pub fn panels(&self) -> Vec<(&str, u32)> {
        let mut panels: Vec<(&str, u32)> = Vec::new();
        for entry in &self.entries {
            if !panels.iter().any(|(name, _)| *name == entry.panel) {
                panels.push((&entry.panel, entry.panel_order));
            }
        }
        panels.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        panels
    }

    pub fn to_tsv(&self) -> Result<String, ReferenceError> {
        loader::write_reference_tsv(&self.entries)
    }
}

fn validate_bounds(entry: &ReferenceEntry) -> Result<(), ReferenceError> {
    let invalid = |message: &str| ReferenceError::InvalidBounds {
        id: entry.id.clone(),
        message: message.to_string(),
    };
    for bound in [entry.lower, entry.upper].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(invalid("bound is not a finite number"));
        }
    }
    if let (Some(lower), Some(upper)) = (entry.lower, entry.upper)
        && lower > upper
    {
        return Err(invalid("lower bound exceeds upper bound"));
    }
    Ok(())
}
