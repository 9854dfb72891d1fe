//! Catalog records and the selection handoff between pages.
//!
//! The catalog page lists `{name, thumbnail, file, type}` records and stores
//! the chosen one under [`SELECTION_STORAGE_KEY`]; the configurator page reads
//! it back to decide which model to load and which recipe applies.

use serde::{Deserialize, Serialize};

use crate::errors::CatalogError;
use crate::types::ProductVariant;

/// Local-storage key holding the selected catalog entry as JSON.
pub const SELECTION_STORAGE_KEY: &str = "selectedModel";

/// Model loaded when nothing was selected.
pub const DEFAULT_MODEL_PATH: &str = "./models/lemari.glb";

/// One selectable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub file: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, file: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumbnail: None,
            file: file.into(),
            kind: kind.into(),
        }
    }

    /// The entry used when the configurator opens without a selection.
    pub fn fallback() -> Self {
        Self::new("Lemari", DEFAULT_MODEL_PATH, "cabinet")
    }

    /// The layout recipe for this product type.
    pub fn variant(&self) -> ProductVariant {
        match self.kind.trim().to_ascii_lowercase().as_str() {
            "rack" => ProductVariant::TiledGrid,
            "drawer" | "laci" | "stack" => ProductVariant::StackedComposite,
            _ => ProductVariant::Single,
        }
    }

    /// Serialize for the selection handoff.
    pub fn to_storage_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read the stored selection, falling back to the default model when the
    /// key is absent.
    pub fn from_storage_json(stored: Option<&str>) -> Result<Self, CatalogError> {
        match stored {
            Some(json) => {
                let entry: CatalogEntry = serde_json::from_str(json)?;
                entry.validate(0)?;
                Ok(entry)
            }
            None => Ok(Self::fallback()),
        }
    }

    fn validate(&self, index: usize) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::EmptyName { index });
        }
        if self.file.trim().is_empty() {
            return Err(CatalogError::MissingFile { name: self.name.clone() });
        }
        Ok(())
    }
}

/// Parse the catalog feed, keeping its order.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    for (index, entry) in entries.iter().enumerate() {
        entry.validate(index)?;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"name": "Rak Besi", "thumbnail": "./thumbs/rak.png",
         "file": "./models/rak.glb", "type": "rack"},
        {"name": "Laci Susun", "file": "./models/laci.glb", "type": "laci"},
        {"name": "Lemari", "file": "./models/lemari.glb", "type": "cabinet"}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let entries = parse_catalog(CATALOG).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Rak Besi");
        assert_eq!(entries[1].thumbnail, None);
        assert_eq!(entries[0].variant(), ProductVariant::TiledGrid);
        assert_eq!(entries[1].variant(), ProductVariant::StackedComposite);
        assert_eq!(entries[2].variant(), ProductVariant::Single);
    }

    #[test]
    fn test_parse_catalog_rejects_missing_file() {
        let err = parse_catalog(r#"[{"name": "Rak", "file": "", "type": "rack"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile { ref name } if name == "Rak"));

        let err = parse_catalog(r#"[{"name": " ", "file": "a.glb"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName { index: 0 }));
    }

    #[test]
    fn test_selection_round_trip() {
        let entry = CatalogEntry::new("Rak Besi", "./models/rak.glb", "rack");
        let json = entry.to_storage_json().unwrap();
        let restored = CatalogEntry::from_storage_json(Some(&json)).unwrap();
        assert_eq!(restored, entry);
    }

    #[test]
    fn test_selection_fallback() {
        let entry = CatalogEntry::from_storage_json(None).unwrap();
        assert_eq!(entry.file, DEFAULT_MODEL_PATH);
        assert_eq!(entry.variant(), ProductVariant::Single);
    }

    #[test]
    fn test_entry_snapshot() {
        let mut entry = CatalogEntry::new("Rak Besi", "./models/rak.glb", "rack");
        entry.thumbnail = Some("./thumbs/rak.png".to_string());
        insta::assert_json_snapshot!(entry, @r###"
        {
          "name": "Rak Besi",
          "thumbnail": "./thumbs/rak.png",
          "file": "./models/rak.glb",
          "type": "rack"
        }
        "###);
    }
}
