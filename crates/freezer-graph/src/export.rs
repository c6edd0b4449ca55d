use serde::{Deserialize, Serialize};

/// Export declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    /// `export const x`, `export { a as b }`
    Named,
    Default,
    /// `export { x as y } from './module'`
    ReExport,
    /// Star re-export: `export * from './module'`
    ///
    /// Carries every non-default binding of the source module that the
    /// re-exporting module doesn't define itself.
    StarReExport,
    /// `export * as ns from './module'`
    NamespaceReExport,
}

/// One binding a module exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Outward name; `*` for star re-exports.
    pub exported: String,
    /// Local binding, or the imported name for re-exports.
    pub local: Option<String>,
    pub kind: ExportKind,
    /// Specifier the binding is re-exported from.
    pub from: Option<String>,
}

impl ExportEntry {
    pub fn named(exported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            exported: exported.into(),
            local: Some(local.into()),
            kind: ExportKind::Named,
            from: None,
        }
    }

    pub fn default_export() -> Self {
        Self {
            exported: "default".to_string(),
            local: Some("default".to_string()),
            kind: ExportKind::Default,
            from: None,
        }
    }

    pub fn re_export(
        exported: impl Into<String>,
        imported: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            exported: exported.into(),
            local: Some(imported.into()),
            kind: ExportKind::ReExport,
            from: Some(from.into()),
        }
    }

    pub fn star(from: impl Into<String>) -> Self {
        Self {
            exported: "*".to_string(),
            local: None,
            kind: ExportKind::StarReExport,
            from: Some(from.into()),
        }
    }

    pub fn namespace(exported: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            exported: exported.into(),
            local: None,
            kind: ExportKind::NamespaceReExport,
            from: Some(from.into()),
        }
    }

    pub fn is_reexport(&self) -> bool {
        self.from.is_some()
    }

    /// Whether the module itself defines this binding.
    pub fn is_local(&self) -> bool {
        matches!(self.kind, ExportKind::Named | ExportKind::Default)
    }
}
