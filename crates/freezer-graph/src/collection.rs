//! Import/export extraction.
//!
//! Parsers turn module text into a [`ParsedModule`]: the static imports and
//! the exports in source order. Nothing here touches the graph.

use std::fmt;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ImportDeclarationSpecifier, ModuleDeclaration,
    ModuleExportName,
};
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde_json::Value;

use crate::error::ParseError;
use crate::export::ExportEntry;
use crate::module_id::ModuleId;

/// What a single import statement binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedBinding {
    /// `import './x.js'`
    SideEffect,
    /// `import { imported as local } from './x.js'`
    Named { imported: String, local: String },
    /// `import local from './x.js'`
    Default { local: String },
    /// `import * as local from './x.js'`
    Namespace { local: String },
}

/// One binding of a static import, with the specifier it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedImport {
    pub specifier: String,
    pub binding: ImportedBinding,
}

/// One export declaration, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectedExport {
    /// Binding defined by the module itself (`default` for default exports).
    Local { exported: String, local: String },
    /// `export { imported as exported } from 'specifier'`
    ReExport {
        specifier: String,
        imported: String,
        exported: String,
    },
    /// `export * from 'specifier'`
    Star { specifier: String },
    /// `export * as exported from 'specifier'`
    Namespace { specifier: String, exported: String },
}

impl CollectedExport {
    /// Specifier of a re-export, `None` for local exports.
    pub fn specifier(&self) -> Option<&str> {
        match self {
            CollectedExport::Local { .. } => None,
            CollectedExport::ReExport { specifier, .. }
            | CollectedExport::Star { specifier }
            | CollectedExport::Namespace { specifier, .. } => Some(specifier),
        }
    }

    pub fn is_reexport(&self) -> bool {
        self.specifier().is_some()
    }

    pub fn to_entry(&self) -> ExportEntry {
        match self {
            CollectedExport::Local { exported, local } if exported == "default" => {
                let mut entry = ExportEntry::default_export();
                entry.local = Some(local.clone());
                entry
            }
            CollectedExport::Local { exported, local } => ExportEntry::named(exported, local),
            CollectedExport::ReExport {
                specifier,
                imported,
                exported,
            } => ExportEntry::re_export(exported, imported, specifier),
            CollectedExport::Star { specifier } => ExportEntry::star(specifier),
            CollectedExport::Namespace {
                specifier,
                exported,
            } => ExportEntry::namespace(exported, specifier),
        }
    }
}

/// Result of parsing one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModule {
    pub imports: Vec<CollectedImport>,
    pub exports: Vec<CollectedExport>,
}

impl ParsedModule {
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        self.exports.iter().map(CollectedExport::to_entry).collect()
    }
}

/// Turns source text into imports and exports.
pub trait ModuleParser: Send + Sync + fmt::Debug {
    fn parse(&self, id: &ModuleId, source: &str) -> Result<ParsedModule, ParseError>;
}

/// ECMAScript module parser on the oxc stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcParser;

impl ModuleParser for OxcParser {
    fn parse(&self, id: &ModuleId, source: &str) -> Result<ParsedModule, ParseError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();

        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .first()
                .map(|error| error.to_string())
                .unwrap_or_else(|| "parser aborted".to_string());
            return Err(ParseError::Syntax {
                id: id.clone(),
                message,
            });
        }

        let mut parsed = ParsedModule::default();

        for stmt in ret.program.body.iter() {
            let Some(module_decl) = stmt.as_module_declaration() else {
                continue;
            };

            match module_decl {
                ModuleDeclaration::ImportDeclaration(import) => {
                    if import.import_kind.is_type() {
                        continue;
                    }
                    let specifier = import.source.value.to_string();
                    let specs = import.specifiers.as_ref().filter(|specs| !specs.is_empty());
                    let Some(specs) = specs else {
                        parsed.imports.push(CollectedImport {
                            specifier,
                            binding: ImportedBinding::SideEffect,
                        });
                        continue;
                    };

                    for spec in specs {
                        let binding = match spec {
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(default_spec) => {
                                ImportedBinding::Default {
                                    local: default_spec.local.name.to_string(),
                                }
                            }
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(ns_spec) => {
                                ImportedBinding::Namespace {
                                    local: ns_spec.local.name.to_string(),
                                }
                            }
                            ImportDeclarationSpecifier::ImportSpecifier(named_spec) => {
                                if named_spec.import_kind.is_type() {
                                    continue;
                                }
                                ImportedBinding::Named {
                                    imported: export_name(&named_spec.imported),
                                    local: named_spec.local.name.to_string(),
                                }
                            }
                        };
                        parsed.imports.push(CollectedImport {
                            specifier: specifier.clone(),
                            binding,
                        });
                    }
                }
                ModuleDeclaration::ExportDefaultDeclaration(_) => {
                    parsed.exports.push(CollectedExport::Local {
                        exported: "default".to_string(),
                        local: "default".to_string(),
                    });
                }
                ModuleDeclaration::ExportNamedDeclaration(named) => {
                    if named.export_kind.is_type() {
                        continue;
                    }
                    if let Some(src) = &named.source {
                        for spec in &named.specifiers {
                            parsed.exports.push(CollectedExport::ReExport {
                                specifier: src.value.to_string(),
                                imported: export_name(&spec.local),
                                exported: export_name(&spec.exported),
                            });
                        }
                    } else if let Some(decl) = &named.declaration {
                        for name in declared_names(decl) {
                            parsed.exports.push(CollectedExport::Local {
                                exported: name.clone(),
                                local: name,
                            });
                        }
                    } else {
                        for spec in &named.specifiers {
                            parsed.exports.push(CollectedExport::Local {
                                exported: export_name(&spec.exported),
                                local: export_name(&spec.local),
                            });
                        }
                    }
                }
                ModuleDeclaration::ExportAllDeclaration(all) => {
                    if all.export_kind.is_type() {
                        continue;
                    }
                    let specifier = all.source.value.to_string();
                    match &all.exported {
                        Some(exported) => parsed.exports.push(CollectedExport::Namespace {
                            specifier,
                            exported: export_name(exported),
                        }),
                        None => parsed.exports.push(CollectedExport::Star { specifier }),
                    }
                }
                _ => {}
            }
        }

        Ok(parsed)
    }
}

fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn declared_names(decl: &Declaration<'_>) -> Vec<String> {
    match decl {
        Declaration::VariableDeclaration(var) => {
            let mut names = Vec::new();
            for declarator in &var.declarations {
                bound_names(&declarator.id, &mut names);
            }
            names
        }
        Declaration::FunctionDeclaration(func) => {
            func.id.iter().map(|id| id.name.to_string()).collect()
        }
        Declaration::ClassDeclaration(class) => {
            class.id.iter().map(|id| id.name.to_string()).collect()
        }
        _ => Vec::new(),
    }
}

/// Every identifier bound by `pattern`, destructuring included.
fn bound_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                bound_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                bound_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                bound_names(element, names);
            }
            if let Some(rest) = &array.rest {
                bound_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => bound_names(&assignment.left, names),
    }
}

/// Parser for JSON modules: no imports; `default` plus every top-level key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ModuleParser for JsonParser {
    fn parse(&self, id: &ModuleId, source: &str) -> Result<ParsedModule, ParseError> {
        let value: Value = serde_json::from_str(source).map_err(|source| ParseError::Json {
            id: id.clone(),
            source,
        })?;

        let exports = json_exports(&value)
            .into_iter()
            .map(|name| CollectedExport::Local {
                local: name.clone(),
                exported: name,
            })
            .collect();

        Ok(ParsedModule {
            imports: Vec::new(),
            exports,
        })
    }
}

/// Export names of a JSON document.
pub fn json_exports(value: &Value) -> Vec<String> {
    let mut names = vec!["default".to_string()];
    if let Value::Object(map) = value {
        names.extend(map.keys().filter(|key| *key != "default").cloned());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedModule {
        OxcParser
            .parse(&ModuleId::standalone("test.js"), source)
            .unwrap()
    }

    #[test]
    fn collects_import_bindings() {
        let parsed = parse(
            r#"
            import './side-effect.js';
            import def, { a, b as c } from './named.js';
            import * as ns from 'lively.lang';
            "#,
        );

        assert_eq!(
            parsed.imports,
            vec![
                CollectedImport {
                    specifier: "./side-effect.js".into(),
                    binding: ImportedBinding::SideEffect,
                },
                CollectedImport {
                    specifier: "./named.js".into(),
                    binding: ImportedBinding::Default { local: "def".into() },
                },
                CollectedImport {
                    specifier: "./named.js".into(),
                    binding: ImportedBinding::Named { imported: "a".into(), local: "a".into() },
                },
                CollectedImport {
                    specifier: "./named.js".into(),
                    binding: ImportedBinding::Named { imported: "b".into(), local: "c".into() },
                },
                CollectedImport {
                    specifier: "lively.lang".into(),
                    binding: ImportedBinding::Namespace { local: "ns".into() },
                },
            ]
        );
    }

    #[test]
    fn collects_exports_and_reexports() {
        let parsed = parse(
            r#"
            export const x = 1, y = 2;
            export function f() {}
            export class K {}
            const z = 3;
            export { z as zed };
            export default f;
            export { name, other as alias } from './a.js';
            export * from './b.js';
            export * as ns from './c.js';
            "#,
        );

        assert_eq!(
            parsed.exports,
            vec![
                CollectedExport::Local { exported: "x".into(), local: "x".into() },
                CollectedExport::Local { exported: "y".into(), local: "y".into() },
                CollectedExport::Local { exported: "f".into(), local: "f".into() },
                CollectedExport::Local { exported: "K".into(), local: "K".into() },
                CollectedExport::Local { exported: "zed".into(), local: "z".into() },
                CollectedExport::Local { exported: "default".into(), local: "default".into() },
                CollectedExport::ReExport {
                    specifier: "./a.js".into(),
                    imported: "name".into(),
                    exported: "name".into(),
                },
                CollectedExport::ReExport {
                    specifier: "./a.js".into(),
                    imported: "other".into(),
                    exported: "alias".into(),
                },
                CollectedExport::Star { specifier: "./b.js".into() },
                CollectedExport::Namespace { specifier: "./c.js".into(), exported: "ns".into() },
            ]
        );
        assert!(parsed.exports[6].is_reexport());
        assert!(!parsed.exports[0].is_reexport());
    }

    #[test]
    fn collects_destructured_exports() {
        let parsed = parse(
            r#"
            const o = { a: 1, b: 2, c: { d: 4 } };
            export const { a, b: bee, c: { d }, ...others } = o;
            export let [first, , third = 3, ...tail] = [1, 2];
            "#,
        );

        let names: Vec<_> = parsed
            .export_entries()
            .into_iter()
            .map(|export| export.exported)
            .collect();
        assert_eq!(names, vec!["a", "bee", "d", "others", "first", "third", "tail"]);
    }

    #[test]
    fn ignores_dynamic_imports() {
        let parsed = parse("const m = import('./lazy.js'); export { m };");
        assert!(parsed.imports.is_empty());
        assert_eq!(parsed.exports.len(), 1);
    }

    #[test]
    fn syntax_errors_are_reported() {
        let result = OxcParser.parse(&ModuleId::standalone("bad.js"), "export const = ;");
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn json_exports_default_and_keys() {
        let parsed = JsonParser
            .parse(&ModuleId::standalone("data.json"), r#"{"name": "x", "version": 1}"#)
            .unwrap();
        let names: Vec<_> = parsed.export_entries().into_iter().map(|e| e.exported).collect();
        assert_eq!(names, vec!["default", "name", "version"]);

        let parsed = JsonParser.parse(&ModuleId::standalone("list.json"), "[1, 2]").unwrap();
        assert_eq!(parsed.exports.len(), 1);

        let err = JsonParser.parse(&ModuleId::standalone("bad.json"), "{").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }
}
