//! Module descriptor declaration, validation and revision history.
//!
//! # Responsibility
//! - Describe the application module: its name, required modules and
//!   exported packages.
//! - Keep the three published descriptor revisions reproducible.
//!
//! # Invariants
//! - Every revision is named `flakardia`.
//! - Every revision exports exactly the `storage` package.

use crate::module::dependency::ModuleDependency;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the application module.
pub const FLAKARDIA_MODULE_NAME: &str = "flakardia";
/// The one package the application module exports.
pub const STORAGE_PACKAGE: &str = "name.tachenov.flakardia.storage";

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("qualified name pattern is valid")
});

static MODULE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)*$").expect("module name pattern is valid")
});

/// Static declaration of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Module name, e.g. `flakardia`.
    pub name: String,
    /// Names of modules that must be resolvable at startup.
    pub requires: Vec<String>,
    /// Packages visible to modules that require this one.
    pub exports: Vec<String>,
}

impl ModuleDescriptor {
    /// Creates a descriptor with no requirements or exports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            exports: Vec::new(),
        }
    }

    pub fn requiring(mut self, module: impl Into<String>) -> Self {
        self.requires.push(module.into());
        self
    }

    pub fn exporting(mut self, package: impl Into<String>) -> Self {
        self.exports.push(package.into());
        self
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), DescriptorValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DescriptorValidationError::EmptyName);
        }
        if !MODULE_NAME.is_match(name) {
            return Err(DescriptorValidationError::InvalidName(self.name.clone()));
        }

        let mut seen = BTreeSet::new();
        for module in &self.requires {
            let normalized = module.trim();
            if normalized.is_empty() {
                return Err(DescriptorValidationError::EmptyRequirement);
            }
            if !QUALIFIED_NAME.is_match(normalized) {
                return Err(DescriptorValidationError::InvalidRequirement(
                    normalized.to_string(),
                ));
            }
            if normalized == name {
                return Err(DescriptorValidationError::SelfRequirement(name.to_string()));
            }
            if !seen.insert(normalized) {
                return Err(DescriptorValidationError::DuplicateRequirement(
                    normalized.to_string(),
                ));
            }
        }

        let mut seen = BTreeSet::new();
        for package in &self.exports {
            let normalized = package.trim();
            if normalized.is_empty() {
                return Err(DescriptorValidationError::EmptyExport);
            }
            if !QUALIFIED_NAME.is_match(normalized) {
                return Err(DescriptorValidationError::InvalidExport(
                    normalized.to_string(),
                ));
            }
            if !seen.insert(normalized) {
                return Err(DescriptorValidationError::DuplicateExport(
                    normalized.to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn requires_set(&self) -> BTreeSet<&str> {
        self.requires.iter().map(|module| module.trim()).collect()
    }

    pub fn exports_set(&self) -> BTreeSet<&str> {
        self.exports.iter().map(|package| package.trim()).collect()
    }

    pub fn requires_module(&self, module: &str) -> bool {
        self.requires.iter().any(|required| required.trim() == module)
    }

    /// Renders the descriptor in module-declaration source form.
    pub fn to_declaration(&self) -> String {
        let mut out = format!("module {} {{\n", self.name);
        for module in &self.requires {
            out.push_str(&format!("    requires {module};\n"));
        }
        for package in &self.exports {
            out.push_str(&format!("    exports {package};\n"));
        }
        out.push('}');
        out
    }
}

/// Published revisions of the application descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DescriptorRevision {
    R1,
    R2,
    R3,
}

impl DescriptorRevision {
    pub const ALL: [DescriptorRevision; 3] = [Self::R1, Self::R2, Self::R3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
        }
    }

    /// The most recent revision.
    pub fn latest() -> Self {
        Self::R3
    }

    /// Modules required by this revision, in declaration order.
    pub fn requirements(self) -> Vec<ModuleDependency> {
        use ModuleDependency::*;

        let mut base = vec![
            JavaBase,
            JavaDesktop,
            JavaPrefs,
            KotlinStdlib,
            DarklafCore,
            KotlinxCoroutinesCore,
            KotlinxSerializationCore,
            KotlinxSerializationJson,
            Jortho,
        ];
        if self == Self::R1 {
            return base;
        }

        base.retain(|dependency| !matches!(dependency, JavaBase | JavaDesktop));
        base.push(JetbrainsAnnotations);
        if self == Self::R3 {
            base.push(ApacheCommonsText);
        }
        base
    }
}

impl Display for DescriptorRevision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `r1|r2|r3` (case-insensitive).
pub fn parse_descriptor_revision(value: &str) -> Result<DescriptorRevision, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "r1" | "1" => Ok(DescriptorRevision::R1),
        "r2" | "2" => Ok(DescriptorRevision::R2),
        "r3" | "3" => Ok(DescriptorRevision::R3),
        other => Err(format!("unknown descriptor revision `{other}`; expected r1|r2|r3")),
    }
}

/// Returns the application descriptor as published in `revision`.
pub fn flakardia_descriptor(revision: DescriptorRevision) -> ModuleDescriptor {
    revision
        .requirements()
        .into_iter()
        .fold(ModuleDescriptor::new(FLAKARDIA_MODULE_NAME), |descriptor, dependency| {
            descriptor.requiring(dependency.as_str())
        })
        .exporting(STORAGE_PACKAGE)
}

/// Requirement changes between two descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl DescriptorDiff {
    pub fn between(from: &ModuleDescriptor, to: &ModuleDescriptor) -> Self {
        let before = from.requires_set();
        let after = to.requires_set();
        Self {
            added: after.difference(&before).map(|m| m.to_string()).collect(),
            removed: before.difference(&after).map(|m| m.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Descriptor validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValidationError {
    EmptyName,
    InvalidName(String),
    EmptyRequirement,
    InvalidRequirement(String),
    SelfRequirement(String),
    DuplicateRequirement(String),
    EmptyExport,
    InvalidExport(String),
    DuplicateExport(String),
}

impl Display for DescriptorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "module name must not be empty"),
            Self::InvalidName(value) => write!(f, "module name is invalid: {value}"),
            Self::EmptyRequirement => write!(f, "descriptor contains empty requires clause"),
            Self::InvalidRequirement(value) => {
                write!(f, "required module name is invalid: {value}")
            }
            Self::SelfRequirement(value) => write!(f, "module must not require itself: {value}"),
            Self::DuplicateRequirement(value) => {
                write!(f, "required module is duplicated: {value}")
            }
            Self::EmptyExport => write!(f, "descriptor contains empty exports clause"),
            Self::InvalidExport(value) => write!(f, "exported package name is invalid: {value}"),
            Self::DuplicateExport(value) => write!(f, "exported package is duplicated: {value}"),
        }
    }
}

impl Error for DescriptorValidationError {}

#[cfg(test)]
mod tests {
    use super::{
        flakardia_descriptor, parse_descriptor_revision, DescriptorDiff, DescriptorRevision,
        DescriptorValidationError, ModuleDescriptor, FLAKARDIA_MODULE_NAME, STORAGE_PACKAGE,
    };
    use std::collections::BTreeSet;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn every_revision_is_valid_and_named_flakardia() {
        for revision in DescriptorRevision::ALL {
            let descriptor = flakardia_descriptor(revision);
            descriptor.validate().expect("published descriptor is valid");
            assert_eq!(descriptor.name, FLAKARDIA_MODULE_NAME);
        }
    }

    #[test]
    fn every_revision_exports_only_storage() {
        for revision in DescriptorRevision::ALL {
            let descriptor = flakardia_descriptor(revision);
            assert_eq!(descriptor.exports_set(), BTreeSet::from([STORAGE_PACKAGE]));
        }
    }

    #[test]
    fn first_revision_requires_platform_and_library_modules() {
        let descriptor = flakardia_descriptor(DescriptorRevision::R1);
        let expected = BTreeSet::from([
            "java.base",
            "java.desktop",
            "java.prefs",
            "kotlin.stdlib",
            "darklaf.core",
            "kotlinx.coroutines.core",
            "kotlinx.serialization.core",
            "kotlinx.serialization.json",
            "jortho",
        ]);
        assert_eq!(descriptor.requires_set(), expected);
    }

    #[test]
    fn second_revision_swaps_platform_modules_for_annotations() {
        let diff = DescriptorDiff::between(
            &flakardia_descriptor(DescriptorRevision::R1),
            &flakardia_descriptor(DescriptorRevision::R2),
        );
        assert_eq!(diff.added, set(&["org.jetbrains.annotations"]));
        assert_eq!(diff.removed, set(&["java.base", "java.desktop"]));
    }

    #[test]
    fn third_revision_only_adds_text_utilities() {
        let diff = DescriptorDiff::between(
            &flakardia_descriptor(DescriptorRevision::R2),
            &flakardia_descriptor(DescriptorRevision::R3),
        );
        assert_eq!(diff.added, set(&["org.apache.commons.text"]));
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn diff_of_identical_descriptors_is_empty() {
        let descriptor = flakardia_descriptor(DescriptorRevision::R3);
        assert!(DescriptorDiff::between(&descriptor, &descriptor).is_empty());
    }

    #[test]
    fn rejects_duplicate_requirement() {
        let descriptor = ModuleDescriptor::new("app")
            .requiring("jortho")
            .requiring(" jortho");
        assert_eq!(
            descriptor.validate().unwrap_err(),
            DescriptorValidationError::DuplicateRequirement("jortho".to_string())
        );
    }

    #[test]
    fn rejects_duplicate_export() {
        let descriptor = ModuleDescriptor::new("app")
            .exporting("app.storage")
            .exporting("app.storage");
        assert_eq!(
            descriptor.validate().unwrap_err(),
            DescriptorValidationError::DuplicateExport("app.storage".to_string())
        );
    }

    #[test]
    fn rejects_malformed_names() {
        let err = ModuleDescriptor::new("my app").validate().unwrap_err();
        assert!(matches!(err, DescriptorValidationError::InvalidName(_)));

        let err = ModuleDescriptor::new("Flakardia.App").validate().unwrap_err();
        assert_eq!(
            err,
            DescriptorValidationError::InvalidName("Flakardia.App".to_string())
        );
        let err = ModuleDescriptor::new("app$core").validate().unwrap_err();
        assert!(matches!(err, DescriptorValidationError::InvalidName(_)));

        let err = ModuleDescriptor::new("app")
            .requiring("kotlinx..core")
            .validate()
            .unwrap_err();
        assert!(matches!(err, DescriptorValidationError::InvalidRequirement(_)));

        let err = ModuleDescriptor::new("app")
            .exporting("")
            .validate()
            .unwrap_err();
        assert_eq!(err, DescriptorValidationError::EmptyExport);
    }

    #[test]
    fn rejects_self_requirement() {
        let err = ModuleDescriptor::new("app")
            .requiring("app")
            .validate()
            .unwrap_err();
        assert_eq!(err, DescriptorValidationError::SelfRequirement("app".to_string()));
    }

    #[test]
    fn renders_declaration_source() {
        let source = flakardia_descriptor(DescriptorRevision::R1).to_declaration();
        assert!(source.starts_with("module flakardia {\n"));
        assert!(source.contains("    requires java.base;\n"));
        assert!(source.contains("    exports name.tachenov.flakardia.storage;\n"));
        assert!(source.ends_with('}'));
    }

    #[test]
    fn parses_revision_names() {
        assert_eq!(parse_descriptor_revision("R2"), Ok(DescriptorRevision::R2));
        assert_eq!(parse_descriptor_revision("3"), Ok(DescriptorRevision::R3));
        assert!(parse_descriptor_revision("r4").is_err());
    }
}
