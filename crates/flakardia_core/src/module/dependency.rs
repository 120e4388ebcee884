//! Known module dependencies of the desktop application.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// One module the application descriptor may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleDependency {
    JavaBase,
    JavaDesktop,
    JavaPrefs,
    KotlinStdlib,
    DarklafCore,
    KotlinxCoroutinesCore,
    KotlinxSerializationCore,
    KotlinxSerializationJson,
    Jortho,
    JetbrainsAnnotations,
    ApacheCommonsText,
}

impl ModuleDependency {
    /// Every known dependency, in declaration order.
    pub const ALL: [ModuleDependency; 11] = [
        Self::JavaBase,
        Self::JavaDesktop,
        Self::JavaPrefs,
        Self::KotlinStdlib,
        Self::DarklafCore,
        Self::KotlinxCoroutinesCore,
        Self::KotlinxSerializationCore,
        Self::KotlinxSerializationJson,
        Self::Jortho,
        Self::JetbrainsAnnotations,
        Self::ApacheCommonsText,
    ];

    /// Module name as written in a descriptor `requires` clause.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JavaBase => "java.base",
            Self::JavaDesktop => "java.desktop",
            Self::JavaPrefs => "java.prefs",
            Self::KotlinStdlib => "kotlin.stdlib",
            Self::DarklafCore => "darklaf.core",
            Self::KotlinxCoroutinesCore => "kotlinx.coroutines.core",
            Self::KotlinxSerializationCore => "kotlinx.serialization.core",
            Self::KotlinxSerializationJson => "kotlinx.serialization.json",
            Self::Jortho => "jortho",
            Self::JetbrainsAnnotations => "org.jetbrains.annotations",
            Self::ApacheCommonsText => "org.apache.commons.text",
        }
    }

    /// Short description of what the module provides.
    pub fn description(self) -> &'static str {
        match self {
            Self::JavaBase => "Platform base classes.",
            Self::JavaDesktop => "Platform desktop windowing toolkit.",
            Self::JavaPrefs => "Per-user preferences storage API.",
            Self::KotlinStdlib => "Language standard library.",
            Self::DarklafCore => "GUI look-and-feel theming library.",
            Self::KotlinxCoroutinesCore => "Coroutine runtime.",
            Self::KotlinxSerializationCore => "Serialization core.",
            Self::KotlinxSerializationJson => "JSON serialization extension.",
            Self::Jortho => "Spellchecking library.",
            Self::JetbrainsAnnotations => "Nullability and contract annotations.",
            Self::ApacheCommonsText => "Text-processing utility library.",
        }
    }
}

impl Display for ModuleDependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one dependency from its descriptor module name.
///
/// Matching is exact: `Java.Base` is not `java.base`.
pub fn parse_module_dependency(value: &str) -> Result<ModuleDependency, DependencyParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(DependencyParseError::EmptyName);
    }

    ModuleDependency::ALL
        .into_iter()
        .find(|dependency| dependency.as_str() == normalized)
        .ok_or_else(|| DependencyParseError::UnknownModule(normalized.to_string()))
}

/// Dependency name parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyParseError {
    EmptyName,
    UnknownModule(String),
}

impl Display for DependencyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "module name must not be empty"),
            Self::UnknownModule(value) => write!(f, "unknown module: {value}"),
        }
    }
}

impl Error for DependencyParseError {}
