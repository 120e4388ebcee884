//! Startup module resolution and package visibility.

use crate::module::dependency::ModuleDependency;
use crate::module::descriptor::{DescriptorValidationError, ModuleDescriptor};
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Where a resolved module came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSource {
    /// Provided by the runtime environment; never validated against requirements.
    Provided,
    /// Resolved from a descriptor after all its requirements were found.
    Resolved,
}

/// Module snapshot held by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub descriptor: ModuleDescriptor,
    pub source: ModuleSource,
}

/// In-process module graph, built once at startup.
#[derive(Debug, Default)]
pub struct ModuleResolver {
    modules: BTreeMap<String, ResolvedModule>,
    export_index: BTreeMap<String, String>,
}

impl ModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver where every known dependency module is available.
    pub fn with_known_dependencies() -> Self {
        let mut resolver = Self::new();
        for dependency in ModuleDependency::ALL {
            resolver.provide(dependency.as_str());
        }
        resolver
    }

    /// Makes a leaf module available without a full descriptor.
    ///
    /// Providing an already present module is a no-op.
    pub fn provide(&mut self, name: &str) {
        let name = name.trim();
        self.modules
            .entry(name.to_string())
            .or_insert_with(|| ResolvedModule {
                descriptor: ModuleDescriptor::new(name),
                source: ModuleSource::Provided,
            });
    }

    /// Resolves one descriptor against the modules available so far.
    ///
    /// # Errors
    /// - `InvalidDescriptor` when declaration invariants fail.
    /// - `DuplicateModule` when a module with the same name is present.
    /// - `UnresolvedDependency` for the first missing requirement, in
    ///   declaration order.
    /// - `DuplicateExport` when another module already exports a package.
    pub fn resolve(&mut self, descriptor: &ModuleDescriptor) -> Result<(), ResolutionError> {
        let result = self.try_resolve(descriptor);
        match &result {
            Ok(()) => info!(
                "event=module_resolve module=resolver status=ok name={} requires={} exports={}",
                descriptor.name,
                descriptor.requires.len(),
                descriptor.exports.len()
            ),
            Err(err) => error!(
                "event=module_resolve module=resolver status=error name={} error={}",
                descriptor.name, err
            ),
        }
        result
    }

    fn try_resolve(&mut self, descriptor: &ModuleDescriptor) -> Result<(), ResolutionError> {
        descriptor
            .validate()
            .map_err(ResolutionError::InvalidDescriptor)?;
        let name = descriptor.name.trim().to_string();
        if self.modules.contains_key(name.as_str()) {
            return Err(ResolutionError::DuplicateModule(name));
        }

        for required in descriptor.requires.iter().map(|module| module.trim()) {
            if !self.modules.contains_key(required) {
                return Err(ResolutionError::UnresolvedDependency {
                    module: name,
                    dependency: required.to_string(),
                });
            }
        }

        for package in descriptor.exports_set() {
            if let Some(exporter) = self.export_index.get(package) {
                return Err(ResolutionError::DuplicateExport {
                    package: package.to_string(),
                    exporter: exporter.clone(),
                });
            }
        }

        for package in descriptor.exports_set() {
            self.export_index.insert(package.to_string(), name.clone());
        }
        self.modules.insert(
            name,
            ResolvedModule {
                descriptor: descriptor.clone(),
                source: ModuleSource::Resolved,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedModule> {
        self.modules.get(name)
    }

    /// Returns the name of the module exporting `package`.
    pub fn exporter_of(&self, package: &str) -> Option<&str> {
        self.export_index.get(package).map(String::as_str)
    }

    /// Whether `consumer` can see the public types of `package`.
    ///
    /// A package is visible to its exporting module and to every resolved
    /// module that requires the exporter.
    pub fn is_package_visible(&self, consumer: &str, package: &str) -> bool {
        let Some(exporter) = self.exporter_of(package) else {
            return false;
        };
        if consumer == exporter {
            return true;
        }
        self.modules
            .get(consumer)
            .is_some_and(|module| module.descriptor.requires_module(exporter))
    }
}

/// Startup resolution failures. All of them are fatal to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    InvalidDescriptor(DescriptorValidationError),
    DuplicateModule(String),
    UnresolvedDependency { module: String, dependency: String },
    DuplicateExport { package: String, exporter: String },
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDescriptor(err) => write!(f, "invalid module descriptor: {err}"),
            Self::DuplicateModule(name) => write!(f, "module already resolved: {name}"),
            Self::UnresolvedDependency { module, dependency } => {
                write!(f, "module {module} requires {dependency}, which is not available")
            }
            Self::DuplicateExport { package, exporter } => {
                write!(f, "package {package} is already exported by {exporter}")
            }
        }
    }
}

impl Error for ResolutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDescriptor(err) => Some(err),
            _ => None,
        }
    }
}
