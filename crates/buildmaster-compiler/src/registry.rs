//! Project registry with lazy, memoized, cycle-safe resolution.

use std::collections::HashMap;
use std::sync::Arc;

use buildmaster_core::{CompileError, ProjectConfig, Result};
use tracing::{debug, warn};

use crate::project::Project;

/// Assembles one project. May call back into the registry to resolve the
/// projects it depends on.
pub trait ProjectAssembler {
    fn assemble(&self, config: &ProjectConfig, registry: &mut ProjectRegistry) -> Result<Project>;
}

/// Resolution state of a registered project.
#[derive(Debug, Clone)]
pub enum Resolution {
    Unresolved,
    /// Assembly is on the call stack; reaching it again is a cycle.
    InProgress,
    Resolved(Arc<Project>),
}

#[derive(Debug)]
struct Entry {
    config: Arc<ProjectConfig>,
    state: Resolution,
}

/// Maps project names to their configuration and resolution state.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    entries: HashMap<String, Entry>,
    /// Declaration order.
    order: Vec<String>,
    /// Order in which projects finished resolving.
    resolved: Vec<String>,
    /// Projects currently being assembled, outermost first.
    stack: Vec<String>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configurations in declaration order.
    pub fn from_configs(configs: impl IntoIterator<Item = ProjectConfig>) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(config)?;
        }
        Ok(registry)
    }

    /// Register a project. Names must be unique.
    pub fn register(&mut self, config: ProjectConfig) -> Result<()> {
        if self.entries.contains_key(&config.name) {
            return Err(CompileError::InvalidConfig(format!(
                "duplicate project: {}",
                config.name
            )));
        }
        self.order.push(config.name.clone());
        self.entries.insert(
            config.name.clone(),
            Entry {
                config: Arc::new(config),
                state: Resolution::Unresolved,
            },
        );
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Project names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn config(&self, name: &str) -> Option<&ProjectConfig> {
        self.entries.get(name).map(|e| e.config.as_ref())
    }

    pub fn state(&self, name: &str) -> Option<&Resolution> {
        self.entries.get(name).map(|e| &e.state)
    }

    /// Resolved projects in the order they finished resolving.
    pub fn resolved(&self) -> impl Iterator<Item = &Arc<Project>> {
        self.resolved
            .iter()
            .filter_map(|name| match self.entries.get(name).map(|e| &e.state) {
                Some(Resolution::Resolved(project)) => Some(project),
                _ => None,
            })
    }

    /// Resolve `name`, assembling it on first use.
    ///
    /// Resolved projects are returned from the cache. Reaching a project
    /// whose assembly is still in progress fails with
    /// [`CompileError::DependencyCycle`]. A failed assembly leaves the
    /// project unresolved.
    pub fn resolve<A>(&mut self, name: &str, assembler: &A) -> Result<Arc<Project>>
    where
        A: ProjectAssembler + ?Sized,
    {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| CompileError::UnknownDependency(name.to_string()))?;

        let config = match &entry.state {
            Resolution::Resolved(project) => return Ok(project.clone()),
            Resolution::InProgress => {
                let start = self.stack.iter().position(|n| n == name).unwrap_or(0);
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(name.to_string());
                warn!(project = %name, cycle = ?cycle, "Dependency loop detected");
                return Err(CompileError::DependencyCycle(cycle));
            }
            Resolution::Unresolved => entry.config.clone(),
        };
        entry.state = Resolution::InProgress;

        debug!(project = %name, "Resolving project");
        self.stack.push(name.to_string());
        let result = assembler.assemble(&config, self).map(Arc::new);
        self.stack.pop();

        if let Some(entry) = self.entries.get_mut(name) {
            entry.state = match &result {
                Ok(project) => Resolution::Resolved(project.clone()),
                Err(_) => Resolution::Unresolved,
            };
        }
        if result.is_ok() {
            self.resolved.push(name.to_string());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Resolves each project's dependent-scheduler parent and counts
    /// assemblies per project.
    #[derive(Default)]
    struct CountingAssembler {
        calls: RefCell<HashMap<String, usize>>,
    }

    impl CountingAssembler {
        fn calls(&self, name: &str) -> usize {
            self.calls.borrow().get(name).copied().unwrap_or(0)
        }
    }

    impl ProjectAssembler for CountingAssembler {
        fn assemble(
            &self,
            config: &ProjectConfig,
            registry: &mut ProjectRegistry,
        ) -> Result<Project> {
            *self.calls.borrow_mut().entry(config.name.clone()).or_default() += 1;
            if let Some(parent) = &config.schedule.dependent {
                registry.resolve(parent, self)?;
            }
            Ok(Project {
                name: config.name.clone(),
                schedulers: vec![],
                builders: vec![],
                notifier: None,
            })
        }
    }

    fn project(name: &str, parent: Option<&str>) -> ProjectConfig {
        let mut builder = ProjectConfig::builder(name);
        if let Some(parent) = parent {
            builder = builder.with_dependent(parent);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_resolve_is_memoized() {
        let mut registry = ProjectRegistry::from_configs([project("a", None)]).unwrap();
        let assembler = CountingAssembler::default();

        let first = registry.resolve("a", &assembler).unwrap();
        let second = registry.resolve("a", &assembler).unwrap();

        assert_eq!(assembler.calls("a"), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_shared_parent_assembled_once() {
        let mut registry = ProjectRegistry::from_configs([
            project("app", Some("lib")),
            project("tool", Some("lib")),
            project("lib", None),
        ])
        .unwrap();
        let assembler = CountingAssembler::default();

        for name in ["app", "tool", "lib"] {
            registry.resolve(name, &assembler).unwrap();
        }

        assert_eq!(assembler.calls("lib"), 1);
        let order: Vec<&str> = registry.resolved().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["lib", "app", "tool"]);
    }

    #[test]
    fn test_unknown_project() {
        let mut registry = ProjectRegistry::new();
        let err = registry
            .resolve("nope", &CountingAssembler::default())
            .unwrap_err();
        assert_eq!(err, CompileError::UnknownDependency("nope".to_string()));
    }

    #[test]
    fn test_two_project_cycle_in_either_order() {
        for start in ["a", "b"] {
            let mut registry =
                ProjectRegistry::from_configs([project("a", Some("b")), project("b", Some("a"))])
                    .unwrap();
            let err = registry
                .resolve(start, &CountingAssembler::default())
                .unwrap_err();
            assert!(matches!(err, CompileError::DependencyCycle(_)), "{err}");
            assert!(matches!(registry.state("a"), Some(Resolution::Unresolved)));
            assert!(matches!(registry.state("b"), Some(Resolution::Unresolved)));
        }
    }

    #[test]
    fn test_cycle_path_reported() {
        let mut registry = ProjectRegistry::from_configs([
            project("a", Some("b")),
            project("b", Some("c")),
            project("c", Some("b")),
        ])
        .unwrap();
        let err = registry
            .resolve("a", &CountingAssembler::default())
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::DependencyCycle(vec!["b".into(), "c".into(), "b".into()])
        );
        assert_eq!(err.to_string(), "dependency loop detected: b -> c -> b");
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut registry = ProjectRegistry::from_configs([project("a", Some("a"))]).unwrap();
        let err = registry
            .resolve("a", &CountingAssembler::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::DependencyCycle(_)));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let err = ProjectRegistry::from_configs([project("a", None), project("a", None)])
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidConfig(_)));
    }
}
