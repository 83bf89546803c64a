//! Module registry and factory for phasediv clock modules.
//!
//! This crate provides a centralized registry for discovering and
//! instantiating modules by id. A host registers its modules once at
//! startup and later creates instances from saved patches or presets.
//!
//! # Features
//!
//! - **Module Discovery**: List all available modules with metadata
//! - **Factory Pattern**: Create modules by id at runtime
//! - **Tag System**: Modules labelled by role
//! - **Parameter Info**: Access parameter descriptors for UI generation
//!
//! # Example
//!
//! ```rust
//! use phasediv_core::ModuleWithParams;
//! use phasediv_registry::{ModuleRegistry, ModuleTag};
//!
//! let registry = ModuleRegistry::global();
//!
//! for module in registry.all_modules() {
//!     println!("{}: {}", module.name, module.description);
//! }
//!
//! let divider = registry.create("divider").expect("built-in");
//! assert_eq!(divider.module_param_count(), 3);
//!
//! assert!(!registry.modules_with_tag(ModuleTag::ClockModulator).is_empty());
//! ```

use std::sync::OnceLock;

use phasediv_core::{ModuleWithParams, ParamDescriptor, PhaseDivider};

/// Role tag for browsing and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleTag {
    /// Modules that reshape an incoming clock (dividers, multipliers, swing)
    ClockModulator,
}

impl ModuleTag {
    /// Every tag, in listing order.
    pub const ALL: &'static [ModuleTag] = &[ModuleTag::ClockModulator];

    /// Returns a human-readable name for the tag.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleTag::ClockModulator => "Clock Modulator",
        }
    }
}

/// Describes a module in the registry.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique identifier for the module (lowercase, no spaces).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the module.
    pub description: &'static str,
    /// Tags for organization.
    pub tags: &'static [ModuleTag],
    /// Number of parameters.
    pub param_count: usize,
}

impl ModuleDescriptor {
    /// Whether the module carries `tag`.
    pub fn has_tag(&self, tag: ModuleTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Factory function type for creating modules.
pub type ModuleFactory = fn() -> Box<dyn ModuleWithParams + Send>;

/// Factory for modules that are a [`PhaseDivider`] variant.
pub type DividerFactory = fn() -> PhaseDivider;

enum Factory {
    Boxed(ModuleFactory),
    Divider(DividerFactory),
}

struct RegistryEntry {
    descriptor: ModuleDescriptor,
    factory: Factory,
}

/// Registry of available modules.
///
/// [`ModuleRegistry::new`] registers the built-in dividers; hosts may add
/// their own with [`register`](Self::register).
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a new registry with all built-in modules registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(2),
        };
        registry.register_builtin_modules();
        registry
    }

    /// Process-wide registry, built on first use.
    pub fn global() -> &'static ModuleRegistry {
        static GLOBAL: OnceLock<ModuleRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let registry = ModuleRegistry::new();
            tracing::info!(modules = registry.len(), "module registry initialized");
            registry
        })
    }

    fn register_builtin_modules(&mut self) {
        self.register_divider(
            ModuleDescriptor {
                id: "divider",
                name: "Divider",
                description: "Ratio clock divider/multiplier with swing, phase and rate inputs",
                tags: &[ModuleTag::ClockModulator],
                param_count: 3,
            },
            PhaseDivider::new,
        );

        self.register_divider(
            ModuleDescriptor {
                id: "divider-phase",
                name: "Divider (phase only)",
                description: "Ratio clock divider/multiplier driven by a phase ramp only",
                tags: &[ModuleTag::ClockModulator],
                param_count: 3,
            },
            PhaseDivider::without_rate_input,
        );
    }

    /// Register a module with the registry.
    ///
    /// A descriptor whose id is already taken replaces the earlier entry.
    pub fn register(&mut self, descriptor: ModuleDescriptor, factory: ModuleFactory) {
        self.insert(descriptor, Factory::Boxed(factory));
    }

    /// Register a [`PhaseDivider`] variant.
    ///
    /// Such modules can also be created unboxed with
    /// [`create_divider`](Self::create_divider).
    pub fn register_divider(&mut self, descriptor: ModuleDescriptor, factory: DividerFactory) {
        self.insert(descriptor, Factory::Divider(factory));
    }

    fn insert(&mut self, descriptor: ModuleDescriptor, factory: Factory) {
        tracing::debug!(id = descriptor.id, "registering module");
        let entry = RegistryEntry {
            descriptor,
            factory,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.id == entry.descriptor.id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Returns descriptors for all registered modules.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for modules carrying `tag`.
    pub fn modules_with_tag(&self, tag: ModuleTag) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.has_tag(tag))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by module id.
    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.entry(id).map(|e| &e.descriptor)
    }

    /// Create a module instance by id.
    ///
    /// Returns `None` if the id is not registered.
    pub fn create(&self, id: &str) -> Option<Box<dyn ModuleWithParams + Send>> {
        self.entry(id).map(|e| match e.factory {
            Factory::Boxed(factory) => factory(),
            Factory::Divider(factory) => Box::new(factory()) as Box<dyn ModuleWithParams + Send>,
        })
    }

    /// Create a divider instance by id.
    ///
    /// Returns `None` if the id is not registered or was registered with a
    /// boxed factory.
    pub fn create_divider(&self, id: &str) -> Option<PhaseDivider> {
        self.entry(id).and_then(|e| match e.factory {
            Factory::Divider(factory) => Some(factory()),
            Factory::Boxed(_) => None,
        })
    }

    fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.id == id)
    }

    /// Parameter descriptors for a module, in index order.
    ///
    /// Creates a temporary instance to read them.
    pub fn param_info(&self, id: &str) -> Option<Vec<ParamDescriptor>> {
        let module = self.create(id)?;
        Some(
            (0..module.module_param_count())
                .filter_map(|i| module.module_param_info(i))
                .collect(),
        )
    }

    /// Find a parameter index by name, short name or string id.
    pub fn param_index_by_name(&self, module_id: &str, param_name: &str) -> Option<usize> {
        self.create(module_id)?.module_find_param(param_name)
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasediv_core::{InputId, LightId, Module, OutputId, ParameterInfo, Port, ProcessArgs};

    #[test]
    fn test_registry_creation() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_get_module() {
        let registry = ModuleRegistry::new();

        let divider = registry.get("divider");
        assert!(divider.is_some());
        assert_eq!(divider.unwrap().name, "Divider");

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_create_module() {
        let registry = ModuleRegistry::new();
        let mut module = registry.create("divider").unwrap();

        let args = ProcessArgs::default();
        let mut inputs = [Port::DISCONNECTED; InputId::COUNT];
        inputs[InputId::Rate as usize] = Port::connected(1.0);
        let mut outputs = [0.0; OutputId::COUNT];
        let mut lights = [0.0; LightId::COUNT];
        module.process(&args, &inputs, &mut outputs, &mut lights);
        assert_eq!(lights[LightId::ExternalRate as usize], 0.5);
    }

    #[test]
    fn test_phase_only_variant_ignores_rate() {
        let registry = ModuleRegistry::new();
        let mut module = registry.create("divider-phase").unwrap();

        let args = ProcessArgs::default();
        let mut inputs = [Port::DISCONNECTED; InputId::COUNT];
        inputs[InputId::Rate as usize] = Port::connected(1.0);
        let mut outputs = [0.0; OutputId::COUNT];
        let mut lights = [0.0; LightId::COUNT];
        for _ in 0..100 {
            module.process(&args, &inputs, &mut outputs, &mut lights);
        }
        assert_eq!(lights[LightId::ExternalRate as usize], 0.0);
        assert_eq!(outputs[OutputId::Phase as usize], 0.0);
    }

    #[test]
    fn test_modules_with_tag() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.modules_with_tag(ModuleTag::ClockModulator).len(), 2);
        assert_eq!(ModuleTag::ClockModulator.name(), "Clock Modulator");
        assert_eq!(ModuleTag::ALL, &[ModuleTag::ClockModulator]);
    }

    #[test]
    fn test_descriptor_param_count_matches_instance() {
        let registry = ModuleRegistry::new();
        for descriptor in registry.all_modules() {
            let module = registry.create(descriptor.id).unwrap();
            assert_eq!(
                module.module_param_count(),
                descriptor.param_count,
                "param count mismatch for {}",
                descriptor.id
            );
        }
    }

    #[test]
    fn test_param_info() {
        let registry = ModuleRegistry::new();
        let params = registry.param_info("divider").unwrap();
        let ids: Vec<_> = params.iter().map(|p| p.string_id).collect();
        assert_eq!(ids, ["div_from", "div_to", "div_swing"]);
        assert_eq!(params[2].default, 50.0);
        assert!(registry.param_info("nope").is_none());
    }

    #[test]
    fn test_param_index_by_name() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.param_index_by_name("divider", "swing"), Some(2));
        assert_eq!(registry.param_index_by_name("divider", "div_to"), Some(1));
        assert_eq!(registry.param_index_by_name("divider", "bogus"), None);
    }

    #[test]
    fn test_register_replaces_duplicate_id() {
        let mut registry = ModuleRegistry::new();
        registry.register(
            ModuleDescriptor {
                id: "divider",
                name: "Custom Divider",
                description: "replacement",
                tags: &[],
                param_count: 3,
            },
            || Box::new(PhaseDivider::new()),
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("divider").unwrap().name, "Custom Divider");
        assert!(!registry.get("divider").unwrap().has_tag(ModuleTag::ClockModulator));
        // A boxed factory has no unboxed divider to hand out
        assert!(registry.create_divider("divider").is_none());
    }

    #[test]
    fn test_create_divider_uses_registered_constructor() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.create_divider("divider").unwrap().has_rate_input());
        assert!(!registry.create_divider("divider-phase").unwrap().has_rate_input());
        assert!(registry.create_divider("nonexistent").is_none());

        registry.register_divider(
            ModuleDescriptor {
                id: "divider-half",
                name: "Half Divider",
                description: "Divides by two",
                tags: &[ModuleTag::ClockModulator],
                param_count: 3,
            },
            || {
                let mut divider = PhaseDivider::new();
                divider.set_from(2.0);
                divider
            },
        );
        let divider = registry.create_divider("divider-half").unwrap();
        assert_eq!(divider.get_param(0), 2.0);
        assert!(registry.create("divider-half").is_some());
    }

    #[test]
    fn test_global_is_shared() {
        let a = ModuleRegistry::global();
        let b = ModuleRegistry::global();
        assert!(std::ptr::eq(a, b));
        assert!(a.get("divider").is_some());
    }
}
