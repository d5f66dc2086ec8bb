use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// An ordered mapping from parameter name to default value.
///
/// One schema exists per equation identifier. Schemas are built once at
/// registry construction and never mutated afterwards; iteration order is
/// the order parameters were declared, which is also the order fields are
/// rendered in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    entries: Vec<(String, f64)>,
}

impl ParameterSchema {
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|&(name, default)| (name.to_string(), default))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Default value for `name`, if it is a schema member.
    pub fn default_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, default)| default)
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), *d))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

// Shared result for lookups of unregistered equations. Statics cannot go
// through `from_pairs`, so construct the empty schema directly.
static EMPTY_SCHEMA: ParameterSchema = ParameterSchema {
    entries: Vec::new(),
};

/// The process-wide equation table: equation identifier → parameter schema.
///
/// Immutable after construction. The UI only ever reads it, so a single
/// shared instance behind [`Registry::global`] serves every panel.
#[derive(Debug)]
pub struct Registry {
    order: Vec<String>,
    schemas: HashMap<String, ParameterSchema>,
}

impl Registry {
    /// The equations the simulation service understands, with the same
    /// parameter names and defaults its solver modules use.
    pub fn builtin() -> Self {
        let presets: &[(&str, &[(&str, f64)])] = &[
            ("free_fall", &[("g", -9.8)]),
            ("fluid_resistance", &[("g", -9.8), ("k", 0.1), ("m", 1.0)]),
            ("sho", &[("k", 0.1), ("m", 1.0)]),
            (
                "dho",
                &[("k", 5.0), ("b", 0.05), ("m", 1.0), ("Fo", 10.0), ("Wo", 0.2)],
            ),
            (
                "ddho",
                &[("k", 5.0), ("b", 0.05), ("m", 1.0), ("Fo", 10.0), ("Wo", 0.2)],
            ),
            ("pendulum", &[("g", -9.8), ("L", 1.0)]),
            (
                "complex_pendulum",
                &[
                    ("g", 9.8),
                    ("L", 1.0),
                    ("m", 1.0),
                    ("damping", 0.1),
                    ("driving_force", 0.5),
                    ("driving_freq", 1.0),
                ],
            ),
            (
                "mass_spring_damper",
                &[("m", 1.0), ("k", 1.0), ("c", 0.2), ("F0", 0.0), ("omega", 0.0)],
            ),
        ];

        let mut order = Vec::with_capacity(presets.len());
        let mut schemas = HashMap::with_capacity(presets.len());
        for &(equation, pairs) in presets {
            order.push(equation.to_string());
            schemas.insert(equation.to_string(), ParameterSchema::from_pairs(pairs));
        }
        Self { order, schemas }
    }

    /// The shared registry, built on first use.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::builtin)
    }

    /// Schema for `equation`. Unregistered identifiers yield the empty
    /// schema rather than an error; callers must tolerate rendering zero
    /// fields.
    pub fn lookup(&self, equation: &str) -> &ParameterSchema {
        self.schemas.get(equation).unwrap_or(&EMPTY_SCHEMA)
    }

    /// Equation identifiers in registration order.
    pub fn equations(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }
}
