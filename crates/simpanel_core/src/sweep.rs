use crate::error::ValidationError;
use crate::registry::ParameterSchema;
use serde::{Deserialize, Serialize};

/// The range swept by an animation request: one schema parameter varied
/// from `min` to `max` in increments of `step` while the rest stay fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub varying_param: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SweepSpec {
    /// Range seeded from the schema default of `name`:
    /// `min = default`, `max = 2 * default`, `step = |default| / 10`.
    ///
    /// Returns `None` when `name` is not a schema member.
    pub fn derived(schema: &ParameterSchema, name: &str) -> Option<SweepSpec> {
        let default = schema.default_of(name)?;
        Some(SweepSpec {
            varying_param: name.to_string(),
            min: default,
            max: 2.0 * default,
            step: default.abs() / 10.0,
        })
    }

    /// A sweep must make forward progress: `step > 0`. The derived default
    /// can violate this (a parameter whose default is zero derives a zero
    /// step), so this runs at assembly time, after operator overrides.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.step > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidStep { step: self.step })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    #[test]
    fn pendulum_length_derives_the_documented_range() {
        let schema = Registry::builtin().lookup("pendulum").clone();
        let spec = SweepSpec::derived(&schema, "L").expect("L is a member");
        assert_eq!(spec.varying_param, "L");
        assert_eq!(spec.min, 1.0);
        assert_eq!(spec.max, 2.0);
        assert!((spec.step - 0.1).abs() < 1e-12);
    }

    #[test]
    fn derived_range_doubles_min_and_tithes_its_magnitude() {
        let registry = Registry::builtin();
        for equation in registry.equations() {
            let schema = registry.lookup(equation);
            for name in schema.names() {
                let spec = SweepSpec::derived(schema, name).expect("member");
                assert_eq!(spec.max, 2.0 * spec.min, "{equation}.{name}");
                assert_eq!(spec.step, spec.min.abs() / 10.0, "{equation}.{name}");
            }
        }
    }

    #[test]
    fn negative_defaults_derive_negative_ranges() {
        let schema = Registry::builtin().lookup("free_fall").clone();
        let spec = SweepSpec::derived(&schema, "g").expect("g is a member");
        assert_eq!(spec.min, -9.8);
        assert_eq!(spec.max, -19.6);
        // The step stays positive even for a negative default.
        assert!((spec.step - 0.98).abs() < 1e-12);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn non_member_derives_nothing() {
        let schema = Registry::builtin().lookup("sho").clone();
        assert_eq!(SweepSpec::derived(&schema, "L"), None);
    }

    #[test]
    fn zero_and_negative_steps_fail_validation() {
        let mut spec = SweepSpec {
            varying_param: "k".to_string(),
            min: 0.0,
            max: 1.0,
            step: 0.0,
        };
        assert_eq!(
            spec.validate(),
            Err(ValidationError::InvalidStep { step: 0.0 })
        );
        spec.step = -0.5;
        assert_eq!(
            spec.validate(),
            Err(ValidationError::InvalidStep { step: -0.5 })
        );
        spec.step = 1e-9;
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn zero_default_derives_an_invalid_step() {
        // mass_spring_damper's forcing amplitude defaults to zero; the
        // derived sweep is unusable until the operator edits it.
        let schema = Registry::builtin().lookup("mass_spring_damper").clone();
        let spec = SweepSpec::derived(&schema, "F0").expect("F0 is a member");
        assert_eq!(spec.step, 0.0);
        assert!(spec.validate().is_err());
    }
}
