use crate::error::ValidationError;
use crate::registry::ParameterSchema;
use crate::sweep::SweepSpec;
use std::collections::BTreeMap;

/// Parses one operator entry as a finite float. Raw text is kept verbatim
/// until this point so a bad entry can be reported back by field name
/// instead of being silently defaulted.
pub(crate) fn parse_entry(field: &str, entry: &str) -> Result<f64, ValidationError> {
    let not_a_number = || ValidationError::NotANumber {
        field: field.to_string(),
        entry: entry.to_string(),
    };
    let value: f64 = entry.trim().parse().map_err(|_| not_a_number())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(not_a_number())
    }
}

/// One rendered numeric input: the parameter it belongs to, the schema
/// default it was seeded with, and whatever the operator has typed since.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    default: f64,
    entry: String,
}

impl Field {
    fn seeded(name: &str, default: f64) -> Self {
        Self {
            name: name.to_string(),
            default,
            entry: default.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// The raw text currently in the input.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn set_entry(&mut self, raw: impl Into<String>) {
        self.entry = raw.into();
    }

    pub fn parse(&self) -> Result<f64, ValidationError> {
        parse_entry(&self.name, &self.entry)
    }
}

/// Raw entries for the three auxiliary sweep inputs, seeded from the
/// derived range of the varying parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepEntries {
    varying: String,
    min: String,
    max: String,
    step: String,
}

impl SweepEntries {
    fn seeded(spec: &SweepSpec) -> Self {
        Self {
            varying: spec.varying_param.clone(),
            min: spec.min.to_string(),
            max: spec.max.to_string(),
            step: spec.step.to_string(),
        }
    }

    pub fn varying(&self) -> &str {
        &self.varying
    }

    pub fn min(&self) -> &str {
        &self.min
    }

    pub fn max(&self) -> &str {
        &self.max
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn set_min(&mut self, raw: impl Into<String>) {
        self.min = raw.into();
    }

    pub fn set_max(&mut self, raw: impl Into<String>) {
        self.max = raw.into();
    }

    pub fn set_step(&mut self, raw: impl Into<String>) {
        self.step = raw.into();
    }

    /// Current entries as a sweep range. Does not check `step > 0`; that
    /// is the assembler's job.
    pub fn parse(&self) -> Result<SweepSpec, ValidationError> {
        Ok(SweepSpec {
            varying_param: self.varying.clone(),
            min: parse_entry("min", &self.min)?,
            max: parse_entry("max", &self.max)?,
            step: parse_entry("step", &self.step)?,
        })
    }
}

/// The transient set of currently rendered parameter fields.
///
/// This is the model the DOM is rendered from, not the DOM itself: the
/// presenter renders it and copies operator edits back in before assembly.
/// The whole state is discarded and rebuilt on every equation or
/// varying-parameter change; nothing survives a schema switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    equation: String,
    fields: Vec<Field>,
    sweep: Option<SweepEntries>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equation identifier the current field set was built for.
    pub fn equation(&self) -> &str {
        &self.equation
    }

    /// Rebuilds the field set for `equation` from `schema`.
    ///
    /// All previous fields are dropped unconditionally; one field per
    /// schema parameter is created in schema order, seeded with its
    /// default. When `varying` names a schema member it is skipped and the
    /// auxiliary sweep entries are seeded from its derived range; a
    /// `varying` that is not a member is ignored, as if no exclusion were
    /// requested.
    pub fn reconcile(&mut self, equation: &str, schema: &ParameterSchema, varying: Option<&str>) {
        self.equation = equation.to_string();
        self.fields.clear();

        let excluded = varying.filter(|name| schema.contains(name));
        for (name, default) in schema.iter() {
            if excluded == Some(name) {
                continue;
            }
            self.fields.push(Field::seeded(name, default));
        }
        self.sweep = excluded
            .and_then(|name| SweepSpec::derived(schema, name))
            .map(|spec| SweepEntries::seeded(&spec));
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Records an operator edit. Returns `false` when no such field is
    /// rendered (stale DOM reads after a schema switch end up here).
    pub fn set_entry(&mut self, name: &str, raw: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name() == name) {
            Some(field) => {
                field.set_entry(raw);
                true
            }
            None => false,
        }
    }

    /// Auxiliary sweep entries, present only while a valid varying
    /// parameter is excluded.
    pub fn sweep(&self) -> Option<&SweepEntries> {
        self.sweep.as_ref()
    }

    pub fn sweep_mut(&mut self) -> Option<&mut SweepEntries> {
        self.sweep.as_mut()
    }

    /// Every rendered field parsed, keyed by parameter name. The first bad
    /// entry aborts with its field name.
    pub fn parsed_params(&self) -> Result<BTreeMap<String, f64>, ValidationError> {
        let mut params = BTreeMap::new();
        for field in &self.fields {
            params.insert(field.name().to_string(), field.parse()?);
        }
        Ok(params)
    }
}
