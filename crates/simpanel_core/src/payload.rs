//! Pure assembly of request payloads from UI state. Nothing here touches
//! the network; the output is handed to the transport layer verbatim.

use crate::error::ValidationError;
use crate::form::{parse_entry, FormState};
use crate::protocol::{AnimateParams, AnimateRequest, Method, SimulateRequest};

/// Raw text of the top-level run controls on the simulate page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunEntries {
    pub x0: String,
    pub v0: String,
    pub t_total: String,
    pub n: String,
}

/// Raw text of the run controls on the animate page (no initial
/// conditions there; the service fixes them per frame).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimateEntries {
    pub t_total: String,
    pub n: String,
}

/// Step count: a positive integer, parsed strictly rather than truncated.
fn parse_count(field: &str, entry: &str) -> Result<u32, ValidationError> {
    entry
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
            entry: entry.to_string(),
        })
}

/// Builds the `/simulate/` body: every rendered parameter plus the
/// top-level run controls. Any unparseable entry aborts assembly with the
/// offending field's name.
pub fn assemble_simulate(
    method: Method,
    form: &FormState,
    run: &RunEntries,
) -> Result<SimulateRequest, ValidationError> {
    Ok(SimulateRequest {
        method,
        equation: form.equation().to_string(),
        x0: parse_entry("x0", &run.x0)?,
        v0: parse_entry("v0", &run.v0)?,
        t_total: parse_entry("t_total", &run.t_total)?,
        n: parse_count("N", &run.n)?,
        params: form.parsed_params()?,
    })
}

/// Builds the `/animate/` body: the sweep range for the varying parameter
/// plus the current value of every fixed parameter. Fails with
/// `InvalidStep` for any `step <= 0`.
pub fn assemble_animate(
    method: Method,
    form: &FormState,
    run: &AnimateEntries,
) -> Result<AnimateRequest, ValidationError> {
    let sweep = form.sweep().ok_or(ValidationError::NoVaryingParameter)?;
    let spec = sweep.parse()?;
    spec.validate()?;

    Ok(AnimateRequest {
        equation: form.equation().to_string(),
        method,
        t_total: parse_entry("t_total", &run.t_total)?,
        n: parse_count("N", &run.n)?,
        params: AnimateParams {
            varying_param: spec.varying_param,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            fixed: form.parsed_params()?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use serde_json::json;

    fn form_for(equation: &str, varying: Option<&str>) -> FormState {
        let mut form = FormState::new();
        form.reconcile(equation, Registry::builtin().lookup(equation), varying);
        form
    }

    fn run_entries() -> RunEntries {
        RunEntries {
            x0: "1".to_string(),
            v0: "0".to_string(),
            t_total: "10".to_string(),
            n: "100".to_string(),
        }
    }

    #[test]
    fn sho_simulate_payload_matches_the_documented_example() {
        let form = form_for("sho", None);
        let request = assemble_simulate(Method::Euler, &form, &run_entries()).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "method": "euler",
                "equation": "sho",
                "x0": 1.0,
                "v0": 0.0,
                "t_total": 10.0,
                "N": 100,
                "params": {"k": 0.1, "m": 1.0}
            })
        );
    }

    #[test]
    fn operator_edits_flow_into_the_payload() {
        let mut form = form_for("sho", None);
        form.set_entry("k", "2.5");
        let request = assemble_simulate(Method::RungeKutta4, &form, &run_entries()).unwrap();
        assert_eq!(request.params["k"], 2.5);
        assert_eq!(request.params["m"], 1.0);
    }

    #[test]
    fn bad_parameter_entries_abort_assembly() {
        let mut form = form_for("sho", None);
        form.set_entry("k", "stiff");
        let err = assemble_simulate(Method::Euler, &form, &run_entries()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "k".to_string(),
                entry: "stiff".to_string(),
            }
        );
    }

    #[test]
    fn bad_run_entries_abort_assembly() {
        let form = form_for("sho", None);
        let mut run = run_entries();
        run.x0 = "start".to_string();
        assert!(matches!(
            assemble_simulate(Method::Euler, &form, &run),
            Err(ValidationError::NotANumber { ref field, .. }) if field == "x0"
        ));
    }

    #[test]
    fn fractional_step_counts_are_rejected() {
        let form = form_for("sho", None);
        let mut run = run_entries();
        run.n = "100.5".to_string();
        assert!(matches!(
            assemble_simulate(Method::Euler, &form, &run),
            Err(ValidationError::NotANumber { ref field, .. }) if field == "N"
        ));
    }

    fn animate_entries() -> AnimateEntries {
        AnimateEntries {
            t_total: "10".to_string(),
            n: "100".to_string(),
        }
    }

    #[test]
    fn pendulum_animate_payload_sweeps_the_derived_range() {
        let form = form_for("pendulum", Some("L"));
        let request = assemble_animate(Method::Euler, &form, &animate_entries()).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "equation": "pendulum",
                "method": "euler",
                "t_total": 10.0,
                "N": 100,
                "params": {
                    "varying_param": "L",
                    "min": 1.0,
                    "max": 2.0,
                    "step": 0.1,
                    "g": -9.8
                }
            })
        );
    }

    #[test]
    fn nonpositive_steps_fail_with_invalid_step() {
        for step in ["0", "-0.1", "-5"] {
            let mut form = form_for("pendulum", Some("L"));
            form.sweep_mut().unwrap().set_step(step);
            let err = assemble_animate(Method::Euler, &form, &animate_entries()).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidStep { .. }),
                "step {step} gave {err:?}"
            );
        }
    }

    #[test]
    fn positive_steps_assemble() {
        for step in ["0.1", "1e-6", "3"] {
            let mut form = form_for("pendulum", Some("L"));
            form.sweep_mut().unwrap().set_step(step);
            assert!(assemble_animate(Method::Euler, &form, &animate_entries()).is_ok());
        }
    }

    #[test]
    fn animate_without_a_varying_parameter_is_a_validation_error() {
        // An exclusion that is not a schema member leaves no sweep state.
        let form = form_for("sho", Some("L"));
        assert_eq!(
            assemble_animate(Method::Euler, &form, &animate_entries()).unwrap_err(),
            ValidationError::NoVaryingParameter
        );
    }

    #[test]
    fn fixed_parameter_edits_ride_along_with_the_sweep() {
        let mut form = form_for("pendulum", Some("L"));
        form.set_entry("g", "-3.7");
        let request = assemble_animate(Method::VelocityVerlet, &form, &animate_entries()).unwrap();
        assert_eq!(request.params.fixed["g"], -3.7);
        assert_eq!(request.params.varying_param, "L");
    }
}
