use thiserror::Error;

/// Errors raised while turning operator input into a request payload.
/// All of these are detected before any network activity and abort the
/// submission attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{field}' is not a number: '{entry}'")]
    NotANumber { field: String, entry: String },

    #[error("step must be greater than zero, got {step}")]
    InvalidStep { step: f64 },

    #[error("unknown integration method '{name}'")]
    UnknownMethod { name: String },

    #[error("no varying parameter is selected")]
    NoVaryingParameter,
}

/// Everything that can end a submission attempt. No variant is retried;
/// the operator corrects input and resubmits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network failure, abort, or a response that is not the expected JSON.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-empty `error` field.
    #[error("{0}")]
    Application(String),
}

impl SubmitError {
    /// Message to show the operator in a blocking alert, or `None` for
    /// failures that only go to the console (transport problems carry no
    /// operator-actionable detail).
    pub fn alert_text(&self) -> Option<String> {
        match self {
            SubmitError::Validation(err) => Some(err.to_string()),
            SubmitError::Transport(_) => None,
            SubmitError::Application(msg) => Some(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_not_alerted() {
        let err = SubmitError::Transport("connection refused".to_string());
        assert_eq!(err.alert_text(), None);
    }

    #[test]
    fn validation_and_application_errors_are_alerted() {
        let validation: SubmitError = ValidationError::InvalidStep { step: -1.0 }.into();
        assert_eq!(
            validation.alert_text().as_deref(),
            Some("step must be greater than zero, got -1")
        );

        let application = SubmitError::Application("unknown equation".to_string());
        assert_eq!(application.alert_text().as_deref(), Some("unknown equation"));
    }

    #[test]
    fn not_a_number_names_the_field() {
        let err = ValidationError::NotANumber {
            field: "k".to_string(),
            entry: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "field 'k' is not a number: 'abc'");
    }
}
