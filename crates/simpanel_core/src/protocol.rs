//! Wire types for the two service endpoints.
//!
//! Requests serialize to exactly the JSON bodies the service expects;
//! replies decode leniently so that error reporting never depends on the
//! success fields being present.

use crate::error::SubmitError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SIMULATE_ENDPOINT: &str = "/simulate/";
pub const ANIMATE_ENDPOINT: &str = "/animate/";

/// Numerical integration methods the service dispatches by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Euler,
    RungeKutta2,
    RungeKutta4,
    VelocityVerlet,
}

impl Method {
    pub fn parse(name: &str) -> Option<Method> {
        match name {
            "euler" => Some(Method::Euler),
            "runge_kutta2" => Some(Method::RungeKutta2),
            "runge_kutta4" => Some(Method::RungeKutta4),
            "velocity_verlet" => Some(Method::VelocityVerlet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::RungeKutta2 => "runge_kutta2",
            Method::RungeKutta4 => "runge_kutta4",
            Method::VelocityVerlet => "velocity_verlet",
        }
    }
}

/// Body of `POST /simulate/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateRequest {
    pub method: Method,
    pub equation: String,
    pub x0: f64,
    pub v0: f64,
    pub t_total: f64,
    #[serde(rename = "N")]
    pub n: u32,
    pub params: BTreeMap<String, f64>,
}

/// Body of `POST /animate/`: one varying parameter swept over a range,
/// every other schema parameter held at its current field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimateRequest {
    pub equation: String,
    pub method: Method,
    pub t_total: f64,
    #[serde(rename = "N")]
    pub n: u32,
    pub params: AnimateParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimateParams {
    pub varying_param: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    #[serde(flatten)]
    pub fixed: BTreeMap<String, f64>,
}

/// Reply to `/simulate/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulateReply {
    #[serde(default)]
    pub graph_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SimulateReply {
    pub fn into_result(self) -> Result<String, SubmitError> {
        resolve(self.graph_url, self.error, "graph_url")
    }
}

/// Reply to `/animate/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnimateReply {
    #[serde(default)]
    pub animation_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnimateReply {
    pub fn into_result(self) -> Result<String, SubmitError> {
        resolve(self.animation_url, self.error, "animation_url")
    }
}

/// A non-empty `error` wins over any success field; a reply with neither
/// is malformed and counts as a transport failure.
fn resolve(url: Option<String>, error: Option<String>, field: &str) -> Result<String, SubmitError> {
    if let Some(message) = error.filter(|m| !m.is_empty()) {
        return Err(SubmitError::Application(message));
    }
    url.ok_or_else(|| SubmitError::Transport(format!("response is missing '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_names_round_trip_through_serde() {
        for method in [
            Method::Euler,
            Method::RungeKutta2,
            Method::RungeKutta4,
            Method::VelocityVerlet,
        ] {
            assert_eq!(Method::parse(method.as_str()), Some(method));
            assert_eq!(
                serde_json::to_value(method).unwrap(),
                json!(method.as_str())
            );
        }
        assert_eq!(Method::parse("rk45"), None);
    }

    #[test]
    fn simulate_request_serializes_the_documented_body() {
        let request = SimulateRequest {
            method: Method::Euler,
            equation: "sho".to_string(),
            x0: 1.0,
            v0: 0.0,
            t_total: 10.0,
            n: 100,
            params: [("k".to_string(), 0.1), ("m".to_string(), 1.0)]
                .into_iter()
                .collect(),
        };
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
    fn animate_params_flatten_the_fixed_values() {
        let request = AnimateRequest {
            equation: "pendulum".to_string(),
            method: Method::RungeKutta4,
            t_total: 10.0,
            n: 100,
            params: AnimateParams {
                varying_param: "L".to_string(),
                min: 1.0,
                max: 2.0,
                step: 0.1,
                fixed: [("g".to_string(), -9.8)].into_iter().collect(),
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "equation": "pendulum",
                "method": "runge_kutta4",
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
    fn error_replies_never_yield_a_url() {
        let reply: SimulateReply = serde_json::from_value(json!({
            "graph_url": "/static/plot.png",
            "error": "integration diverged"
        }))
        .unwrap();
        assert_eq!(
            reply.into_result(),
            Err(SubmitError::Application("integration diverged".to_string()))
        );
    }

    #[test]
    fn empty_error_strings_do_not_mask_success() {
        let reply: AnimateReply = serde_json::from_value(json!({
            "animation_url": "/static/anim.gif",
            "error": ""
        }))
        .unwrap();
        assert_eq!(reply.into_result(), Ok("/static/anim.gif".to_string()));
    }

    #[test]
    fn replies_without_either_field_are_transport_failures() {
        let reply: SimulateReply = serde_json::from_value(json!({})).unwrap();
        match reply.into_result() {
            Err(SubmitError::Transport(msg)) => assert!(msg.contains("graph_url")),
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[test]
    fn unknown_reply_fields_are_ignored() {
        let reply: AnimateReply = serde_json::from_value(json!({
            "animation_url": "/static/anim.gif",
            "frames": 240
        }))
        .unwrap();
        assert_eq!(reply.into_result(), Ok("/static/anim.gif".to_string()));
    }
}
