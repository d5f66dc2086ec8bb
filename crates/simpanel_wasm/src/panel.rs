//! Panel wiring: one entry point per simulation page.
//!
//! The panel owns the form model and the submission bookkeeping behind an
//! `Rc<RefCell<..>>` shared by the event handlers. Every handler follows
//! the same shape: read the DOM, update the model through `simpanel_core`,
//! render the result back out.

use std::cell::RefCell;
use std::rc::Rc;

use simpanel_core::error::{SubmitError, ValidationError};
use simpanel_core::form::FormState;
use simpanel_core::payload::{assemble_animate, assemble_simulate, AnimateEntries, RunEntries};
use simpanel_core::protocol::{
    AnimateReply, Method, SimulateReply, ANIMATE_ENDPOINT, SIMULATE_ENDPOINT,
};
use simpanel_core::registry::Registry;
use simpanel_core::session::{cache_bust, Generation, MediaSession, REQUEST_TIMEOUT_MS};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{console, Document, Event};

use crate::presenter::{self, ids, FieldPresenter};
use crate::transport::post_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PanelMode {
    Simulate,
    Animate,
}

impl PanelMode {
    pub(crate) fn endpoint(self) -> &'static str {
        match self {
            PanelMode::Simulate => SIMULATE_ENDPOINT,
            PanelMode::Animate => ANIMATE_ENDPOINT,
        }
    }

    pub(crate) fn media_element_id(self) -> &'static str {
        match self {
            PanelMode::Simulate => ids::SIMULATION_GRAPH,
            PanelMode::Animate => ids::ANIMATION_PREVIEW,
        }
    }

    pub(crate) fn submit_button_id(self) -> &'static str {
        match self {
            PanelMode::Simulate => ids::SIMULATE_BUTTON,
            PanelMode::Animate => ids::ANIMATE_BUTTON,
        }
    }

    pub(crate) fn alert_prefix(self) -> &'static str {
        match self {
            PanelMode::Simulate => "Simulation Error",
            PanelMode::Animate => "Animation Error",
        }
    }
}

struct Panel {
    mode: PanelMode,
    document: Document,
    presenter: FieldPresenter,
    form: FormState,
    session: MediaSession,
}

/// Entry point for the simulate page. Call once on load.
#[wasm_bindgen]
pub fn init_simulate_panel() -> Result<(), JsValue> {
    init_panel(PanelMode::Simulate)
}

/// Entry point for the animate page. Call once on load.
#[wasm_bindgen]
pub fn init_animate_panel() -> Result<(), JsValue> {
    init_panel(PanelMode::Animate)
}

fn init_panel(mode: PanelMode) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let presenter = FieldPresenter::new(&document)?;

    let panel = Rc::new(RefCell::new(Panel {
        mode,
        document,
        presenter,
        form: FormState::new(),
        session: MediaSession::new(),
    }));

    on_equation_change(&panel)?;
    bind_controls(&panel)?;
    Ok(())
}

/// Looks up the newly selected equation's schema, repopulates the
/// varying-parameter dropdown (animate), and rebuilds the field set.
fn on_equation_change(panel: &Rc<RefCell<Panel>>) -> Result<(), JsValue> {
    let p = &mut *panel.borrow_mut();
    let equation = presenter::select_value(&p.document, ids::EQUATION).unwrap_or_default();
    let schema = Registry::global().lookup(&equation);

    let varying = match p.mode {
        PanelMode::Simulate => None,
        PanelMode::Animate => p.presenter.populate_varying_options(schema)?,
    };

    p.form.reconcile(&equation, schema, varying.as_deref());
    p.presenter.render(&p.form)?;
    p.presenter.seed_sweep_inputs(&p.form);
    Ok(())
}

/// Rebuilds the field set around the newly chosen varying parameter.
/// Entries reset to schema defaults, including the sweep range.
fn on_varying_change(panel: &Rc<RefCell<Panel>>) -> Result<(), JsValue> {
    let p = &mut *panel.borrow_mut();
    let equation = presenter::select_value(&p.document, ids::EQUATION).unwrap_or_default();
    let schema = Registry::global().lookup(&equation);
    let varying = presenter::select_value(&p.document, ids::VARYING_PARAM);

    p.form.reconcile(&equation, schema, varying.as_deref());
    p.presenter.render(&p.form)?;
    p.presenter.seed_sweep_inputs(&p.form);
    Ok(())
}

fn bind_controls(panel: &Rc<RefCell<Panel>>) -> Result<(), JsValue> {
    let (document, mode) = {
        let p = panel.borrow();
        (p.document.clone(), p.mode)
    };

    if let Some(select) = document.get_element_by_id(ids::EQUATION) {
        let handler_panel = Rc::clone(panel);
        let cb = Closure::wrap(Box::new(move |_event: Event| {
            if let Err(err) = on_equation_change(&handler_panel) {
                console::error_1(&err);
            }
        }) as Box<dyn FnMut(_)>);
        select.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    if mode == PanelMode::Animate {
        if let Some(select) = document.get_element_by_id(ids::VARYING_PARAM) {
            let handler_panel = Rc::clone(panel);
            let cb = Closure::wrap(Box::new(move |_event: Event| {
                if let Err(err) = on_varying_change(&handler_panel) {
                    console::error_1(&err);
                }
            }) as Box<dyn FnMut(_)>);
            select.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }

        if let Some(button) = document.get_element_by_id(ids::REPLAY_BUTTON) {
            let doc = document.clone();
            let cb = Closure::wrap(Box::new(move |_event: Event| {
                presenter::replay_media(&doc, ids::ANIMATION_PREVIEW);
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
            cb.forget();
        }
    }

    if let Some(button) = document.get_element_by_id(mode.submit_button_id()) {
        let handler_panel = Rc::clone(panel);
        let cb = Closure::wrap(Box::new(move |_event: Event| {
            submit(&handler_panel);
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

/// Reads the page, assembles the payload, and sends it. Validation
/// failures alert and stop before any network activity.
fn submit(panel: &Rc<RefCell<Panel>>) {
    let (endpoint, body, generation) = match prepare(panel) {
        Ok(parts) => parts,
        Err(err) => {
            let prefix = panel.borrow().mode.alert_prefix();
            match err.alert_text() {
                Some(message) => presenter::alert(&format!("{prefix}: {message}")),
                None => console::error_1(&JsValue::from_str(&err.to_string())),
            }
            return;
        }
    };

    {
        let p = panel.borrow();
        presenter::set_spinner(&p.document, true);
    }
    console::log_1(&JsValue::from_str(&format!("Sending {endpoint} request: {body}")));

    let handler_panel = Rc::clone(panel);
    let armed = post_json(endpoint, &body, REQUEST_TIMEOUT_MS, move |outcome| {
        complete(&handler_panel, generation, outcome);
    });

    if let Err(err) = armed {
        console::error_1(&err);
        let p = &mut *panel.borrow_mut();
        if p.session.fail(generation) {
            presenter::set_spinner(&p.document, false);
        }
    }
}

/// Pure-ish front half of a submission: pull operator edits into the
/// model, assemble, serialize, and claim a fresh generation.
fn prepare(panel: &Rc<RefCell<Panel>>) -> Result<(&'static str, String, Generation), SubmitError> {
    let p = &mut *panel.borrow_mut();
    p.presenter.read_into(&mut p.form);

    let method_name = presenter::select_value(&p.document, ids::METHOD).unwrap_or_default();
    let method =
        Method::parse(&method_name).ok_or(ValidationError::UnknownMethod { name: method_name })?;

    let body = match p.mode {
        PanelMode::Simulate => {
            let run = RunEntries {
                x0: presenter::input_value(&p.document, ids::X0).unwrap_or_default(),
                v0: presenter::input_value(&p.document, ids::V0).unwrap_or_default(),
                t_total: presenter::input_value(&p.document, ids::T_TOTAL).unwrap_or_default(),
                n: presenter::input_value(&p.document, ids::STEP_COUNT).unwrap_or_default(),
            };
            let request = assemble_simulate(method, &p.form, &run)?;
            serde_json::to_string(&request).map_err(|err| SubmitError::Transport(err.to_string()))?
        }
        PanelMode::Animate => {
            let run = AnimateEntries {
                t_total: presenter::input_value(&p.document, ids::T_TOTAL).unwrap_or_default(),
                n: presenter::input_value(&p.document, ids::STEP_COUNT).unwrap_or_default(),
            };
            let request = assemble_animate(method, &p.form, &run)?;
            serde_json::to_string(&request).map_err(|err| SubmitError::Transport(err.to_string()))?
        }
    };

    let generation = p.session.begin();
    Ok((p.mode.endpoint(), body, generation))
}

fn decode_reply(mode: PanelMode, json: JsValue) -> Result<String, SubmitError> {
    match mode {
        PanelMode::Simulate => serde_wasm_bindgen::from_value::<SimulateReply>(json)
            .map_err(|err| SubmitError::Transport(err.to_string()))?
            .into_result(),
        PanelMode::Animate => serde_wasm_bindgen::from_value::<AnimateReply>(json)
            .map_err(|err| SubmitError::Transport(err.to_string()))?
            .into_result(),
    }
}

/// Back half of a submission. Superseded generations change nothing: a
/// newer submission owns the spinner and the media element by then.
fn complete(panel: &Rc<RefCell<Panel>>, generation: Generation, outcome: Result<JsValue, String>) {
    let mode = panel.borrow().mode;
    let resolved = outcome
        .map_err(SubmitError::Transport)
        .and_then(|json| decode_reply(mode, json));

    let p = &mut *panel.borrow_mut();
    match resolved {
        Ok(url) => {
            if !p.session.succeed(generation) {
                return;
            }
            presenter::set_spinner(&p.document, false);
            let busted = cache_bust(&url, js_sys::Date::now() as u64);
            presenter::show_media(&p.document, p.mode.media_element_id(), &busted);
        }
        Err(err) => {
            if !p.session.fail(generation) {
                return;
            }
            presenter::set_spinner(&p.document, false);
            match err.alert_text() {
                Some(message) => {
                    presenter::alert(&format!("{}: {}", p.mode.alert_prefix(), message));
                }
                None => console::error_1(&JsValue::from_str(&err.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_map_to_their_page_elements() {
        assert_eq!(PanelMode::Simulate.endpoint(), "/simulate/");
        assert_eq!(PanelMode::Animate.endpoint(), "/animate/");
        assert_eq!(PanelMode::Simulate.media_element_id(), "simulation-graph");
        assert_eq!(PanelMode::Animate.media_element_id(), "animation-preview");
        assert_eq!(PanelMode::Simulate.submit_button_id(), "simulate-btn");
        assert_eq!(
            PanelMode::Animate.submit_button_id(),
            "generate-animation-btn"
        );
    }

    #[test]
    fn alert_prefixes_match_the_page_wording() {
        assert_eq!(PanelMode::Simulate.alert_prefix(), "Simulation Error");
        assert_eq!(PanelMode::Animate.alert_prefix(), "Animation Error");
    }
}
