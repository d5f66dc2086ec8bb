//! DOM presentation of the form model.
//!
//! Translates a [`FormState`] into labeled numeric inputs inside the
//! parameter container, and copies operator edits back out before payload
//! assembly. Rendering never decides anything; all policy lives in
//! `simpanel_core`.

use simpanel_core::form::FormState;
use simpanel_core::registry::ParameterSchema;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlSelectElement};

/// Element ids shared with the page templates.
pub mod ids {
    pub const EQUATION: &str = "equation";
    pub const METHOD: &str = "method";
    pub const X0: &str = "x0";
    pub const V0: &str = "v0";
    pub const T_TOTAL: &str = "t_total";
    pub const STEP_COUNT: &str = "N";
    pub const PARAMETERS_CONTAINER: &str = "parameters-container";
    pub const SIMULATE_BUTTON: &str = "simulate-btn";
    pub const SIMULATION_GRAPH: &str = "simulation-graph";
    pub const VARYING_PARAM: &str = "varying-param";
    pub const SWEEP_MIN: &str = "param-min";
    pub const SWEEP_MAX: &str = "param-max";
    pub const SWEEP_STEP: &str = "param-step";
    pub const ANIMATE_BUTTON: &str = "generate-animation-btn";
    pub const ANIMATION_PREVIEW: &str = "animation-preview";
    pub const REPLAY_BUTTON: &str = "replay-animation-btn";
    pub const SPINNER: &str = "loading-spinner";
}

pub(crate) fn element_as<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has the wrong type")))
}

fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document.get_element_by_id(id)?.dyn_into().ok()
}

pub(crate) fn input_value(document: &Document, id: &str) -> Option<String> {
    input(document, id).map(|el| el.value())
}

fn set_input_value(document: &Document, id: &str, value: &str) {
    if let Some(el) = input(document, id) {
        el.set_value(value);
    }
}

pub(crate) fn select_value(document: &Document, id: &str) -> Option<String> {
    let select: HtmlSelectElement = document.get_element_by_id(id)?.dyn_into().ok()?;
    Some(select.value())
}

/// Owns the parameter container and keeps its children in sync with the
/// form model.
pub(crate) struct FieldPresenter {
    document: Document,
    container: HtmlElement,
}

impl FieldPresenter {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let container = element_as::<HtmlElement>(document, ids::PARAMETERS_CONTAINER)?;
        Ok(Self {
            document: document.clone(),
            container,
        })
    }

    /// Clears the container and renders one labeled numeric input per
    /// field, two per row, in schema order. The input id is the parameter
    /// name, which is how [`read_into`](Self::read_into) finds it again.
    pub fn render(&self, form: &FormState) -> Result<(), JsValue> {
        self.container.set_inner_html("");

        for pair in form.fields().chunks(2) {
            let row = self.document.create_element("div")?;
            row.set_class_name("row mb-2");
            self.container.append_child(&row)?;

            for field in pair {
                let col = self.document.create_element("div")?;
                col.set_class_name("col");

                let label = self.document.create_element("label")?;
                label.set_class_name("form-label");
                label.set_text_content(Some(&format!("{}:", field.name())));

                let element = self.document.create_element("input")?;
                let input: HtmlInputElement = element
                    .dyn_into()
                    .map_err(|_| JsValue::from_str("created input has the wrong type"))?;
                input.set_type("number");
                input.set_class_name("form-control");
                input.set_id(field.name());
                input.set_value(field.entry());
                input.set_attribute("step", "0.1")?;

                col.append_child(&label)?;
                col.append_child(&input)?;
                row.append_child(&col)?;
            }
        }
        Ok(())
    }

    /// Copies the current DOM entries back into the form model. Inputs
    /// that disappeared from the page are simply skipped; the model keeps
    /// its seeded entry for them.
    pub fn read_into(&self, form: &mut FormState) {
        let names: Vec<String> = form
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        for name in names {
            if let Some(raw) = input_value(&self.document, &name) {
                form.set_entry(&name, raw);
            }
        }

        let min = input_value(&self.document, ids::SWEEP_MIN);
        let max = input_value(&self.document, ids::SWEEP_MAX);
        let step = input_value(&self.document, ids::SWEEP_STEP);
        if let Some(sweep) = form.sweep_mut() {
            if let Some(raw) = min {
                sweep.set_min(raw);
            }
            if let Some(raw) = max {
                sweep.set_max(raw);
            }
            if let Some(raw) = step {
                sweep.set_step(raw);
            }
        }
    }

    /// Writes the derived sweep range into the three auxiliary inputs.
    pub fn seed_sweep_inputs(&self, form: &FormState) {
        if let Some(sweep) = form.sweep() {
            set_input_value(&self.document, ids::SWEEP_MIN, sweep.min());
            set_input_value(&self.document, ids::SWEEP_MAX, sweep.max());
            set_input_value(&self.document, ids::SWEEP_STEP, sweep.step());
        }
    }

    /// Rebuilds the varying-parameter dropdown from `schema` and returns
    /// the selection that results (the first parameter), or `None` when
    /// the dropdown is absent or the schema is empty.
    pub fn populate_varying_options(
        &self,
        schema: &ParameterSchema,
    ) -> Result<Option<String>, JsValue> {
        let select: HtmlSelectElement = match self.document.get_element_by_id(ids::VARYING_PARAM) {
            Some(el) => el
                .dyn_into()
                .map_err(|_| JsValue::from_str("varying-param is not a <select>"))?,
            None => return Ok(None),
        };

        select.set_inner_html("");
        for name in schema.names() {
            let option = self.document.create_element("option")?;
            option.set_attribute("value", name)?;
            option.set_text_content(Some(name));
            select.append_child(&option)?;
        }
        Ok(schema.names().next().map(str::to_string))
    }
}

/// Shows or hides the loading spinner. Pages without one are left alone.
pub(crate) fn set_spinner(document: &Document, visible: bool) {
    if let Some(spinner) = document
        .get_element_by_id(ids::SPINNER)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let display = if visible { "block" } else { "none" };
        let _ = spinner.style().set_property("display", display);
    }
}

/// Points the media element at `url`. The caller has already appended the
/// cache-busting token.
pub(crate) fn show_media(document: &Document, media_id: &str, url: &str) {
    if let Some(media) = document
        .get_element_by_id(media_id)
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    {
        media.set_src(url);
    }
}

/// Forces the media element to reload its current artifact without a new
/// request: clear the source, then restore it.
pub(crate) fn replay_media(document: &Document, media_id: &str) {
    if let Some(media) = document
        .get_element_by_id(media_id)
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    {
        let current = media.src();
        media.set_src("");
        media.set_src(&current);
    }
}

/// Blocking operator-facing alert.
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
