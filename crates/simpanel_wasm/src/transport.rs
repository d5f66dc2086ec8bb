//! The fetch boundary: one JSON POST per submission, no retries.
//!
//! The browser promise plumbing lives here so the panel layer only ever
//! sees `Result<JsValue, String>`: the decoded response JSON, or a
//! transport failure message. Completion is delivered exactly once, even
//! though success and failure arrive through different callbacks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AbortController, Request, RequestInit, Response};

type Done = Rc<RefCell<Option<Box<dyn FnOnce(Result<JsValue, String>)>>>>;

fn finish(done: &Done, outcome: Result<JsValue, String>) {
    if let Some(callback) = done.borrow_mut().take() {
        callback(outcome);
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// POSTs `body` to `endpoint` with a JSON content type and hands the
/// decoded response JSON to `on_done`. The request is aborted after
/// `timeout_ms`, surfacing as a transport failure, so a dead server can
/// never leave the caller waiting.
pub(crate) fn post_json(
    endpoint: &str,
    body: &str,
    timeout_ms: i32,
    on_done: impl FnOnce(Result<JsValue, String>) + 'static,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let controller = AbortController::new()?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));
    init.set_signal(Some(&controller.signal()));
    let request = Request::new_with_str_and_init(endpoint, &init)?;
    request.headers().set("Content-Type", "application/json")?;

    // Arm the timeout. Firing aborts the fetch, which then rejects; the
    // flag distinguishes that rejection from a genuine network failure.
    let timed_out = Rc::new(Cell::new(false));
    let abort_cb = {
        let timed_out = Rc::clone(&timed_out);
        let controller = controller.clone();
        Closure::wrap(Box::new(move || {
            timed_out.set(true);
            controller.abort();
        }) as Box<dyn FnMut()>)
    };
    let timeout_handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        abort_cb.as_ref().unchecked_ref(),
        timeout_ms,
    )?;
    abort_cb.forget();

    let done: Done = Rc::new(RefCell::new(Some(Box::new(on_done))));

    let resolve_cb = {
        let done = Rc::clone(&done);
        let window = window.clone();
        Closure::wrap(Box::new(move |value: JsValue| {
            window.clear_timeout_with_handle(timeout_handle);
            let response: Response = match value.dyn_into() {
                Ok(response) => response,
                Err(other) => {
                    let message = format!("fetch resolved without a response: {}", describe(&other));
                    finish(&done, Err(message));
                    return;
                }
            };
            let json_promise = match response.json() {
                Ok(promise) => promise,
                Err(err) => {
                    finish(&done, Err(describe(&err)));
                    return;
                }
            };

            let json_ok = {
                let done = Rc::clone(&done);
                Closure::wrap(
                    Box::new(move |json: JsValue| finish(&done, Ok(json))) as Box<dyn FnMut(_)>
                )
            };
            let json_err = {
                let done = Rc::clone(&done);
                Closure::wrap(Box::new(move |err: JsValue| {
                    let message = format!("response body is not JSON: {}", describe(&err));
                    finish(&done, Err(message));
                }) as Box<dyn FnMut(_)>)
            };
            let _ = json_promise.then2(&json_ok, &json_err);
            json_ok.forget();
            json_err.forget();
        }) as Box<dyn FnMut(_)>)
    };

    let reject_cb = {
        let done = Rc::clone(&done);
        let window = window.clone();
        let timed_out = Rc::clone(&timed_out);
        Closure::wrap(Box::new(move |err: JsValue| {
            window.clear_timeout_with_handle(timeout_handle);
            let message = if timed_out.get() {
                format!("request timed out after {timeout_ms} ms")
            } else {
                describe(&err)
            };
            finish(&done, Err(message));
        }) as Box<dyn FnMut(_)>)
    };

    let _ = window
        .fetch_with_request(&request)
        .then2(&resolve_cb, &reject_cb);
    resolve_cb.forget();
    reject_cb.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_arch = "wasm32")]
    fn post_json_arms_without_error() {
        // No server behind the endpoint; only the setup path is checked
        // here. The completion callback fires later with a failure.
        let result = post_json("/simulate/", "{}", 1_000, |_| {});
        assert!(result.is_ok(), "expected the request to arm");
    }

    // Runs natively: `finish` never touches the JS heap on the error path.
    #[test]
    fn completion_is_delivered_once() {
        let calls = Rc::new(Cell::new(0));
        let done: Done = {
            let calls = Rc::clone(&calls);
            Rc::new(RefCell::new(Some(Box::new(move |_| {
                calls.set(calls.get() + 1);
            }))))
        };
        finish(&done, Err("first".to_string()));
        finish(&done, Err("second".to_string()));
        assert_eq!(calls.get(), 1);
    }
}
