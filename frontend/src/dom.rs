use crate::api::{GlooClient, PREDICT_ENDPOINT};
use crate::controller::{BudgetView, Dropdown, FormController, FormSource};
use crate::form::FormSnapshot;
use crate::render::DisplayState;
use gloo_events::{EventListener, EventListenerOptions};
use shared::InterestFlag;
use std::rc::Rc;
use strum::IntoEnumIterator;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, FormData, HtmlElement, HtmlFormElement, HtmlOptionElement,
    HtmlSelectElement,
};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("no global `window` exists")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("element #{id} is not a {expected}")]
    WrongElement {
        id: &'static str,
        expected: &'static str,
    },
}

fn element<T: JsCast>(
    document: &Document,
    id: &'static str,
    expected: &'static str,
) -> Result<T, DomError> {
    document
        .get_element_by_id(id)
        .ok_or(DomError::MissingElement(id))?
        .dyn_into::<T>()
        .map_err(|_| DomError::WrongElement { id, expected })
}

/// Reads the prediction form through `FormData`.
pub struct DomForm {
    form: HtmlFormElement,
}

impl FormSource for DomForm {
    fn snapshot(&self) -> FormSnapshot {
        let data = match FormData::new_with_form(&self.form) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Failed to read form data: {:?}", e);
                return FormSnapshot::default();
            }
        };
        let text = |name: &str| -> Option<String> { data.get(name).as_string() };

        FormSnapshot {
            adults: text("adults"),
            children: text("children"),
            trip_duration: text("trip-duration"),
            country: text("country"),
            // Unchecked boxes are absent from FormData.
            interests: InterestFlag::iter()
                .filter(|flag| data.has(flag.name()))
                .collect(),
        }
    }
}

/// Result and error regions plus the two dropdowns, resolved once.
pub struct DomView {
    results: HtmlElement,
    hotel: HtmlElement,
    food: HtmlElement,
    activity: HtmlElement,
    parameters: HtmlElement,
    error: HtmlElement,
    country: HtmlSelectElement,
    trip_duration: HtmlSelectElement,
}

impl DomView {
    pub fn resolve(document: &Document) -> Result<Self, DomError> {
        Ok(Self {
            results: element(document, "results", "HTML element")?,
            hotel: element(document, "prediction-hotel", "HTML element")?,
            food: element(document, "prediction-food", "HTML element")?,
            activity: element(document, "prediction-activity", "HTML element")?,
            parameters: element(document, "model-parameters", "HTML element")?,
            error: element(document, "error-message", "HTML element")?,
            country: element(document, Dropdown::Country.element_id(), "select")?,
            trip_duration: element(document, Dropdown::TripDuration.element_id(), "select")?,
        })
    }
}

impl BudgetView for DomView {
    fn append_option(&self, dropdown: Dropdown, value: &str) {
        let select = match dropdown {
            Dropdown::Country => &self.country,
            Dropdown::TripDuration => &self.trip_duration,
        };

        let appended = HtmlOptionElement::new_with_text_and_value(value, value)
            .and_then(|option| select.append_child(&option));
        if let Err(e) = appended {
            log::error!("Failed to add option {:?} to #{}: {:?}", value, dropdown.element_id(), e);
        }
    }

    fn render(&self, state: &DisplayState) {
        match state {
            DisplayState::Hidden => {
                set_visible(&self.results, false);
                set_visible(&self.error, false);
            }
            DisplayState::Results(lines) => {
                self.hotel.set_text_content(Some(&lines.hotel));
                self.food.set_text_content(Some(&lines.food));
                self.activity.set_text_content(Some(&lines.activity));
                self.parameters.set_text_content(Some(&lines.parameters));
                set_visible(&self.error, false);
                set_visible(&self.results, true);
            }
            DisplayState::Error(message) => {
                self.error.set_text_content(Some(message));
                set_visible(&self.results, false);
                set_visible(&self.error, true);
            }
        }
    }
}

fn set_visible(element: &HtmlElement, visible: bool) {
    let display = if visible { "block" } else { "none" };
    if let Err(e) = element.style().set_property("display", display) {
        log::error!("Failed to set display on #{}: {:?}", element.id(), e);
    }
}

fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Attaches the controller once the document has been parsed.
pub fn mount() -> Result<(), DomError> {
    let window = web_sys::window().ok_or(DomError::NoWindow)?;
    let document = window.document().ok_or(DomError::NoDocument)?;

    if still_loading(&document.ready_state()) {
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| {
            if let Err(e) = attach(&document) {
                log::error!("Failed to attach prediction form: {}", e);
            }
        })
        .forget();
        return Ok(());
    }

    attach(&document)
}

fn attach(document: &Document) -> Result<(), DomError> {
    let form: HtmlFormElement = element(document, "prediction-form", "form")?;
    let view = DomView::resolve(document)?;

    let controller = Rc::new(FormController::new(
        GlooClient::new(PREDICT_ENDPOINT),
        DomForm { form: form.clone() },
        view,
    ));
    controller.populate_options();

    let listener = EventListener::new_with_options(
        &form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            let controller = Rc::clone(&controller);
            spawn_local(async move {
                controller.submit().await;
            });
        },
    );
    // The form lives as long as the page.
    listener.forget();

    log::info!("Prediction form attached");
    Ok(())
}
