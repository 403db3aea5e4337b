use crate::form::{FormSnapshot, ValidationError};
use crate::render::{BudgetLines, DisplayState, FAILURE_PREFIX};
use serde_json::Value;
use shared::{COUNTRIES, PredictedBudgets, PredictionRequest, PredictionResponse, TRIP_DURATIONS};
use std::cell::Cell;
use thiserror::Error;

/// Status and body of a finished HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a prediction request. `Err` carries the transport failure message.
#[allow(async_fn_in_trait)]
pub trait PredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<HttpReply, String>;
}

pub trait FormSource {
    fn snapshot(&self) -> FormSnapshot;
}

pub trait BudgetView {
    fn append_option(&self, dropdown: Dropdown, value: &str);
    fn render(&self, state: &DisplayState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Country,
    TripDuration,
}

impl Dropdown {
    pub fn element_id(self) -> &'static str {
        match self {
            Dropdown::Country => "country",
            Dropdown::TripDuration => "trip-duration",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        match self {
            Dropdown::Country => &COUNTRIES,
            Dropdown::TripDuration => &TRIP_DURATIONS,
        }
    }
}

/// Why a prediction could not be shown. Display is the reason text that
/// follows "Prediction failed: ".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("{0}")]
    Network(String),
    #[error("{reason}")]
    Server { status: u16, reason: String },
    #[error("{0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(ValidationError),
    Succeeded(BudgetLines),
    Failed(PredictionError),
    /// A newer submission started while this one was waiting.
    Superseded,
}

pub struct FormController<C, F, V> {
    client: C,
    form: F,
    view: V,
    populated: Cell<bool>,
    generation: Cell<u64>,
}

impl<C, F, V> FormController<C, F, V>
where
    C: PredictionClient,
    F: FormSource,
    V: BudgetView,
{
    pub fn new(client: C, form: F, view: V) -> Self {
        Self {
            client,
            form,
            view,
            populated: Cell::new(false),
            generation: Cell::new(0),
        }
    }

    /// Fills both dropdowns. Returns `false` if they were already filled.
    pub fn populate_options(&self) -> bool {
        if self.populated.replace(true) {
            log::warn!("Dropdowns already populated, skipping");
            return false;
        }

        for dropdown in [Dropdown::Country, Dropdown::TripDuration] {
            for value in dropdown.options() {
                self.view.append_option(dropdown, value);
            }
        }
        true
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        self.view.render(&DisplayState::Hidden);

        let request = match self.form.snapshot().to_request() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected form input: {}", e);
                self.view.render(&DisplayState::Error(e.to_string()));
                return SubmitOutcome::Rejected(e);
            }
        };

        log::info!(
            "Sending data: {}",
            serde_json::to_string(&request).unwrap_or_default()
        );

        let result = self.request_budgets(&request).await;

        if generation != self.generation.get() {
            log::warn!(
                "Discarding response for submission {} (latest is {})",
                generation,
                self.generation.get()
            );
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(budgets) => {
                let lines = BudgetLines::new(&request, &budgets);
                self.view.render(&DisplayState::Results(lines.clone()));
                SubmitOutcome::Succeeded(lines)
            }
            Err(e) => {
                log::error!("Error: {:?}", e);
                self.view
                    .render(&DisplayState::Error(format!("{}{}", FAILURE_PREFIX, e)));
                SubmitOutcome::Failed(e)
            }
        }
    }

    async fn request_budgets(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictedBudgets, PredictionError> {
        let reply = self
            .client
            .predict(request)
            .await
            .map_err(PredictionError::Network)?;

        if !reply.ok() {
            return Err(server_error(&reply));
        }

        let response: PredictionResponse = serde_json::from_str(&reply.body)
            .map_err(|e| PredictionError::MalformedResponse(e.to_string()))?;
        log::info!("Prediction result: {:?}", response.predicted_budgets);

        Ok(response.predicted_budgets)
    }
}

fn server_error(reply: &HttpReply) -> PredictionError {
    let reason = serde_json::from_str::<Value>(&reply.body)
        .ok()
        .and_then(|body| {
            body.get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("HTTP error! status: {}", reply.status));

    PredictionError::Server {
        status: reply.status,
        reason,
    }
}
