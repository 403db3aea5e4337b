use actix_files::Files;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde_json::Value;
use shared::{ErrorResponse, PredictionResponse};
use crate::features::parse_features;
use crate::model::BudgetModel;

const MODEL_NOT_LOADED: &str = "Model or preprocessor not loaded. Check server logs.";
const PREDICTION_FAILED: &str = "An error occurred during prediction.";

/// `None` when the artifact could not be loaded at startup.
pub type LoadedModel = Option<BudgetModel>;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)));
}

fn error_json(mut builder: actix_web::HttpResponseBuilder, message: impl Into<String>) -> HttpResponse {
    builder.json(ErrorResponse { error: message.into() })
}

// The body is read as JSON whatever the content type says.
async fn predict(model: web::Data<LoadedModel>, body: web::Bytes) -> HttpResponse {
    let Some(model) = model.get_ref() else {
        error!("Prediction requested but no model is loaded");
        return error_json(HttpResponse::InternalServerError(), MODEL_NOT_LOADED);
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Prediction error: {}", e);
            return error_json(HttpResponse::InternalServerError(), PREDICTION_FAILED);
        }
    };
    info!("Received data: {}", payload);

    let features = match parse_features(&payload) {
        Ok(features) => features,
        Err(e) => {
            warn!("Rejected prediction request: {}", e);
            return error_json(HttpResponse::BadRequest(), e.to_string());
        }
    };

    match model.predict(&features) {
        Ok(predicted_budgets) => {
            info!("Prediction: {:?}", predicted_budgets);
            HttpResponse::Ok().json(PredictionResponse { predicted_budgets })
        }
        Err(e) => {
            error!("Prediction error: {}", e);
            error_json(HttpResponse::InternalServerError(), PREDICTION_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{sample_model, SAMPLE_ARTIFACT};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;

    fn body() -> Value {
        json!({
            "# Adults": 2,
            "# Children & Babies": 1,
            "Trip Duration Category": "Long (7-10 days)",
            "Country": "Spain",
            "Theme Parks": 1,
            "Hidden Gems": 0,
            "Cultural Attractions": 0,
            "Beach or Pools": 0,
            "Sunset Spots": 0,
            "Nature Getaway": 0
        })
    }

    async fn call(model: LoadedModel, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(model))
                .configure(configure_api),
        )
        .await;
        let response = test::call_service(&app, request.uri("/predict").to_request()).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    #[actix_web::test]
    async fn predicts_budgets() {
        let (status, body) =
            call(Some(sample_model()), test::TestRequest::post().set_json(body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "predicted_budgets": {
                    "Hotel Budget in EUR": 520.0,
                    "Food Budget in EUR": 90.0,
                    "Activity Budget in EUR": 65.0
                }
            })
        );
    }

    #[actix_web::test]
    async fn accepts_json_without_content_type() {
        let request = test::TestRequest::post().set_payload(body().to_string());
        let (status, _) = call(Some(sample_model()), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_features_are_a_bad_request() {
        let mut payload = body();
        payload.as_object_mut().unwrap().remove("Country");

        let (status, body) =
            call(Some(sample_model()), test::TestRequest::post().set_json(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing features: Country" }));
    }

    #[actix_web::test]
    async fn invalid_numbers_are_a_bad_request() {
        let mut payload = body();
        payload["# Children & Babies"] = json!("several");

        let (status, body) =
            call(Some(sample_model()), test::TestRequest::post().set_json(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid numeric input detected.");
    }

    #[actix_web::test]
    async fn unloaded_model_is_a_server_error() {
        let (status, body) = call(None, test::TestRequest::post().set_json(body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], MODEL_NOT_LOADED);
    }

    #[actix_web::test]
    async fn unparsable_body_is_a_server_error() {
        let request = test::TestRequest::post().set_payload("{not json");
        let (status, body) = call(Some(sample_model()), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PREDICTION_FAILED);
    }

    #[actix_web::test]
    async fn model_feature_mismatch_is_a_server_error() {
        let artifact = SAMPLE_ARTIFACT.replace("Nature Getaway", "Ski Slopes");
        let model = BudgetModel::from_yaml(&artifact).unwrap();

        let (status, body) = call(Some(model), test::TestRequest::post().set_json(body())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PREDICTION_FAILED);
    }

    #[actix_web::test]
    async fn serves_frontend_next_to_the_api() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Travel Budget Predictor</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "mount();").unwrap();
        let frontend_dir = dir.path().to_string_lossy().into_owned();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Some(sample_model())))
                .configure(|cfg| configure_routes(cfg, frontend_dir)),
        )
        .await;

        let index = test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(index, "<h1>Travel Budget Predictor</h1>");

        let script =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/app.js").to_request()).await;
        assert_eq!(script, "mount();");

        let request = test::TestRequest::post().uri("/predict").set_json(body()).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let budgets: Value = test::read_body_json(response).await;
        assert_eq!(budgets["predicted_budgets"]["Hotel Budget in EUR"], 520.0);
    }
}
