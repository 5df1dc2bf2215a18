use seed::{prelude::*, *};
use shared::{
    Attraction, QueryError, RouteRequest,
    gemini::{
        API_KEY_HEADER, BatchId, GenerateContentRequest, GenerateContentResponse,
        attractions_from_response,
    },
};
use wasm_bindgen::prelude::wasm_bindgen;

use crate::{config, logging};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

/// Asks Gemini for attractions between the two ends of `request`.
/// Exactly one HTTP call; nothing is cached or retried.
pub async fn find_attractions(request: RouteRequest) -> Result<Vec<Attraction>, QueryError> {
    let config = config::gemini()?;
    let body = GenerateContentRequest::for_route(&request);
    logging::debug(&format!(
        "querying {} for attractions between {:?} and {:?}",
        config.model(),
        request.start,
        request.end
    ));

    let response = Request::new(config.endpoint())
        .method(Method::Post)
        .header(Header::custom(API_KEY_HEADER, config.api_key()))
        .json(&body)
        .map_err(transport)?
        .fetch()
        .await
        .map_err(transport)?;

    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    if !status.is_ok() {
        return Err(QueryError::Status {
            status: status.code,
            message: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let decoded: GenerateContentResponse = serde_json::from_str(&text)?;
    let batch = BatchId::new(date_now() as u64);
    attractions_from_response(&decoded, &batch)
}

fn transport(err: FetchError) -> QueryError {
    QueryError::Transport(format!("{err:?}"))
}
