use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use warp::Filter;
use warp::http::StatusCode;

use game_core::WordValidator;
use game_types::{TodaysWord, ValidateWordRequest, ValidateWordResponse};

#[derive(Debug, Deserialize)]
struct WordQuery {
    date: Option<NaiveDate>,
}

/// HTTP face of a dictionary: `GET /word`, `POST /validate`, `GET /health`.
pub fn word_service_routes(
    validator: Arc<WordValidator>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let validator_filter = warp::any().map(move || validator.clone());

    let todays_word = warp::path("word")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<WordQuery>())
        .and(validator_filter.clone())
        .map(handle_word_request);

    let validate = warp::path("validate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<ValidateWordRequest>())
        .and(validator_filter)
        .map(handle_validate_request);

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    todays_word.or(validate).or(health)
}

fn handle_word_request(
    query: WordQuery,
    validator: Arc<WordValidator>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let date = query
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match validator.word_for_day(date) {
        Ok(word) => warp::reply::with_status(
            warp::reply::json(&TodaysWord { word }),
            StatusCode::OK,
        ),
        Err(e) => {
            tracing::error!("Cannot pick a word for {}: {}", date, e);
            no_words_available()
        }
    }
}

fn handle_validate_request(
    request: ValidateWordRequest,
    validator: Arc<WordValidator>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    if validator.is_empty() {
        tracing::error!("Cannot validate {:?}: dictionary is empty", request.word);
        return no_words_available();
    }

    warp::reply::with_status(
        warp::reply::json(&ValidateWordResponse {
            is_valid: validator.is_valid_word(&request.word),
        }),
        StatusCode::OK,
    )
}

fn no_words_available() -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": "No words available"
        })),
        StatusCode::SERVICE_UNAVAILABLE,
    )
}
