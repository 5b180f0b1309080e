//! Squirrel resource actions
//!
//! Each action opens a fresh storage backend, performs one operation and
//! maps the outcome onto a response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http::{self, SquirrelForm};
use crate::logger;
use crate::store::{SquirrelStore, StoreError};

type HttpResponse = Response<Full<Bytes>>;

/// Open a backend, run `op` against it, and turn store errors into responses
fn with_store<F>(state: &AppState, op: F) -> HttpResponse
where
    F: FnOnce(&mut dyn SquirrelStore) -> Result<HttpResponse, StoreError>,
{
    match state.store.open().and_then(|mut store| op(store.as_mut())) {
        Ok(response) => response,
        Err(e) => store_error_response(&e),
    }
}

fn store_error_response(error: &StoreError) -> HttpResponse {
    if error.is_not_found() {
        logger::log_debug(&error.to_string());
        http::build_404_response()
    } else {
        logger::log_error(&error.to_string());
        http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

pub fn list(state: &AppState) -> HttpResponse {
    with_store(state, |store| {
        let squirrels = store.list_all()?;
        Ok(http::build_json_response(StatusCode::OK, &squirrels))
    })
}

pub fn retrieve(state: &AppState, id: &str) -> HttpResponse {
    with_store(state, |store| {
        let squirrel = store.get_one(id)?;
        Ok(http::build_json_response(StatusCode::OK, &squirrel))
    })
}

/// 201 with a `Location` header pointing at the new record
pub fn create(state: &AppState, form: &SquirrelForm) -> HttpResponse {
    with_store(state, |store| {
        let id = store.create(&form.name, &form.size)?;
        Ok(Response::builder()
            .status(StatusCode::CREATED)
            .header("Location", format!("/squirrels/{id}"))
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| http::build_empty_response(StatusCode::CREATED)))
    })
}

pub fn update(state: &AppState, id: &str, form: &SquirrelForm) -> HttpResponse {
    with_store(state, |store| {
        store.update(id, &form.name, &form.size)?;
        Ok(http::build_empty_response(StatusCode::NO_CONTENT))
    })
}

pub fn delete(state: &AppState, id: &str) -> HttpResponse {
    with_store(state, |store| {
        store.delete(id)?;
        Ok(http::build_empty_response(StatusCode::NO_CONTENT))
    })
}
