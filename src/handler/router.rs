//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: resolves the route, reads the
//! form body when the action needs one, dispatches, and writes the access log.

use crate::config::AppState;
use crate::handler::routes::Route;
use crate::handler::squirrels;
use crate::http::{self, SquirrelForm};
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Instant;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Rc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = Route::resolve(&method, &path);

    let mut entry = AccessLogEntry::new(peer_addr.to_string(), method.to_string(), path.clone());
    entry.action = route.action();
    entry.http_version = version_label(req.version()).to_string();
    entry.user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = dispatch(route, req, &state).await;

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(route: Route<'_>, req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let form = if route.takes_form() {
        match read_form(req, state.config.http.max_body_size).await {
            Ok(form) => Some(form),
            Err(response) => return response,
        }
    } else {
        None
    };

    match (route, form) {
        (Route::List, _) => squirrels::list(state),
        (Route::Retrieve(id), _) => squirrels::retrieve(state, id),
        (Route::Create, Some(form)) => squirrels::create(state, &form),
        (Route::Update(id), Some(form)) => squirrels::update(state, id, &form),
        (Route::Delete(id), _) => squirrels::delete(state, id),
        _ => http::build_404_response(),
    }
}

/// Read and decode the form body, or produce the error response
async fn read_form<B>(req: Request<B>, max_body_size: u64) -> Result<SquirrelForm, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Err(resp);
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeded {max_body_size} bytes"));
            return Err(http::build_413_response(max_body_size));
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(http::build_error_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    SquirrelForm::parse(&body).map_err(|e| {
        logger::log_debug(&format!("Rejected form body: {e}"));
        http::build_error_response(StatusCode::BAD_REQUEST, &e.to_string())
    })
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(max_body_size))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
