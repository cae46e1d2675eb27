use std::collections::HashMap;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{ALLOW, CONTENT_TYPE, SERVER};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hashfs_resolve::{Dispatcher, Request};

/// Shared by every request.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// Value of the `server` header on every response.
    pub name: HeaderValue,
}

/// Every path goes through the dispatcher.
pub async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
        return with_server_name(response, &state);
    }

    let request = transport_request(&uri, &headers);
    let reply = state.dispatcher.dispatch(&request).await;
    let mut response = to_http(&state, reply).await;
    if method == Method::HEAD {
        *response.body_mut() = Body::empty();
    }
    with_server_name(response, &state)
}

fn transport_request(uri: &Uri, headers: &HeaderMap) -> Request {
    let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let head: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect();
    Request {
        uri: target.to_string(),
        head,
    }
}

async fn to_http(state: &AppState, reply: hashfs_resolve::Response) -> Response {
    let status = StatusCode::from_u16(reply.status()).unwrap_or(StatusCode::BAD_REQUEST);

    let body = match reply.hash {
        Some(hash) => match state.dispatcher.codec().store().fetch(&hash).await {
            Ok(Some(bytes)) => Body::from(bytes),
            Ok(None) => {
                tracing::warn!(%hash, "referenced blob is missing");
                return plain(StatusCode::NOT_FOUND, format!("blob {hash} not found"));
            }
            Err(err) => {
                tracing::warn!(%hash, error = %err, "blob fetch failed");
                return plain(StatusCode::BAD_REQUEST, err.to_string());
            }
        },
        None => Body::from(reply.body.unwrap_or_default()),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    for (name, value) in &reply.head {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "dropping unrepresentable response header"),
        }
    }
    response
}

fn plain(status: StatusCode, text: String) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain"))],
        text,
    )
        .into_response()
}

fn with_server_name(mut response: Response, state: &AppState) -> Response {
    response.headers_mut().insert(SERVER, state.name.clone());
    response
}
