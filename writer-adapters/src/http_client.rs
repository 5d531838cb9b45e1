use std::sync::Arc;

use hyper::body::{Bytes, to_bytes};
use hyper::client::HttpConnector;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{Body, Client, Request, StatusCode, Uri};
use hyper_rustls::HttpsConnector;
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use serde::Serialize;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::traits::{AdapterError, AdapterResult};

pub(crate) type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Status and raw body of a provider response.
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: Bytes,
}

#[allow(clippy::unnecessary_wraps)]
pub(crate) fn build_https_client() -> AdapterResult<HyperClient> {
    let mut roots = RootCertStore::empty();
    roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            anchor.subject,
            anchor.spki,
            anchor.name_constraints,
        )
    }));

    let config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let connector = HttpsConnector::from((http, Arc::new(config)));

    Ok(Client::builder().build::<_, Body>(connector))
}

/// Sends one JSON POST and buffers the response body.
///
/// Only failures to get a complete response are errors; non-2xx statuses are
/// returned to the caller for classification.
pub(crate) async fn post_json<T: Serialize>(
    client: &HyperClient,
    endpoint: &Uri,
    headers: &[(HeaderName, HeaderValue)],
    payload: &T,
) -> AdapterResult<RawResponse> {
    let body = serde_json::to_vec(payload)
        .map_err(|err| AdapterError::invalid_request(format!("failed to encode request: {err}")))?;

    let mut builder = Request::post(endpoint.clone()).header(CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    let request = builder
        .body(Body::from(body))
        .map_err(|err| AdapterError::invalid_request(format!("failed to build request: {err}")))?;

    let response = client
        .request(request)
        .await
        .map_err(|err| AdapterError::transport(format!("request failed: {err}")))?;

    let status = response.status();
    let body = to_bytes(response.into_body())
        .await
        .map_err(|err| AdapterError::transport(format!("failed to read response: {err}")))?;

    Ok(RawResponse { status, body })
}
