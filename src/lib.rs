//! Native side of the Hacker News Android sample: resolves the best stories to titles over
//! HTTPS, trusting only the certificate handed in by the app.

pub mod config;
pub mod error;
pub mod hn_api;
pub mod http;
pub mod interop;
pub mod logging;

pub use error::{ErrorKind, FetchError};

fn client_for(cacert: &str) -> error::Result<http::ReqwestClient> {
    let trust_anchor = http::TrustAnchor::new(cacert)?;
    http::ReqwestClient::new(&trust_anchor, config::config().request_timeout)
}

/// Titles of the first [`hn_api::MAX_STORIES`] best stories, validated against `cacert`
/// (PEM text or the path of a PEM file).
pub fn get_titles(cacert: &str) -> error::Result<Vec<String>> {
    let client = client_for(cacert)?;
    hn_api::fetch_titles(&client, &hn_api::Endpoints::from_config(config::config()))
}

/// The pretty-printed best stories list, unparsed.
pub fn get_raw_best_stories(cacert: &str) -> error::Result<String> {
    let client = client_for(cacert)?;
    hn_api::fetch_raw_best_stories(&client, &hn_api::Endpoints::from_config(config::config()))
}
