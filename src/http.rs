use crate::error::{FetchError, Result};

/// Blocking GET returning the response body. Anything other than a 2xx answer is an error.
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<String>;
}

const PEM_CERTIFICATE_MARKER: &str = "-----BEGIN CERTIFICATE-----";

/// The certificate(s) outgoing requests are validated against.
///
/// The Android activity hands over the path of the `cacert.pem` it copied into its cache
/// directory, while other callers may pass the PEM text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustAnchor {
    Pem(String),
    Path(std::path::PathBuf),
}

impl TrustAnchor {
    pub fn new(arg: &str) -> Result<Self> {
        if arg.trim().is_empty() {
            return Err(FetchError::trust_anchor("cacert argument is empty"));
        }

        if arg.contains(PEM_CERTIFICATE_MARKER) {
            Ok(TrustAnchor::Pem(arg.to_string()))
        } else {
            Ok(TrustAnchor::Path(std::path::PathBuf::from(arg)))
        }
    }

    fn pem_bytes(&self) -> Result<Vec<u8>> {
        match self {
            TrustAnchor::Pem(pem) => Ok(pem.as_bytes().to_vec()),
            TrustAnchor::Path(path) => std::fs::read(path).map_err(|e| {
                FetchError::trust_anchor(format!("cannot read {}: {}", path.display(), e))
            }),
        }
    }

    fn certificates(&self) -> Result<Vec<reqwest::Certificate>> {
        let pem = self.pem_bytes()?;
        let certificates = reqwest::Certificate::from_pem_bundle(&pem)
            .map_err(|e| FetchError::trust_anchor(format!("malformed PEM: {}", e)))?;

        if certificates.is_empty() {
            return Err(FetchError::trust_anchor("no certificate found in PEM data"));
        }

        Ok(certificates)
    }
}

/// [`HttpClient`] backed by `reqwest::blocking`, trusting only the caller's anchor.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(trust_anchor: &TrustAnchor, timeout: std::time::Duration) -> Result<Self> {
        let certificates = trust_anchor.certificates()?;
        tracing::debug!(
            num_certificates = certificates.len(),
            "Loaded trust anchor certificates"
        );

        let mut builder = reqwest::blocking::Client::builder()
            .tls_built_in_root_certs(false)
            .timeout(timeout);
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }

        let inner = builder
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<String> {
        let response = self
            .inner
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Bodies are handed on byte for byte: non-UTF-8 is refused, never repaired.
        let body = response.bytes().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        String::from_utf8(body.to_vec()).map_err(|source| FetchError::Encoding {
            url: url.to_string(),
            source,
        })
    }
}
