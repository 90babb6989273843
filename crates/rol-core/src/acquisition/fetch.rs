use crate::error::RolError;
use std::time::Duration;
use url::Url;

/// Status and body of a single GET.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchedResource {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP backends used by acquisition.
pub trait Fetcher: Send + Sync {
    /// Perform one GET with the given timeout. Non-success statuses are
    /// returned as responses; only transport failures are errors.
    fn get(&self, url: &Url, timeout: Duration) -> Result<FetchedResource, RolError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Blocking reqwest backend.
///
/// The client is built per call, so the fetcher can be held in async state
/// and only ever touched from blocking threads.
pub struct HttpFetcher {
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        HttpFetcher {
            user_agent: user_agent.into(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &Url, timeout: Duration) -> Result<FetchedResource, RolError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| RolError::Http(e.to_string()))?;

        let response = client
            .get(url.as_str())
            .send()
            .map_err(|e| RolError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| RolError::Http(e.to_string()))?
            .to_vec();

        Ok(FetchedResource { status, body })
    }

    fn backend_name(&self) -> &str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = FetchedResource {
            status: 200,
            body: vec![],
        };
        let no_content = FetchedResource {
            status: 204,
            body: vec![],
        };
        let missing = FetchedResource {
            status: 404,
            body: vec![],
        };
        assert!(ok.is_success());
        assert!(no_content.is_success());
        assert!(!missing.is_success());
    }
}
