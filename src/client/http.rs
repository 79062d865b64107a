use anyhow::{Context, Result};
#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::Mutex;

/// Access id / access key pair used for HTTP basic auth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_id: String,
    pub access_key: String,
}

impl Credentials {
    /// Build credentials only when both halves are present and non-empty
    pub fn from_parts(access_id: Option<&str>, access_key: Option<&str>) -> Option<Self> {
        match (access_id, access_key) {
            (Some(id), Some(key)) if !id.is_empty() && !key.is_empty() => Some(Self {
                access_id: id.to_string(),
                access_key: key.to_string(),
            }),
            _ => None,
        }
    }
}

/// Status code and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    /// GET `url` with the given query parameters
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse>;

    /// POST `url`, sending `body` as JSON when present
    fn post_json(&self, url: &str, body: Option<&serde_json::Value>) -> Result<HttpResponse>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    credentials: Option<Credentials>,
}

impl ReqwestClient {
    pub fn new(credentials: Option<Credentials>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("app-packager/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            credentials,
        })
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.access_id, Some(&creds.access_key)),
            None => request,
        }
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder, url: &str) -> Result<HttpResponse> {
        let response = self
            .authorize(request)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .with_context(|| format!("Failed to read response body from: {}", url))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let request = self.client.get(url).query(query);
        self.send(request, url)
    }

    fn post_json(&self, url: &str, body: Option<&serde_json::Value>) -> Result<HttpResponse> {
        let mut request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(payload) = body {
            request = request.body(serde_json::to_vec(payload)?);
        }

        self.send(request, url)
    }
}

/// A request seen by MockHttpClient
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Mock HTTP client serving queued responses per method and URL
#[cfg(test)]
pub struct MockHttpClient {
    responses: Mutex<HashMap<(&'static str, String), VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for a GET request
    pub fn on_get(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.enqueue("GET", url, HttpResponse::new(status, body));
    }

    /// Queue a response for a POST request
    pub fn on_post(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.enqueue("POST", url, HttpResponse::new(status, body));
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests sent to `url` (any method)
    pub fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn enqueue(&self, method: &'static str, url: &str, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    fn respond(&self, request: RecordedRequest) -> Result<HttpResponse> {
        let key = (request.method, request.url.clone());
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(&key)
            .with_context(|| format!("Unexpected request: {} {}", key.0, key.1))?;

        // The last queued response keeps answering once the queue drains
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap())
        } else {
            queue
                .front()
                .cloned()
                .with_context(|| format!("No response queued for {} {}", key.0, key.1))
        }
    }
}

#[cfg(test)]
impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl HttpClient for MockHttpClient {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        self.respond(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        })
    }

    fn post_json(&self, url: &str, body: Option<&serde_json::Value>) -> Result<HttpResponse> {
        self.respond(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            query: Vec::new(),
            body: body.cloned(),
        })
    }
}
