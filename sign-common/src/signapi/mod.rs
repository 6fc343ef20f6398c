use crate::{config::Api, slides::Slide};
use core::time::Duration;
use log::{debug, info, warn};
use reqwest::{
    Client, ClientBuilder, RequestBuilder, StatusCode,
    header::{ACCEPT, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod sign_config;

pub use sign_config::{RemoteDisplay, RemoteSchedule, RemoteSignConfig, SignConfigPayload};

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const SIGN_TOKEN_HEADER: &str = "X-Sign-Token";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}

/// Body of the slides endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidesResponse {
    #[serde(default)]
    pub generated_at: Option<String>,
    pub slides: Vec<Slide>,
}

pub struct SignApiClient {
    base_url: String,
    api_key: Option<String>,
    sign_token: Option<String>,
    date: Option<String>,
    client: Client,
}

impl SignApiClient {
    /// Every request made by the client is cancelled once `timeout` has elapsed.
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        sign_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = ClientBuilder::new().timeout(timeout).build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);

        Ok(Self {
            base_url,
            api_key: non_empty(api_key),
            sign_token: non_empty(sign_token),
            date: None,
            client,
        })
    }

    pub fn from_config(api: &Api) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            &api.base_url,
            Some(&api.api_key),
            Some(&api.sign_token),
            api.timeout(),
        )?
        .with_date(api.date.clone()))
    }

    /// Pins slide requests to one date (`YYYY-MM-DD`) instead of the server's "today".
    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date.filter(|d| !d.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        identified_request(&self.client, &url, &self.api_key, &self.sign_token)
    }

    pub fn get_slides(
        &self,
    ) -> impl std::future::Future<Output = Result<SlidesResponse, FetchError>> + Send + use<> {
        let mut request = self.request("slides");
        if let Some(date) = &self.date {
            request = request.query(&[("date", date)]);
        }
        info!("Fetching slides from {}/slides", self.base_url);

        async move {
            let response: SlidesResponse = get_json(request).await?;
            debug!(
                "Received {} slides (generated at {:?})",
                response.slides.len(),
                response.generated_at
            );
            Ok(response)
        }
    }

    pub fn get_sign_config(
        &self,
    ) -> impl std::future::Future<Output = Result<SignConfigPayload, FetchError>> + Send + use<>
    {
        let request = self.request("sign-config");
        debug!("Fetching sign config from {}/sign-config", self.base_url);
        get_json(request)
    }
}

fn identified_request(
    client: &Client,
    url: &str,
    api_key: &Option<String>,
    sign_token: &Option<String>,
) -> RequestBuilder {
    let mut request = client
        .get(url)
        .header(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        request = request.header(API_KEY_HEADER, key.as_str());
    }
    if let Some(token) = sign_token {
        request = request.header(SIGN_TOKEN_HEADER, token.as_str());
    }
    request
}

async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        warn!("Request to {} failed: {}", response.url(), response.status());
        return Err(FetchError::Status(response.status()));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::slides::STANDINGS;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    const SLIDES_BODY: &str = r#"{
        "generatedAt": "2024-09-14T12:00:00Z",
        "slides": [
            {"slideType": "standings", "teams": [
                {"rank": 1, "abbreviation": "HOU", "wins": 90, "losses": 72}
            ]},
            {"slideType": "bracket"}
        ]
    }"#;

    /// Answers exactly one HTTP request and hands back the raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
            }

            tokio::time::sleep(delay).await;

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&head).to_lowercase()
        });

        (format!("http://{addr}/"), handle)
    }

    fn client(base_url: &str, timeout: Duration) -> SignApiClient {
        SignApiClient::new(base_url, Some("secret"), Some("sign-7"), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_get_slides() {
        let _ = env_logger::builder().is_test(true).try_init();
        let (url, server) = serve_once("200 OK", SLIDES_BODY, Duration::ZERO).await;

        let client = client(&url, Duration::from_secs(5))
            .with_date(Some("2024-09-14".to_string()));
        let response = client.get_slides().await.unwrap();

        assert_eq!(response.generated_at.as_deref(), Some("2024-09-14T12:00:00Z"));
        assert_eq!(response.slides.len(), 2);
        assert_eq!(response.slides[0].slide_type(), STANDINGS);
        assert_eq!(response.slides[1].slide_type(), "bracket");

        let head = server.await.unwrap();
        assert!(head.starts_with("get /slides?date=2024-09-14 http/1.1"), "{head}");
        assert!(head.contains("accept: application/json"), "{head}");
        assert!(head.contains("x-api-key: secret"), "{head}");
        assert!(head.contains("x-sign-token: sign-7"), "{head}");
    }

    #[tokio::test]
    async fn test_empty_credentials_are_not_sent() {
        let (url, server) = serve_once("200 OK", r#"{"slides": []}"#, Duration::ZERO).await;

        let client = SignApiClient::new(&url, Some(""), None, Duration::from_secs(5)).unwrap();
        let response = client.get_slides().await.unwrap();
        assert!(response.slides.is_empty());

        let head = server.await.unwrap();
        assert!(head.starts_with("get /slides http/1.1"), "{head}");
        assert!(!head.contains("x-api-key"), "{head}");
        assert!(!head.contains("x-sign-token"), "{head}");
    }

    #[tokio::test]
    async fn test_error_status() {
        let (url, _server) =
            serve_once("503 Service Unavailable", "{}", Duration::ZERO).await;
        let res = client(&url, Duration::from_secs(5)).get_slides().await;
        assert!(matches!(
            res,
            Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn test_any_success_status() {
        let (url, _server) =
            serve_once("203 Non-Authoritative Information", SLIDES_BODY, Duration::ZERO).await;
        let response = client(&url, Duration::from_secs(5)).get_slides().await.unwrap();
        assert_eq!(response.slides.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (url, _server) = serve_once("200 OK", r#"{"slides": "#, Duration::ZERO).await;
        let res = client(&url, Duration::from_secs(5)).get_slides().await;
        assert!(matches!(res, Err(FetchError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let (url, _server) = serve_once("200 OK", SLIDES_BODY, Duration::from_secs(5)).await;
        let res = client(&url, Duration::from_millis(200)).get_slides().await;
        assert!(matches!(res, Err(FetchError::Timeout)), "{res:?}");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let res = client(&format!("http://{addr}"), Duration::from_secs(5))
            .get_slides()
            .await;
        assert!(matches!(res, Err(FetchError::Transport(_))), "{res:?}");
    }

    #[tokio::test]
    async fn test_get_sign_config() {
        let body = r#"{"payloadVersion": 2, "config": {"display": {"brightness": 40}}}"#;
        let (url, server) = serve_once("200 OK", body, Duration::ZERO).await;

        let payload = client(&url, Duration::from_secs(5))
            .get_sign_config()
            .await
            .unwrap();
        assert_eq!(payload.payload_version, 2);
        assert_eq!(payload.config.display.unwrap().brightness, Some(40));

        let head = server.await.unwrap();
        assert!(head.starts_with("get /sign-config http/1.1"), "{head}");
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = client("http://example.com/api/external///", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://example.com/api/external");
    }
}
