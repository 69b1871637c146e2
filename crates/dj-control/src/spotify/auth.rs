//! OAuth 2 authorization code flow against the Spotify accounts service.

use super::SpotifyConfig;
use super::api::TokenResponse;
use crate::BackendError;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const SCOPES: &str = "user-modify-playback-state user-read-playback-state user-read-currently-playing user-read-private";

/// Tokens are renewed this long before they actually expire.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// A connection to the callback listener gets this long to send its
/// request before it is closed.
pub const CALLBACK_READ_TIMEOUT: Duration = Duration::from_secs(5);

const AUTHORIZED_PAGE: &str =
    "<html><body><h1>Authorized</h1><p>You can close this window.</p></body></html>";

/// An access token as kept in the token cache file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix time in seconds.
    pub expires_at: u64,
}

impl Token {
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_add(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    /// Build a token from a token endpoint answer. Refresh answers may omit
    /// the refresh token, in which case the previous one stays valid.
    pub fn from_response(response: TokenResponse, previous_refresh: Option<String>, now: u64) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now.saturating_add(response.expires_in),
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Read the token cache. A missing or unreadable cache is not an error.
pub fn load_token(path: &Path) -> Option<Token> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("no token cache at {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(token) => Some(token),
        Err(e) => {
            log::warn!("ignoring unreadable token cache {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_token(path: &Path, token: &Token) -> Result<(), BackendError> {
    let json = serde_json::to_string_pretty(token)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Page the user opens to grant access.
pub fn authorize_url(config: &SpotifyConfig, state: &str) -> Result<Url, BackendError> {
    Url::parse_with_params(
        &format!("{}/authorize", config.accounts_url.trim_end_matches('/')),
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", SCOPES),
            ("state", state),
        ],
    )
    .map_err(|e| BackendError::Auth(format!("invalid accounts url: {e}")))
}

/// Outcome of one request to the callback listener.
#[derive(Debug, PartialEq)]
pub enum Callback {
    /// The redirect carried an authorization code.
    Code(String),
    /// Something else (a favicon request, say); keep waiting.
    Ignored,
}

/// Interpret the request line of a redirect to `callback_path`, e.g.
/// `GET /callback?code=...&state=... HTTP/1.1`.
pub fn parse_callback(
    request_line: &str,
    callback_path: &str,
    expected_state: &str,
) -> Result<Callback, BackendError> {
    let mut parts = request_line.split_whitespace();
    let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
        return Ok(Callback::Ignored);
    };

    let url = Url::parse(&format!("http://localhost{target}"))
        .map_err(|e| BackendError::Auth(format!("bad callback request: {e}")))?;
    if url.path() != callback_path {
        return Ok(Callback::Ignored);
    }

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => return Err(BackendError::Auth(format!("access not granted: {value}"))),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(BackendError::Auth("callback state does not match".to_string()));
    }
    code.map(Callback::Code)
        .ok_or_else(|| BackendError::Auth("callback without authorization code".to_string()))
}

async fn answer(stream: &mut TcpStream, status: &str, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Read the request line and skip the headers.
async fn read_request(stream: TcpStream) -> std::io::Result<(String, TcpStream)> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header).await? == 0 || header.trim().is_empty() {
            break;
        }
    }
    Ok((request_line, reader.into_inner()))
}

/// Serve the redirect URI until the browser delivers the authorization
/// code.
///
/// Connections are served one at a time; one that has not sent its request
/// within `read_timeout` is dropped so it cannot hold up the redirect.
pub async fn wait_for_callback(
    listener: &TcpListener,
    callback_path: &str,
    expected_state: &str,
    read_timeout: Duration,
) -> Result<String, BackendError> {
    loop {
        let (stream, peer) = listener.accept().await?;

        let (request_line, mut stream) = match tokio::time::timeout(read_timeout, read_request(stream)).await {
            Ok(Ok(request)) => request,
            Ok(Err(e)) => {
                log::debug!("callback connection from {} failed: {}", peer, e);
                continue;
            }
            Err(_) => {
                log::debug!("callback connection from {} sent nothing, closing", peer);
                continue;
            }
        };

        match parse_callback(request_line.trim(), callback_path, expected_state) {
            Ok(Callback::Code(code)) => {
                answer(&mut stream, "200 OK", AUTHORIZED_PAGE).await.ok();
                return Ok(code);
            }
            Ok(Callback::Ignored) => {
                log::debug!("ignoring callback request from {}: {}", peer, request_line.trim());
                answer(&mut stream, "404 Not Found", "").await.ok();
            }
            Err(e) => {
                answer(&mut stream, "400 Bad Request", &e.to_string()).await.ok();
                return Err(e);
            }
        }
    }
}

async fn token_request(
    client: &Client,
    config: &SpotifyConfig,
    form: &[(&str, &str)],
) -> Result<TokenResponse, BackendError> {
    let url = format!("{}/api/token", config.accounts_url.trim_end_matches('/'));
    let response = client
        .post(url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::Auth(format!(
            "token request failed with status {}: {}",
            status.as_u16(),
            body
        )));
    }
    Ok(response.json().await?)
}

pub async fn exchange_code(client: &Client, config: &SpotifyConfig, code: &str) -> Result<Token, BackendError> {
    let response = token_request(
        client,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await?;
    Ok(Token::from_response(response, None, unix_now()))
}

pub async fn refresh(client: &Client, config: &SpotifyConfig, refresh_token: &str) -> Result<Token, BackendError> {
    let response = token_request(
        client,
        config,
        &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
    )
    .await?;
    Ok(Token::from_response(response, Some(refresh_token.to_string()), unix_now()))
}

/// Run the interactive flow: listen on the redirect URI, ask the user to
/// open the authorization page, and exchange the code it sends back.
pub async fn authorize_interactive(client: &Client, config: &SpotifyConfig) -> Result<Token, BackendError> {
    let redirect = Url::parse(&config.redirect_uri)
        .map_err(|e| BackendError::Auth(format!("invalid redirect uri {}: {e}", config.redirect_uri)))?;
    let host = redirect.host_str().unwrap_or("localhost").to_string();
    let port = redirect.port_or_known_default().unwrap_or(80);

    let listener = TcpListener::bind((host.as_str(), port)).await?;
    let state = format!("{:016x}", fastrand::u64(..));
    let url = authorize_url(config, &state)?;

    log::info!("Waiting for Spotify authorization on {}", config.redirect_uri);
    println!("Open this page to authorize gesture control of your Spotify account:\n\n  {url}\n");

    let code = tokio::time::timeout(
        config.auth_timeout,
        wait_for_callback(&listener, redirect.path(), &state, CALLBACK_READ_TIMEOUT),
    )
    .await
    .map_err(|_| BackendError::Auth("timed out waiting for authorization".to_string()))??;

    exchange_code(client, config, &code).await
}

/// Get a usable token: from the cache, by refreshing the cached one, or
/// through the interactive flow. New tokens are written back to the cache.
pub async fn authorize(client: &Client, config: &SpotifyConfig) -> Result<Token, BackendError> {
    if let Some(cached) = load_token(&config.token_cache) {
        if !cached.is_expired(unix_now()) {
            log::info!("Using cached Spotify token");
            return Ok(cached);
        }
        if let Some(refresh_token) = &cached.refresh_token {
            match refresh(client, config, refresh_token).await {
                Ok(token) => {
                    store(config, &token);
                    log::info!("Refreshed cached Spotify token");
                    return Ok(token);
                }
                Err(e) => log::warn!("could not refresh cached token: {}", e),
            }
        }
    }

    let token = authorize_interactive(client, config).await?;
    store(config, &token);
    Ok(token)
}

/// Write the token cache. Failing to cache only costs a new login.
pub fn store(config: &SpotifyConfig, token: &Token) {
    if let Err(e) = save_token(&config.token_cache, token) {
        log::warn!("could not write token cache {}: {}", config.token_cache.display(), e);
    }
}
