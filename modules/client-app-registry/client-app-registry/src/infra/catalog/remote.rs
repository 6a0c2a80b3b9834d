//! RemoteCatalogClient - HTTP access to the client app catalog

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use client_app_registry_sdk::{CatalogError, ClientApp, ClientAppCatalog, ProtocolType};
use reqwest::StatusCode;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, instrument};

use crate::config::CatalogConfig;
use crate::domain::readiness::{ReadinessGate, ReadinessProbe};

/// Remote catalog client - HTTP requests to the catalog's client app endpoints
///
/// Readiness is published through the [`ReadinessGate`] passed at
/// construction and flipped by the bootstrap probe.
pub struct RemoteCatalogClient {
    base_url: String,
    http_client: reqwest::Client,
    auth_token: Option<String>,
    health_path: String,
    retry_interval: Duration,
    gate: ReadinessGate,
}

impl RemoteCatalogClient {
    /// Create a new client from `config`.
    ///
    /// # Errors
    /// Returns `CatalogError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig, gate: ReadinessGate) -> Result<Self, CatalogError> {
        debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout(),
            "Creating RemoteCatalogClient"
        );

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http_client,
            auth_token: config.auth_token.clone(),
            health_path: config.health_path.clone(),
            retry_interval: config.bootstrap_retry_interval(),
            gate,
        })
    }

    #[must_use]
    pub fn readiness(&self) -> ReadinessProbe {
        self.gate.probe()
    }

    /// Probe the catalog health endpoint once; mark the gate ready on a 2xx.
    ///
    /// Returns whether the catalog is ready.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn bootstrap_once(&self) -> bool {
        if self.gate.is_ready() {
            return true;
        }

        let url = format!("{}{}", self.base_url, self.health_path);
        match self.request(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                if self.gate.mark_ready() {
                    info!("Client app catalog is ready");
                }
                true
            }
            Ok(resp) => {
                debug!(status = %resp.status(), "Catalog health probe not successful yet");
                false
            }
            Err(e) => {
                debug!(error = %e, "Catalog health probe failed");
                false
            }
        }
    }

    /// Probe until the catalog is ready, waiting the configured interval
    /// between attempts.
    #[must_use = "dropping the handle stops the probe"]
    pub fn start_bootstrap(self: &Arc<Self>, runtime: &Handle) -> BootstrapHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let client = Arc::clone(self);

        let task = runtime.spawn(async move {
            loop {
                if client.bootstrap_once().await {
                    break;
                }
                tokio::select! {
                    () = cancelled.cancelled() => {
                        debug!("Catalog bootstrap cancelled");
                        break;
                    }
                    () = tokio::time::sleep(client.retry_interval) => {}
                }
            }
        });

        BootstrapHandle {
            guard: token.drop_guard(),
            task,
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http_client.get(url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET `url` and decode the JSON body. 404 yields `None`.
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Option<serde_json::Value>, CatalogError> {
        let resp = self
            .request(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, &e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url, "Client app not found");
            return Ok(None);
        }

        let body = resp.text().await.map_err(|e| map_reqwest_error(url, &e))?;
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| CatalogError::InvalidResponse(format!("{url}: {e}")))
    }

    async fn fetch_one(&self, url: &str) -> Result<Option<ClientApp>, CatalogError> {
        self.fetch(url).await?.map(decode_client_app).transpose()
    }
}

#[async_trait]
impl ClientAppCatalog for RemoteCatalogClient {
    fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    async fn list(&self) -> Result<Vec<ClientApp>, CatalogError> {
        let url = format!("{}/wa/clientApps", self.base_url);
        let body = self.fetch(&url).await?.ok_or_else(|| CatalogError::Http {
            status: StatusCode::NOT_FOUND.as_u16(),
            body: String::new(),
        })?;

        let serde_json::Value::Array(items) = body else {
            return Err(CatalogError::InvalidResponse(format!(
                "{url}: expected a JSON array of client apps"
            )));
        };
        items.into_iter().map(decode_client_app).collect()
    }

    async fn get_by_id(
        &self,
        id: i64,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError> {
        let url = with_type(format!("{}/wa/clientApps/{id}", self.base_url), protocol);
        self.fetch_one(&url).await
    }

    async fn get_by_name(
        &self,
        name: &str,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError> {
        let url = with_type(
            format!(
                "{}/wa/clientApps/byName/{}",
                self.base_url,
                urlencoding::encode(name)
            ),
            protocol,
        );
        self.fetch_one(&url).await
    }
}

impl std::fmt::Debug for RemoteCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCatalogClient")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("health_path", &self.health_path)
            .field("retry_interval", &self.retry_interval)
            .field("ready", &self.gate.is_ready())
            .finish_non_exhaustive()
    }
}

/// Running bootstrap probe. Dropping the handle stops the probe.
#[derive(Debug)]
pub struct BootstrapHandle {
    guard: DropGuard,
    task: JoinHandle<()>,
}

impl BootstrapHandle {
    /// Wait until the probe loop ends.
    ///
    /// The probe keeps running while this future is pending, so against a
    /// catalog that never turns healthy it never resolves. Bound it with
    /// `tokio::time::timeout`, or use [`BootstrapHandle::stop`].
    pub async fn finished(self) {
        let Self { guard, task } = self;
        join_probe(task).await;
        drop(guard);
    }

    /// Cancel the probe and wait for the loop to exit.
    ///
    /// Readiness already reached is kept.
    pub async fn stop(self) {
        let Self { guard, task } = self;
        guard.disarm().cancel();
        join_probe(task).await;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn join_probe(task: JoinHandle<()>) {
    if let Err(e) = task.await {
        error!(error = %e, "Catalog bootstrap task failed");
    }
}

fn with_type(url: String, protocol: Option<ProtocolType>) -> String {
    match protocol {
        Some(protocol) => format!("{url}?type={protocol}"),
        None => url,
    }
}

fn map_reqwest_error(url: &str, error: &reqwest::Error) -> CatalogError {
    if error.is_timeout() {
        CatalogError::Timeout(format!("{url}: {error}"))
    } else if error.is_connect() {
        CatalogError::Connection(format!("{url}: {error}"))
    } else if error.is_decode() {
        CatalogError::InvalidResponse(format!("{url}: {error}"))
    } else {
        CatalogError::Transport(format!("{url}: {error}"))
    }
}

/// Decode one record, rejecting protocol tags outside the supported set
/// before the typed decode.
fn decode_client_app(value: serde_json::Value) -> Result<ClientApp, CatalogError> {
    let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) else {
        return Err(CatalogError::InvalidResponse(format!(
            "client app record {} has no protocol type",
            value.get("id").unwrap_or(&serde_json::Value::Null)
        )));
    };

    if tag.parse::<ProtocolType>().is_err() {
        error!(
            tag,
            id = ?value.get("id"),
            "Catalog served a client app with an unsupported protocol type"
        );
        return Err(CatalogError::UnsupportedProtocol {
            tag: tag.to_owned(),
        });
    }

    serde_json::from_value(value).map_err(|e| CatalogError::InvalidResponse(e.to_string()))
}
