//! Test doubles for the client app catalog.
//!
//! Enabled for unit tests and, through the `test-utils` feature, for
//! integration tests and downstream crates.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use client_app_registry_sdk::{
    CasSpDetails, CatalogError, ClientApp, ClientAppCatalog, ClientAppProtocol, OidcRpDetails,
    ProtocolType, Saml2SpDetails, SubjectType,
};

/// One remote call observed by [`MockCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    List,
    GetById(i64, Option<ProtocolType>),
    GetByName(String, Option<ProtocolType>),
}

/// In-memory catalog that records every remote call.
pub struct MockCatalog {
    ready: AtomicBool,
    apps: Vec<ClientApp>,
    filter_by_type: bool,
    failure: Option<CatalogError>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl MockCatalog {
    /// A ready catalog holding `apps` in the given order.
    #[must_use]
    pub fn new(apps: Vec<ClientApp>) -> Self {
        Self {
            ready: AtomicBool::new(true),
            apps,
            filter_by_type: true,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A catalog whose bootstrap has not completed yet.
    #[must_use]
    pub fn pending(apps: Vec<ClientApp>) -> Self {
        let catalog = Self::new(apps);
        catalog.ready.store(false, Ordering::Release);
        catalog
    }

    /// Every remote call fails with `error`.
    #[must_use]
    pub fn failing(error: CatalogError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(Vec::new())
        }
    }

    /// Serve typed fetches without checking the record's protocol, like a
    /// catalog that ignores the type parameter.
    #[must_use]
    pub fn ignoring_type_filter(mut self) -> Self {
        self.filter_by_type = false;
        self
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, call: CatalogCall) -> Result<(), CatalogError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn matches(&self, app: &ClientApp, protocol: Option<ProtocolType>) -> bool {
        !self.filter_by_type || protocol.is_none_or(|p| app.protocol_type() == p)
    }
}

#[async_trait]
impl ClientAppCatalog for MockCatalog {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn list(&self) -> Result<Vec<ClientApp>, CatalogError> {
        self.record(CatalogCall::List)?;
        Ok(self.apps.clone())
    }

    async fn get_by_id(
        &self,
        id: i64,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError> {
        self.record(CatalogCall::GetById(id, protocol))?;
        Ok(self
            .apps
            .iter()
            .find(|app| app.id == id && self.matches(app, protocol))
            .cloned())
    }

    async fn get_by_name(
        &self,
        name: &str,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError> {
        self.record(CatalogCall::GetByName(name.to_owned(), protocol))?;
        Ok(self
            .apps
            .iter()
            .find(|app| app.name == name && self.matches(app, protocol))
            .cloned())
    }
}

fn client_app(id: i64, name: &str, protocol: ClientAppProtocol) -> ClientApp {
    ClientApp {
        id,
        name: name.to_owned(),
        description: None,
        theme: None,
        logout_url: None,
        auth_policy: None,
        access_policy: None,
        attr_release_policy: None,
        properties: BTreeMap::new(),
        protocol,
    }
}

/// OIDC relying party with one redirect URI under `https://{name}.example.com`.
#[must_use]
pub fn oidc_app(id: i64, name: &str) -> ClientApp {
    client_app(
        id,
        name,
        ClientAppProtocol::OidcRp(OidcRpDetails {
            client_id: format!("{name}-client"),
            client_secret: Some(format!("{name}-secret")),
            redirect_uris: vec![format!("https://{name}.example.com/callback")],
            scopes: vec!["openid".to_owned()],
            sign_id_token: true,
            subject_type: SubjectType::Public,
            logout_uri: None,
        }),
    )
}

/// SAML2 service provider with entity id `urn:{name}:sp`.
#[must_use]
pub fn saml_app(id: i64, name: &str) -> ClientApp {
    client_app(
        id,
        name,
        ClientAppProtocol::Saml2Sp(Saml2SpDetails {
            entity_id: format!("urn:{name}:sp"),
            metadata_location: None,
            assertion_consumer_services: Vec::new(),
            sign_assertions: false,
            sign_responses: false,
            encrypt_assertions: false,
            required_name_id_format: None,
        }),
    )
}

/// CAS service matching `https://{name}.example.com/.*`.
#[must_use]
pub fn cas_app(id: i64, name: &str) -> ClientApp {
    client_app(
        id,
        name,
        ClientAppProtocol::CasSp(CasSpDetails {
            service_id: format!("https://{name}.example.com/.*"),
        }),
    )
}
