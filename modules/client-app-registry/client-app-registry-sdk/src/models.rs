//! Client application models.
//!
//! Two families of types live here:
//! - the records served by the remote catalog ([`ClientApp`] and its
//!   protocol-specific details), using the catalog's camelCase JSON encoding;
//! - the registered-service values handed to the authentication gateway
//!   ([`RegisteredService`] and its variants).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{UnknownCapability, UnknownProtocolType};

// ---------------------------------------------------------------------------
// Protocol type
// ---------------------------------------------------------------------------

/// Federation protocol of a client application.
///
/// Closed set: a new protocol needs a tag here, a record variant in
/// [`ClientAppProtocol`], a service variant in [`RegisteredService`] and a
/// mapping rule. Every `match` over this enum is exhaustive, so the compiler
/// points at each place to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolType {
    /// OpenID Connect relying party.
    #[serde(rename = "OIDCRP")]
    OidcRp,
    /// SAML 2.0 service provider.
    #[serde(rename = "SAML2SP")]
    Saml2Sp,
    /// Generic (CAS protocol) service matched by URL pattern only.
    #[serde(rename = "CASSP")]
    CasSp,
}

impl ProtocolType {
    /// All supported protocol types.
    pub const ALL: [Self; 3] = [Self::OidcRp, Self::Saml2Sp, Self::CasSp];

    /// Wire tag used by the remote catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OidcRp => "OIDCRP",
            Self::Saml2Sp => "SAML2SP",
            Self::CasSp => "CASSP",
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolType {
    type Err = UnknownProtocolType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProtocolType(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Capability descriptor supplied by the gateway for a type-qualified lookup.
///
/// Each descriptor names the kind of registered service the caller can work
/// with. [`Capability::protocol_type`] resolves it to the single protocol
/// whose records provide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Any registered service. Every protocol satisfies it.
    Any,
    /// OAuth client semantics. Only OIDC relying parties provide it.
    OAuthClient,
    /// OpenID Connect relying party.
    OidcRelyingParty,
    /// SAML 2.0 service provider.
    Saml2ServiceProvider,
    /// Generic CAS service.
    CasService,
}

impl Capability {
    /// Resolve the descriptor to exactly one protocol type.
    ///
    /// Returns `None` when no single protocol matches: `Any` is satisfied by
    /// every protocol, so a lookup constrained by it cannot pick a type.
    #[must_use]
    pub const fn protocol_type(self) -> Option<ProtocolType> {
        match self {
            Self::OAuthClient | Self::OidcRelyingParty => Some(ProtocolType::OidcRp),
            Self::Saml2ServiceProvider => Some(ProtocolType::Saml2Sp),
            Self::CasService => Some(ProtocolType::CasSp),
            Self::Any => None,
        }
    }

    /// Whether a service of the given protocol can be handed to a caller
    /// asking for this capability.
    #[must_use]
    pub fn is_satisfied_by(self, protocol: ProtocolType) -> bool {
        match self {
            Self::Any => true,
            _ => self.protocol_type() == Some(protocol),
        }
    }

    /// Canonical descriptor name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::OAuthClient => "oauth",
            Self::OidcRelyingParty => "oidc",
            Self::Saml2ServiceProvider => "saml2",
            Self::CasService => "cas",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "registered-service" => Ok(Self::Any),
            "oauth" | "oauth-client" => Ok(Self::OAuthClient),
            "oidc" | "oidc-relying-party" => Ok(Self::OidcRelyingParty),
            "saml2" | "saml2-service-provider" => Ok(Self::Saml2ServiceProvider),
            "cas" | "cas-service" => Ok(Self::CasService),
            _ => Err(UnknownCapability(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote catalog records
// ---------------------------------------------------------------------------

/// Client application record as served by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientApp {
    /// Numeric identifier, unique across the catalog.
    pub id: i64,
    /// Unique name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_release_policy: Option<String>,
    /// Free-form custom properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    /// Protocol tag (`type`) together with the protocol-specific attributes.
    #[serde(flatten)]
    pub protocol: ClientAppProtocol,
}

impl ClientApp {
    /// Protocol tag of this record.
    #[must_use]
    pub const fn protocol_type(&self) -> ProtocolType {
        self.protocol.protocol_type()
    }
}

/// Protocol-specific part of a [`ClientApp`], keyed by the `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientAppProtocol {
    #[serde(rename = "OIDCRP")]
    OidcRp(OidcRpDetails),
    #[serde(rename = "SAML2SP")]
    Saml2Sp(Saml2SpDetails),
    #[serde(rename = "CASSP")]
    CasSp(CasSpDetails),
}

impl ClientAppProtocol {
    #[must_use]
    pub const fn protocol_type(&self) -> ProtocolType {
        match self {
            Self::OidcRp(_) => ProtocolType::OidcRp,
            Self::Saml2Sp(_) => ProtocolType::Saml2Sp,
            Self::CasSp(_) => ProtocolType::CasSp,
        }
    }
}

/// OIDC relying-party attributes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcRpDetails {
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub sign_id_token: bool,
    #[serde(default)]
    pub subject_type: SubjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_uri: Option<String>,
}

impl fmt::Debug for OidcRpDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcRpDetails")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uris", &self.redirect_uris)
            .field("scopes", &self.scopes)
            .field("sign_id_token", &self.sign_id_token)
            .field("subject_type", &self.subject_type)
            .field("logout_uri", &self.logout_uri)
            .finish()
    }
}

/// OIDC subject identifier type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectType {
    #[default]
    Public,
    Pairwise,
}

/// SAML 2.0 service-provider attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saml2SpDetails {
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_location: Option<String>,
    #[serde(default)]
    pub assertion_consumer_services: Vec<AssertionConsumerService>,
    #[serde(default)]
    pub sign_assertions: bool,
    #[serde(default)]
    pub sign_responses: bool,
    #[serde(default)]
    pub encrypt_assertions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_name_id_format: Option<String>,
}

/// SAML assertion consumer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionConsumerService {
    pub binding: String,
    pub location: String,
    #[serde(default)]
    pub index: u32,
}

/// CAS service attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasSpDetails {
    /// Service URL pattern.
    pub service_id: String,
}

// ---------------------------------------------------------------------------
// Registered services
// ---------------------------------------------------------------------------

/// Attributes shared by every registered-service variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHeader {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Pattern the gateway matches incoming service URLs against.
    pub service_id: String,
    pub theme: Option<String>,
    pub logout_url: Option<String>,
    pub auth_policy: Option<String>,
    pub access_policy: Option<String>,
    pub attr_release_policy: Option<String>,
    pub properties: BTreeMap<String, String>,
}

/// Registered service for an OIDC relying party.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct OidcRegisteredService {
    pub header: ServiceHeader,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uris: Vec<String>,
    pub scopes: Vec<String>,
    pub sign_id_token: bool,
    pub subject_type: SubjectType,
    pub logout_uri: Option<String>,
}

impl fmt::Debug for OidcRegisteredService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcRegisteredService")
            .field("header", &self.header)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uris", &self.redirect_uris)
            .field("scopes", &self.scopes)
            .field("sign_id_token", &self.sign_id_token)
            .field("subject_type", &self.subject_type)
            .field("logout_uri", &self.logout_uri)
            .finish()
    }
}

/// Registered service for a SAML 2.0 service provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamlRegisteredService {
    pub header: ServiceHeader,
    pub entity_id: String,
    pub metadata_location: Option<String>,
    pub assertion_consumer_services: Vec<AssertionConsumerService>,
    pub sign_assertions: bool,
    pub sign_responses: bool,
    pub encrypt_assertions: bool,
    pub required_name_id_format: Option<String>,
}

/// Generic registered service, matched by URL pattern only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CasRegisteredService {
    pub header: ServiceHeader,
}

/// Registered service handed to the authentication gateway.
///
/// A snapshot of one catalog record at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "protocol")]
pub enum RegisteredService {
    Oidc(OidcRegisteredService),
    Saml2(SamlRegisteredService),
    Generic(CasRegisteredService),
}

impl RegisteredService {
    #[must_use]
    pub const fn header(&self) -> &ServiceHeader {
        match self {
            Self::Oidc(s) => &s.header,
            Self::Saml2(s) => &s.header,
            Self::Generic(s) => &s.header,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.header().id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.header().name
    }

    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.header().service_id
    }

    #[must_use]
    pub const fn protocol_type(&self) -> ProtocolType {
        match self {
            Self::Oidc(_) => ProtocolType::OidcRp,
            Self::Saml2(_) => ProtocolType::Saml2Sp,
            Self::Generic(_) => ProtocolType::CasSp,
        }
    }

    #[must_use]
    pub const fn as_oidc(&self) -> Option<&OidcRegisteredService> {
        match self {
            Self::Oidc(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_saml2(&self) -> Option<&SamlRegisteredService> {
        match self {
            Self::Saml2(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_generic(&self) -> Option<&CasRegisteredService> {
        match self {
            Self::Generic(s) => Some(s),
            _ => None,
        }
    }
}
