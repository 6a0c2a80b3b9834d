//! Catalog record to registered-service mapping.

use client_app_registry_sdk::{
    CasRegisteredService, ClientApp, ClientAppProtocol, OidcRegisteredService, RegisteredService,
    SamlRegisteredService, ServiceHeader,
};

/// Map one catalog record to the registered service of its protocol.
///
/// Identity, name and protocol attributes are copied verbatim. The only
/// derived field is the header's `service_id`, the pattern the gateway
/// matches service URLs against:
/// - OIDC: redirect URIs joined as alternatives (`a|b`)
/// - SAML2: the entity id
/// - CAS: the record's service pattern
#[must_use]
pub fn to_registered_service(app: ClientApp) -> RegisteredService {
    let ClientApp {
        id,
        name,
        description,
        theme,
        logout_url,
        auth_policy,
        access_policy,
        attr_release_policy,
        properties,
        protocol,
    } = app;

    let header = |service_id: String| ServiceHeader {
        id,
        name,
        description,
        service_id,
        theme,
        logout_url,
        auth_policy,
        access_policy,
        attr_release_policy,
        properties,
    };

    match protocol {
        ClientAppProtocol::OidcRp(rp) => RegisteredService::Oidc(OidcRegisteredService {
            header: header(rp.redirect_uris.join("|")),
            client_id: rp.client_id,
            client_secret: rp.client_secret,
            redirect_uris: rp.redirect_uris,
            scopes: rp.scopes,
            sign_id_token: rp.sign_id_token,
            subject_type: rp.subject_type,
            logout_uri: rp.logout_uri,
        }),
        ClientAppProtocol::Saml2Sp(sp) => RegisteredService::Saml2(SamlRegisteredService {
            header: header(sp.entity_id.clone()),
            entity_id: sp.entity_id,
            metadata_location: sp.metadata_location,
            assertion_consumer_services: sp.assertion_consumer_services,
            sign_assertions: sp.sign_assertions,
            sign_responses: sp.sign_responses,
            encrypt_assertions: sp.encrypt_assertions,
            required_name_id_format: sp.required_name_id_format,
        }),
        ClientAppProtocol::CasSp(cas) => RegisteredService::Generic(CasRegisteredService {
            header: header(cas.service_id),
        }),
    }
}
