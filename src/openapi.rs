//! OpenAPI metadata for the guard schemes.
//!
//! The scheme name and description constants live on the scheme types
//! and are always available; this module only wires them into a
//! utoipa-generated document.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::Modify;

use crate::scheme::{OnlyTelegramNetworkWithSecret, SECRET_PATH_PARAM};

/// Registers the guard schemes on a generated OpenAPI document.
///
/// OpenAPI's `apiKey` location cannot say "path", so the secret scheme
/// is declared with the `query` location and a description that points
/// integrators at the `{secret}` path segment; generated docs then at
/// least list the requirement. The network-only scheme carries no
/// request credential at all, which no OpenAPI security scheme type
/// can express; cite
/// [`OnlyTelegramNetwork::SCHEME_DESCRIPTION`](crate::OnlyTelegramNetwork::SCHEME_DESCRIPTION)
/// in your API description instead.
///
/// ```rust,ignore
/// #[derive(utoipa::OpenApi)]
/// #[openapi(modifiers(&SecurityAddon), paths(post_update))]
/// struct ApiDoc;
/// ```
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            OnlyTelegramNetworkWithSecret::SCHEME_NAME,
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::with_description(
                SECRET_PATH_PARAM.to_string(),
                format!(
                    "{}. Declared as a query key because OpenAPI cannot place an apiKey in the path.",
                    OnlyTelegramNetworkWithSecret::SCHEME_DESCRIPTION
                ),
            ))),
        );
    }
}
