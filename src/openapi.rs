//! OpenAPI documentation for the REST API.
//!
//! The document is served as JSON from [OPENAPI_JSON] and browsable with Swagger UI
//! at [SWAGGER_UI].
//!
//! New endpoints need a `#[utoipa::path(...)]` annotation on the handler and an entry
//! in the `paths(...)` list of [ApiDoc].

use axum::Router;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    AuthResult, Timestamps, Transaction, TransactionID, User, UserID,
    account::{Credentials, ProfileForm},
    transaction::TransactionForm,
};

/// The path of the Swagger UI page.
pub const SWAGGER_UI: &str = "/swagger-ui";

/// The path of the OpenAPI JSON document.
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// The name of the bearer token security scheme used by the transaction endpoints.
const BEARER_AUTH: &str = "bearer_auth";

/// The OpenAPI 3 document covering every endpoint and request/response body.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expenses API",
        description = "Track personal income and expenses. \
            The transaction endpoints need an `Authorization: Bearer <token>` header, \
            where the token comes from the Login or Register endpoints."
    ),
    tags(
        (name = "Account", description = "Registration, log-in and user profiles"),
        (name = "Transactions", description = "The current user's income and expenses")
    ),
    components(
        schemas(
            AuthResult,
            Credentials,
            ProfileForm,
            User,
            UserID,
            Timestamps,
            Transaction,
            TransactionID,
            TransactionForm,
        )
    ),
    paths(
        crate::account::email_endpoint::is_email_taken_endpoint,
        crate::account::log_in_endpoint::log_in_endpoint,
        crate::account::register_endpoint::register_endpoint,
        crate::account::profile_endpoint::get_profile_endpoint,
        crate::account::profile_endpoint::update_profile_endpoint,
        crate::transaction::list_endpoint::get_transactions_endpoint,
        crate::transaction::details_endpoint::get_transaction_endpoint,
        crate::transaction::create_endpoint::create_transaction_endpoint,
        crate::transaction::edit_endpoint::edit_transaction_endpoint,
        crate::transaction::delete_endpoint::delete_transaction_endpoint,
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the JWT bearer security scheme referenced by the protected endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .build();

        components.add_security_scheme(BEARER_AUTH, SecurityScheme::Http(scheme));
    }
}

/// A router serving the Swagger UI at [SWAGGER_UI] and the OpenAPI document at [OPENAPI_JSON].
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(SWAGGER_UI)
        .url(OPENAPI_JSON, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod openapi_tests {
    use utoipa::OpenApi;

    use super::{ApiDoc, BEARER_AUTH};
    use crate::endpoints;

    #[test]
    fn documents_every_endpoint() {
        let openapi = ApiDoc::openapi();

        for path in [
            endpoints::IS_EMAIL_TAKEN,
            endpoints::LOG_IN,
            endpoints::REGISTER,
            endpoints::USER_PROFILE,
            endpoints::UPDATE_USER_PROFILE,
            endpoints::TRANSACTIONS,
            endpoints::TRANSACTION_DETAILS,
            endpoints::CREATE_TRANSACTION,
            endpoints::UPDATE_TRANSACTION,
            endpoints::DELETE_TRANSACTION,
        ] {
            assert!(
                openapi.paths.paths.contains_key(path),
                "{path} is missing from the OpenAPI document"
            );
        }
    }

    #[test]
    fn declares_bearer_scheme() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.expect("document should have components");
        assert!(components.security_schemes.contains_key(BEARER_AUTH));
        assert!(components.schemas.contains_key("Transaction"));
        assert!(components.schemas.contains_key("AuthResult"));
    }

    #[test]
    fn transaction_endpoints_need_bearer_token() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();

        let security = &json["paths"][endpoints::TRANSACTIONS]["get"]["security"];
        assert!(security[0].get(BEARER_AUTH).is_some());
        assert!(json["paths"][endpoints::LOG_IN]["post"]["security"].is_null());
    }
}
