//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/Transactions/Details/{transaction_id}', use [format_endpoint].

/// The route for checking whether an email address belongs to a registered user.
pub const IS_EMAIL_TAKEN: &str = "/api/Account/IsEmailAlreadyTaken";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/Account/Login";
/// The route for registering a new user.
pub const REGISTER: &str = "/api/Account/Register";
/// The route for getting a user's profile by their email.
pub const USER_PROFILE: &str = "/api/Account/UserProfile";
/// The route for changing a user's name.
pub const UPDATE_USER_PROFILE: &str = "/api/Account/UpdateUserProfile/{user_id}";

/// The route for listing the current user's transactions.
pub const TRANSACTIONS: &str = "/api/Transactions/All";
/// The route for getting a single transaction.
pub const TRANSACTION_DETAILS: &str = "/api/Transactions/Details/{transaction_id}";
/// The route for creating a transaction.
pub const CREATE_TRANSACTION: &str = "/api/Transactions/Create";
/// The route for changing a transaction.
pub const UPDATE_TRANSACTION: &str = "/api/Transactions/Update/{transaction_id}";
/// The route for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/api/Transactions/Delete/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path contains at most a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::IS_EMAIL_TAKEN);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::USER_PROFILE);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::UPDATE_USER_PROFILE, 1));

        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION_DETAILS, 1));
        assert_endpoint_is_valid_uri(endpoints::CREATE_TRANSACTION);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::UPDATE_TRANSACTION, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_TRANSACTION, 1));
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
