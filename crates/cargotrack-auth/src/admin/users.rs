//! Provider user records and the user-list response decoder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cargotrack_core::error::{AppError, ErrorKind};
use cargotrack_core::result::AppResult;

/// A user as returned by the provider's admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_metadata: Map<String, Value>,
}

impl ProviderUser {
    /// A non-empty, trimmed string field of `user_metadata`.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.user_metadata
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The email, if non-empty.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Every user-list shape the admin API has been seen to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserListBody {
    Bare(Vec<ProviderUser>),
    Users { users: Vec<ProviderUser> },
    Data { data: DataBody },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataBody {
    List(Vec<ProviderUser>),
    Nested { users: Vec<ProviderUser> },
}

impl From<UserListBody> for Vec<ProviderUser> {
    fn from(body: UserListBody) -> Self {
        match body {
            UserListBody::Bare(users)
            | UserListBody::Users { users }
            | UserListBody::Data {
                data: DataBody::List(users),
            }
            | UserListBody::Data {
                data: DataBody::Nested { users },
            } => users,
        }
    }
}

/// Normalise a user-list response body.
///
/// Accepts a bare array, `{"users": [...]}`, `{"data": [...]}` and
/// `{"data": {"users": [...]}}`. Anything else is an upstream error.
pub fn decode_user_list(body: Value) -> AppResult<Vec<ProviderUser>> {
    serde_json::from_value::<UserListBody>(body)
        .map(Vec::from)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Unrecognised user list response from identity provider",
                e,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> Value {
        json!({"id": "u1", "email": "abby@x.test", "user_metadata": {"username": "abby"}})
    }

    #[test]
    fn test_all_known_shapes_decode() {
        for body in [
            json!([user()]),
            json!({"users": [user()], "aud": "authenticated"}),
            json!({"data": [user()]}),
            json!({"data": {"users": [user()]}}),
        ] {
            let users = decode_user_list(body).unwrap();
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].meta("username"), Some("abby"));
        }
    }

    #[test]
    fn test_unknown_shape_is_external_service_error() {
        for body in [json!({"items": []}), json!({"data": null}), json!("users")] {
            let err = decode_user_list(body).unwrap_err();
            assert_eq!(err.kind, ErrorKind::ExternalService);
        }
    }

    #[test]
    fn test_null_metadata_is_empty() {
        let users =
            decode_user_list(json!([{"id": "u2", "email": null, "user_metadata": null}])).unwrap();
        assert!(users[0].user_metadata.is_empty());
        assert_eq!(users[0].email(), None);
    }
}
