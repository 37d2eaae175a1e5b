use std::fmt::{self, Display};

use pokedash_common::session::SessionData;
use serde::{Deserialize, Serialize};

/// Login form.
#[derive(Serialize, Clone, Debug)]
pub struct Credentials {
    /// The account name.
    pub username: String,

    /// The account password.
    pub password: String,
}

/// Registration form.
#[derive(Serialize, Clone, Debug)]
pub struct Registration {
    /// The desired account name.
    pub username: String,

    /// The desired password.
    pub password: String,

    /// Contact address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Requested role. The server may ignore it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A response carrying a newly issued access token.
///
/// Returned by login, registration and token refresh.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The access token.
    #[serde(alias = "accessToken")]
    pub token: String,

    /// A refresh token, when the server issues or rotates one.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Username of the session owner.
    #[serde(default)]
    pub username: Option<String>,

    /// Role of the session owner.
    #[serde(default)]
    pub role: Option<String>,
}

impl AuthResponse {
    pub(crate) fn into_session_data(self, fallback_username: &str) -> SessionData {
        SessionData {
            access_token: self.token,
            refresh_token: self.refresh_token,
            username: self
                .username
                .or_else(|| Some(fallback_username.to_string())),
            role: self.role,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Identifier of a stored pokemon. Backends use either numbers or strings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PokemonId {
    /// Numeric id.
    Number(u64),
    /// Textual id.
    Text(String),
}

impl Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A pokemon record as listed on the dashboard.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pokemon {
    /// Server-assigned id.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PokemonId>,

    /// Name of the pokemon.
    pub name: String,

    /// Elemental type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Any other fields the backend returns.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A pokemon to be added.
#[derive(Serialize, Clone, Debug)]
pub struct NewPokemon {
    /// Name of the pokemon.
    pub name: String,

    /// Elemental type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
