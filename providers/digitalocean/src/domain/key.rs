use nimbus_id::KeyId;
use serde::{Deserialize, Serialize};

/// An SSH public key registered with the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub id: KeyId,
    pub name: String,
    pub fingerprint: String,
    pub public_key: String,
}

/// Body of `POST /account/keys`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewKey {
    pub name: String,
    pub public_key: String,
}
