//! Saved shipping addresses.

use serde::{Deserialize, Serialize};

use super::AddressId;

/// A saved shipping address.
///
/// Ids are assigned by the store; at most one address is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Store-assigned ID.
    pub id: AddressId,
    /// Recipient name.
    pub name: String,
    /// Recipient phone number.
    pub phone: String,
    /// Province / city / district.
    pub region: String,
    /// Street and house number.
    pub detail: String,
    /// Whether this is the default address.
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Recipient and location on one line.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!("{} {} {} {}", self.name, self.phone, self.region, self.detail)
    }
}

/// Address fields as entered by the user, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub name: String,
    pub phone: String,
    pub region: String,
    pub detail: String,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressInput {
    /// Attach an id.
    #[must_use]
    pub fn with_id(self, id: AddressId) -> Address {
        Address {
            id,
            name: self.name,
            phone: self.phone,
            region: self.region,
            detail: self.detail,
            is_default: self.is_default,
        }
    }
}
