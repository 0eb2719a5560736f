//! Errors returned by store mutations.
//!
//! Only a handful of mutations can fail, and a failed mutation never changes
//! state or touches storage. Persistence problems are not surfaced here;
//! they are logged and counted by the store (see [`crate::persistence`]).

use thiserror::Error;

use heritage_mall_core::{AddressId, ItemId};

/// Mutation-level error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity looked up.
        entity: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// Cart quantities must be at least one; remove the row instead.
    #[error("invalid quantity for cart item {id}: must be at least 1")]
    InvalidQuantity {
        /// The cart item being updated.
        id: ItemId,
    },
}

impl StoreError {
    /// An unknown address id.
    #[must_use]
    pub fn address_not_found(id: AddressId) -> Self {
        Self::NotFound {
            entity: "address",
            id: id.to_string(),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::address_not_found(AddressId::new(9));
        assert_eq!(err.to_string(), "address not found: 9");

        let err = StoreError::InvalidQuantity { id: ItemId::new(3) };
        assert_eq!(
            err.to_string(),
            "invalid quantity for cart item 3: must be at least 1"
        );
    }
}
