//! `mall-cli address ...`

use clap::{Args, Subcommand};
use serde_json::{Value, json};

use heritage_mall_core::{AddressId, AddressInput};
use heritage_mall_store::{KeyValueStore, Store};

use super::CliError;

#[derive(Subcommand)]
pub enum AddressAction {
    /// Save a new address
    Add(AddressFields),
    /// Replace an existing address
    Update {
        #[arg(long)]
        id: AddressId,
        #[command(flatten)]
        fields: AddressFields,
    },
    /// Delete an address
    Delete {
        #[arg(long)]
        id: AddressId,
    },
    /// Make an address the default
    Default {
        #[arg(long)]
        id: AddressId,
    },
    /// Choose the address for checkout
    Select {
        #[arg(long)]
        id: AddressId,
    },
    /// List addresses and the resolved checkout address
    List,
}

#[derive(Args)]
pub struct AddressFields {
    /// Recipient name
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    /// Province / city / district
    #[arg(long)]
    region: String,
    /// Street and house number
    #[arg(long)]
    detail: String,
    /// Make this the default address
    #[arg(long = "default")]
    is_default: bool,
}

impl From<AddressFields> for AddressInput {
    fn from(fields: AddressFields) -> Self {
        Self {
            name: fields.name,
            phone: fields.phone,
            region: fields.region,
            detail: fields.detail,
            is_default: fields.is_default,
        }
    }
}

pub fn run<S: KeyValueStore>(
    store: &mut Store<S>,
    action: AddressAction,
) -> Result<Value, CliError> {
    match action {
        AddressAction::Add(fields) => {
            let id = store.add_address(fields.into())?;
            tracing::info!(%id, "address saved");
        }
        AddressAction::Update { id, fields } => store.update_address(id, fields.into())?,
        AddressAction::Delete { id } => store.delete_address(id)?,
        AddressAction::Default { id } => store.set_default_address(id)?,
        AddressAction::Select { id } => store.select_address(id)?,
        AddressAction::List => {}
    }

    let state = store.state();
    Ok(json!({
        "addresses": state.all_addresses(),
        "selected": state.selected_address(),
        "selectedLine": state.selected_address().map(heritage_mall_core::Address::one_line),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use heritage_mall_store::{MemoryStore, StoreConfig, StoreError};

    use super::*;

    fn fields(name: &str, is_default: bool) -> AddressFields {
        AddressFields {
            name: name.to_string(),
            phone: "13800000000".to_string(),
            region: "Zhejiang Hangzhou".to_string(),
            detail: "1 West Lake Rd".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_default_address_is_selected() {
        let mut store = Store::open(MemoryStore::new(), &StoreConfig::default());
        run(&mut store, AddressAction::Add(fields("A", false))).unwrap();
        let out = run(&mut store, AddressAction::Add(fields("B", true))).unwrap();
        assert_eq!(out["selected"]["name"], "B");
        assert_eq!(out["selected"]["id"], 2);
        assert_eq!(
            out["selectedLine"],
            "B 13800000000 Zhejiang Hangzhou 1 West Lake Rd"
        );
    }

    #[test]
    fn test_select_unknown_address_fails() {
        let mut store = Store::open(MemoryStore::new(), &StoreConfig::default());
        let err = run(
            &mut store,
            AddressAction::Select {
                id: AddressId::new(9),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::NotFound { .. })));
    }
}
