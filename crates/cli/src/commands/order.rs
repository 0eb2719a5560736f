//! `mall-cli order ...`

use chrono::Utc;
use clap::Subcommand;
use serde_json::{Value, json};

use heritage_mall_core::{Order, OrderId, OrderLine, OrderStatus, OrderTimestamp, Price};
use heritage_mall_store::{KeyValueStore, Store};

use super::CliError;

#[derive(Subcommand)]
pub enum OrderAction {
    /// Create an order from the selected cart rows and the checkout address
    Place,
    /// Add an order from a JSON payload
    Add {
        /// Order object, e.g. '{"id":1001,"status":0,"totalAmount":"99.00"}'
        #[arg(long)]
        json: String,
    },
    /// Move an order to a new status
    Status {
        #[arg(long)]
        id: OrderId,
        /// `pending_payment`, `paid`, `shipped`, `completed`, `cancelled`, or 0-4
        #[arg(long)]
        status: OrderStatus,
        /// Do not stamp the matching lifecycle timestamp
        #[arg(long)]
        no_stamp: bool,
        /// Stamp this field instead, e.g. `payTime` or a custom `refundTime`
        #[arg(long, conflicts_with = "no_stamp")]
        field: Option<OrderTimestamp>,
    },
    /// Cancel an order
    Cancel {
        #[arg(long)]
        id: OrderId,
        #[arg(long)]
        reason: String,
    },
    /// Delete an order
    Delete {
        #[arg(long)]
        id: OrderId,
    },
    /// List orders, optionally with one status
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show {
        #[arg(long)]
        id: OrderId,
    },
}

pub fn run<S: KeyValueStore>(store: &mut Store<S>, action: OrderAction) -> Result<Value, CliError> {
    match action {
        OrderAction::Place => {
            let order = place(store)?;
            return Ok(describe(&order));
        }
        OrderAction::Add { json } => store.add_order(serde_json::from_str(&json)?)?,
        OrderAction::Status {
            id,
            status,
            no_stamp,
            field,
        } => {
            let field = match field {
                Some(field) => Some(field),
                None if no_stamp => None,
                None => OrderTimestamp::for_status(status),
            };
            store.update_order_status(id, status, field.map(|field| (field, Utc::now())))?;
        }
        OrderAction::Cancel { id, reason } => store.cancel_order(id, reason)?,
        OrderAction::Delete { id } => store.delete_order(id)?,
        OrderAction::List { status: Some(status) } => {
            return Ok(serde_json::to_value(store.state().orders_with_status(status))?);
        }
        OrderAction::List { status: None } => {}
        OrderAction::Show { id } => {
            return Ok(store.state().order(id).map_or(Value::Null, describe));
        }
    }
    Ok(serde_json::to_value(store.state().all_orders())?)
}

/// Check out the selected cart rows: record the order, then drop the rows.
fn place<S: KeyValueStore>(store: &mut Store<S>) -> Result<Order, CliError> {
    let state = store.state();
    let lines: Vec<OrderLine> = state
        .selected_cart_items()
        .into_iter()
        .map(OrderLine::from)
        .collect();
    if lines.is_empty() {
        return Err(CliError::Precondition("no selected cart items to check out"));
    }
    let address = state
        .selected_address()
        .cloned()
        .ok_or(CliError::Precondition("no shipping address saved"))?;

    let now = Utc::now();
    let mut order = Order::new(OrderId::new(now.timestamp_millis()));
    order.items = lines;
    order.total_amount = Some(state.selected_cart_total_price());
    order.address = Some(address);
    order.stamp(OrderTimestamp::Created, now);

    store.add_order(order.clone())?;
    store.remove_selected_cart_items()?;
    tracing::info!(order_id = %order.id, total = %order.total(), "order placed");
    Ok(order)
}

fn describe(order: &Order) -> Value {
    json!({
        "order": order,
        "status": order.status.to_string(),
        "total": Price::from_amount(order.total()).to_string(),
    })
}
