//! # Notification Text
//!
//! Builders for the human-readable messages the notifier sends.
//!
//! Kept in core because they are pure string functions: the transport
//! (which bot token, which chat id, retries, timeouts) lives in the app
//! layer, the wording lives here where it can be unit tested.
//!
//! ## Two Flows
//! ```text
//! Order committed ──► owner_new_order()        ──► establishment owner
//! Status changed  ──► customer_status_update() ──► ordering customer
//! ```

use crate::money::Money;
use crate::pricing::PricedLine;
use crate::types::{CustomerInfo, OrderStatus};

/// Builds the new-order alert sent to the establishment owner.
///
/// Includes the friendly order number, store name, customer contact
/// fields (with placeholders where missing), itemized lines and the
/// authoritative total in major units.
///
/// ## Example Output
/// ```text
/// 🔔 *NEW ORDER #3*
/// 🏠 *Store:* Burger Barn
///
/// 👤 *Customer:* Alice
/// 📞 *Phone:* 555-0100
/// 📍 *Address:* Pickup
/// 📝 *Note:* -
///
/// 🛒 *Items:*
/// • 2x Burger
///
/// 💰 *Total:* $10.00
/// ```
pub fn owner_new_order(
    store_name: &str,
    friendly_id: i64,
    customer: &CustomerInfo,
    lines: &[PricedLine],
    total: Money,
) -> String {
    let items_text = lines
        .iter()
        .map(|line| format!("• {}x {}", line.quantity, line.name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🔔 *NEW ORDER #{friendly_id}*\n\
         🏠 *Store:* {store}\n\n\
         👤 *Customer:* {name}\n\
         📞 *Phone:* {phone}\n\
         📍 *Address:* {address}\n\
         📝 *Note:* {note}\n\n\
         🛒 *Items:*\n{items_text}\n\n\
         💰 *Total:* {total}",
        store = store_name,
        name = customer.name.as_deref().unwrap_or("Anonymous"),
        phone = customer.phone.as_deref().unwrap_or("-"),
        address = customer.address.as_deref().unwrap_or("Pickup"),
        note = customer.note.as_deref().unwrap_or("-"),
    )
}

/// Builds the status-change alert sent to the customer.
///
/// Returns `None` for statuses that do not notify the customer
/// (`received` is implied by the order confirmation; `completed` ends
/// the conversation).
pub fn customer_status_update(
    status: OrderStatus,
    friendly_id: i64,
    tracking_url: Option<&str>,
) -> Option<String> {
    match status {
        OrderStatus::Preparing => Some(format!(
            "👨‍🍳 *Order #{friendly_id} is being prepared!*\nYour food is already being made."
        )),
        OrderStatus::Delivering => {
            let mut msg = format!("🛵 *Order #{friendly_id} is OUT FOR DELIVERY!*");
            if let Some(url) = tracking_url {
                msg.push_str(&format!("\n\n📍 *Track it here:* {url}"));
            }
            Some(msg)
        }
        OrderStatus::Canceled => Some(format!(
            "❌ *Order #{friendly_id} was canceled* by the establishment."
        )),
        OrderStatus::Received | OrderStatus::Completed => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricedLine;

    fn sample_lines() -> Vec<PricedLine> {
        vec![
            PricedLine {
                product_id: 10,
                name: "Burger".to_string(),
                unit_price: Money::from_cents(500),
                quantity: 2,
            },
            PricedLine {
                product_id: 11,
                name: "Fries".to_string(),
                unit_price: Money::from_cents(250),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_owner_message_contents() {
        let customer = CustomerInfo {
            name: Some("Alice".to_string()),
            phone: Some("555-0100".to_string()),
            address: None,
            note: None,
        };
        let msg = owner_new_order(
            "Burger Barn",
            3,
            &customer,
            &sample_lines(),
            Money::from_cents(1250),
        );

        assert!(msg.contains("NEW ORDER #3"));
        assert!(msg.contains("*Store:* Burger Barn"));
        assert!(msg.contains("*Customer:* Alice"));
        assert!(msg.contains("• 2x Burger"));
        assert!(msg.contains("• 1x Fries"));
        // Major units with two decimal places
        assert!(msg.contains("*Total:* $12.50"));
    }

    #[test]
    fn test_owner_message_placeholders() {
        let msg = owner_new_order(
            "Burger Barn",
            1,
            &CustomerInfo::default(),
            &sample_lines(),
            Money::from_cents(1250),
        );
        assert!(msg.contains("*Customer:* Anonymous"));
        assert!(msg.contains("*Phone:* -"));
        assert!(msg.contains("*Address:* Pickup"));
    }

    #[test]
    fn test_customer_message_per_status() {
        assert!(customer_status_update(OrderStatus::Preparing, 7, None)
            .unwrap()
            .contains("Order #7"));

        let delivering =
            customer_status_update(OrderStatus::Delivering, 7, Some("https://track.example/7"))
                .unwrap();
        assert!(delivering.contains("OUT FOR DELIVERY"));
        assert!(delivering.contains("https://track.example/7"));

        // No tracking link when none was provided
        let delivering_plain = customer_status_update(OrderStatus::Delivering, 7, None).unwrap();
        assert!(!delivering_plain.contains("Track it here"));

        assert!(customer_status_update(OrderStatus::Canceled, 7, None)
            .unwrap()
            .contains("canceled"));

        // Silent statuses
        assert_eq!(customer_status_update(OrderStatus::Received, 7, None), None);
        assert_eq!(customer_status_update(OrderStatus::Completed, 7, None), None);
    }
}
