//! Builders for commonly needed test values.

use luxthrift_core::catalog::CatalogItem;
use luxthrift_core::event::{ActivityAction, ActorId, NewActivity};

/// A guest activity with no product context.
#[must_use]
pub fn new_activity(guest_id: &str, action: ActivityAction) -> NewActivity {
    NewActivity {
        actor: ActorId::Guest(guest_id.to_owned()),
        action,
        product_id: None,
        category: None,
        brand: None,
        metadata: serde_json::json!({}),
    }
}

/// A catalog item priced at 100.
#[must_use]
pub fn catalog_item(id: &str, category: &str, brand: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_owned(),
        name: format!("Item {id}"),
        brand: brand.to_owned(),
        category: category.to_owned(),
        price: 100.0,
        image: Some(format!("https://cdn.example.com/{id}.jpg")),
    }
}
