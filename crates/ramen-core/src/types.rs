//! # Domain Types
//!
//! Core domain types used throughout Ramen POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │      Sale       │   │  InventoryItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price_cents    │   │  order_code     │   │  name (unique)  │       │
//! │  │  ingredients[]  │   │  add_ons[]      │   │  stock          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   OrderStatus   │   │ PaymentMethod   │   │   ServiceType   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Pending        │   │  Cash           │   │  Pickup         │       │
//! │  │  Preparing      │   │  Gcash          │   │  DineIn         │       │
//! │  │  Ready          │   │  Paymaya        │   │  Takeout        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A sale has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `order_code`: short sequential number - human-facing, shown in the kitchen
//!
//! ## Name-Based Ingredient Joins
//! Recipes reference inventory **by name**, not by id. This is a deliberate
//! denormalization: inventory rows are the single authority for an ingredient
//! name, and the Recipe Resolver tolerates (and reports) the not-found case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::ADD_ON_CATEGORY;

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// GCash e-wallet.
    Gcash,
    /// Maya (PayMaya) e-wallet.
    Paymaya,
}

// =============================================================================
// Service Type
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Pickup,
    DineIn,
    Takeout,
}

impl ServiceType {
    /// Whether orders with this service type show up on the kitchen display.
    ///
    /// Pickup orders are handed straight over the counter and never enter the
    /// kitchen queue.
    #[inline]
    pub const fn is_kitchen_visible(&self) -> bool {
        matches!(self, ServiceType::DineIn | ServiceType::Takeout)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Kitchen workflow status of an order.
///
/// The kitchen UI only moves orders forward: `pending → preparing → ready`.
/// Administrative edits may set any value out-of-band; no transition table
/// is enforced here.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order was placed and is waiting for the kitchen.
    Pending,
    /// Kitchen is working on the order.
    Preparing,
    /// Order can be picked up / served.
    Ready,
}

impl OrderStatus {
    /// Active orders are what the kitchen display queues up.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Recipe Ingredient
// =============================================================================

/// One line of a menu item's recipe: consume `quantity` units of the
/// inventory item named `inventory_item` per unit sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Inventory item name (the denormalized join key).
    pub inventory_item: String,
    /// Units consumed per item sold.
    pub quantity: i64,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A menu item available for sale.
///
/// Items in the reserved `"add-ons"` category are purchasable only as
/// supplements to another item and carry their own recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and in the kitchen.
    pub name: String,

    /// Price in centavos (smallest currency unit).
    pub price_cents: i64,

    /// Open-ended category (ramen, sides, drinks, ...). The value
    /// `"add-ons"` is reserved and marks add-on items.
    pub category: String,

    /// Image filename in the (external) file store.
    pub image: Option<String>,

    /// Ordered base recipe; ingredients join inventory by name.
    pub ingredients: Vec<RecipeIngredient>,

    /// When the item was created.
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this item belongs to the reserved add-on category.
    #[inline]
    pub fn is_add_on(&self) -> bool {
        self.category == ADD_ON_CATEGORY
    }

    /// Looks up a base-recipe line by ingredient name.
    pub fn recipe_line(&self, ingredient: &str) -> Option<&RecipeIngredient> {
        self.ingredients
            .iter()
            .find(|line| line.inventory_item == ingredient)
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked ingredient.
///
/// `name` is the unique business key recipes join against. `stock` never goes
/// negative: the ledger only mutates it through conditional deductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// An add-on line attached to a sale.
/// Uses the snapshot pattern to freeze the add-on's name and price at the
/// time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleAddOn {
    /// Referenced add-on menu item.
    pub menu_item_id: String,
    /// Add-on name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity of this add-on.
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub price_cents: i64,
}

impl SaleAddOn {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A customer-requested reduction of a recipe ingredient.
///
/// Bounded by the recipe quantity; never changes the price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedIngredient {
    /// Inventory item name, matched against the base recipe.
    pub inventory_item: String,
    /// Units removed per item sold.
    pub quantity: i64,
}

/// A persisted sale: one checkout line item.
///
/// Immutable once created except for `status` and administrative edits.
/// Name and prices are snapshots; later menu changes never alter past sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// Sequential zero-padded human-facing code ("0001").
    pub order_code: String,
    pub menu_item_id: String,
    /// Menu item name at time of sale (frozen).
    pub name_snapshot: String,
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
    pub add_ons: Vec<SaleAddOn>,
    pub removed_ingredients: Vec<RemovedIngredient>,
    pub payment_method: PaymentMethod,
    pub service_type: ServiceType,
    /// Derived: unit_price * quantity + Σ(add-on price * add-on quantity).
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Mobile Order (external source)
// =============================================================================

/// A line item on a mobile order. The mobile channel snapshots names and
/// prices on its side; this core treats them as opaque display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileOrderItem {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    /// Add-on names chosen in the mobile app.
    #[serde(default)]
    pub selected_add_ons: Vec<String>,
}

/// An order placed through the mobile channel.
///
/// Read-only from this core's perspective except for status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileOrder {
    pub id: String,
    /// Human-facing order code assigned by the mobile channel.
    pub order_id: String,
    pub customer_name: Option<String>,
    pub items: Vec<MobileOrderItem>,
    pub status: OrderStatus,
    pub delivery_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Kitchen Order View (tagged-union projection)
// =============================================================================

/// Which channel an active order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSource {
    Pos,
    Mobile,
}

/// A displayed add-on on the kitchen view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderViewAddOn {
    pub name: String,
    pub price_cents: i64,
}

/// One item line on the kitchen view, normalized across sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderViewItem {
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub add_ons: Vec<OrderViewAddOn>,
    pub removed_ingredients: Vec<RemovedIngredient>,
}

/// The normalized shape both order sources project into for the kitchen
/// display: one queue, one schema, a `source` tag instead of two parallel
/// code paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    /// Human-facing code the kitchen calls out (`Sale::order_code` or
    /// `MobileOrder::order_id`).
    pub order_code: String,
    pub source: OrderSource,
    pub status: OrderStatus,
    pub items: Vec<OrderViewItem>,
    pub customer_label: String,
    pub placed_at: DateTime<Utc>,
    /// POS service type or mobile delivery method, for the ticket header.
    pub fulfillment: Option<String>,
}

impl OrderView {
    /// Projects a POS sale into the common kitchen shape.
    pub fn from_sale(sale: &Sale) -> Self {
        OrderView {
            id: sale.id.clone(),
            order_code: sale.order_code.clone(),
            source: OrderSource::Pos,
            status: sale.status,
            items: vec![OrderViewItem {
                name: sale.name_snapshot.clone(),
                price_cents: sale.unit_price_cents,
                quantity: sale.quantity,
                add_ons: sale
                    .add_ons
                    .iter()
                    .map(|a| OrderViewAddOn {
                        name: a.name_snapshot.clone(),
                        price_cents: a.price_cents,
                    })
                    .collect(),
                removed_ingredients: sale.removed_ingredients.clone(),
            }],
            customer_label: "POS Customer".to_string(),
            placed_at: sale.created_at,
            fulfillment: serde_variant_name(&sale.service_type),
        }
    }

    /// Projects a mobile order into the common kitchen shape.
    pub fn from_mobile(order: &MobileOrder) -> Self {
        OrderView {
            id: order.id.clone(),
            order_code: order.order_id.clone(),
            source: OrderSource::Mobile,
            status: order.status,
            items: order
                .items
                .iter()
                .map(|item| OrderViewItem {
                    name: item.name.clone(),
                    price_cents: item.price_cents,
                    quantity: item.quantity,
                    add_ons: item
                        .selected_add_ons
                        .iter()
                        .map(|name| OrderViewAddOn {
                            name: name.clone(),
                            // Mobile add-on prices are baked into the item
                            // price on that channel.
                            price_cents: 0,
                        })
                        .collect(),
                    removed_ingredients: Vec::new(),
                })
                .collect(),
            customer_label: order
                .customer_name
                .clone()
                .unwrap_or_else(|| "Mobile Customer".to_string()),
            placed_at: order.created_at,
            fulfillment: order.delivery_method.clone(),
        }
    }
}

/// Serializes an enum's serde wire name (e.g. `ServiceType::DineIn` ->
/// `"dine-in"`) for display fields.
fn serde_variant_name<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sale() -> Sale {
        Sale {
            id: "sale-1".to_string(),
            order_code: "0001".to_string(),
            menu_item_id: "menu-1".to_string(),
            name_snapshot: "Tonkotsu Ramen".to_string(),
            quantity: 2,
            unit_price_cents: 25000,
            add_ons: vec![SaleAddOn {
                menu_item_id: "menu-2".to_string(),
                name_snapshot: "Extra Chashu".to_string(),
                quantity: 1,
                price_cents: 8000,
            }],
            removed_ingredients: vec![RemovedIngredient {
                inventory_item: "Broth".to_string(),
                quantity: 1,
            }],
            payment_method: PaymentMethod::Cash,
            service_type: ServiceType::DineIn,
            total_cents: 58000,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_status_default_and_active() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Preparing.is_active());
        assert!(!OrderStatus::Ready.is_active());
    }

    #[test]
    fn test_service_type_kitchen_visibility() {
        assert!(ServiceType::DineIn.is_kitchen_visible());
        assert!(ServiceType::Takeout.is_kitchen_visible());
        assert!(!ServiceType::Pickup.is_kitchen_visible());
    }

    #[test]
    fn test_service_type_wire_format() {
        let json = serde_json::to_string(&ServiceType::DineIn).unwrap();
        assert_eq!(json, "\"dine-in\"");
        let parsed: ServiceType = serde_json::from_str("\"takeout\"").unwrap();
        assert_eq!(parsed, ServiceType::Takeout);
    }

    #[test]
    fn test_menu_item_is_add_on() {
        let mut item = MenuItem {
            id: "menu-2".to_string(),
            name: "Extra Chashu".to_string(),
            price_cents: 8000,
            category: "add-ons".to_string(),
            image: None,
            ingredients: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(item.is_add_on());
        item.category = "ramen".to_string();
        assert!(!item.is_add_on());
    }

    #[test]
    fn test_order_view_from_sale() {
        let sale = sample_sale();
        let view = OrderView::from_sale(&sale);

        assert_eq!(view.order_code, "0001");
        assert_eq!(view.source, OrderSource::Pos);
        assert_eq!(view.customer_label, "POS Customer");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].add_ons[0].name, "Extra Chashu");
        assert_eq!(view.items[0].removed_ingredients.len(), 1);
        assert_eq!(view.fulfillment.as_deref(), Some("dine-in"));
    }

    #[test]
    fn test_order_view_from_mobile_defaults_customer_label() {
        let order = MobileOrder {
            id: "mob-1".to_string(),
            order_id: "M-0042".to_string(),
            customer_name: None,
            items: vec![MobileOrderItem {
                name: "Shoyu Ramen".to_string(),
                price_cents: 22000,
                quantity: 1,
                selected_add_ons: vec!["Ajitama".to_string()],
            }],
            status: OrderStatus::Preparing,
            delivery_method: Some("delivery".to_string()),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = OrderView::from_mobile(&order);
        assert_eq!(view.source, OrderSource::Mobile);
        assert_eq!(view.customer_label, "Mobile Customer");
        assert_eq!(view.items[0].add_ons[0].name, "Ajitama");
        assert_eq!(view.fulfillment.as_deref(), Some("delivery"));
    }
}
