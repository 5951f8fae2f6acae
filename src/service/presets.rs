//! Ready-made service descriptors

use super::descriptor::{DescriptorError, ServiceDescriptor};

pub const PRESET_NAMES: &[&str] = &["inventory", "payments", "notifications"];

pub fn preset(name: &str) -> Result<ServiceDescriptor, DescriptorError> {
    match name.to_lowercase().as_str() {
        "inventory" => Ok(inventory()),
        "payments" => Ok(payments()),
        "notifications" => Ok(notifications()),
        other => Err(DescriptorError::UnknownPreset(other.to_string())),
    }
}

/// E-commerce inventory tracking across warehouses
pub fn inventory() -> ServiceDescriptor {
    ServiceDescriptor::new(
        "inventory",
        "Tracks product stock levels across multiple warehouses for an e-commerce platform. \
         Handles reservations, replenishment, and low-stock alerting.",
    )
    .with_entities([
        "Product",
        "StockItem",
        "Warehouse",
        "StockMovement",
        "Reservation",
    ])
    .with_operations([
        "Reserve stock for an order",
        "Release reserved stock on cancellation",
        "Decrement stock on fulfillment",
        "Replenish stock",
        "Aggregate stock across warehouses",
        "Trigger low-stock alerts",
    ])
    .with_integrations([
        "Order Service (Kafka events)",
        "PostgreSQL (primary store)",
        "Redis (stock level cache)",
    ])
    .with_extra_requirements([
        "Prevent negative stock using atomic updates",
        "Full audit trail of all stock movements",
        "Support product variants (size, color)",
    ])
}

/// Payment processing, refunds and transaction history
pub fn payments() -> ServiceDescriptor {
    ServiceDescriptor::new(
        "payments",
        "Handles payment processing, refunds, and transaction history for an e-commerce platform.",
    )
    .with_entities(["Payment", "Refund", "Transaction", "PaymentMethod"])
    .with_operations([
        "Initiate a payment",
        "Confirm payment",
        "Issue a full or partial refund",
        "Retrieve transaction history",
        "Handle webhook callbacks from payment gateway",
    ])
    .with_integrations([
        "Stripe API (payment gateway)",
        "Order Service (Kafka events)",
        "PostgreSQL (transaction store)",
    ])
    .with_extra_requirements([
        "Idempotency keys on all payment requests",
        "PCI-DSS compliant, never store raw card data",
        "Retry logic for transient gateway failures",
    ])
}

/// Email, SMS and push notifications driven by platform events
pub fn notifications() -> ServiceDescriptor {
    ServiceDescriptor::new(
        "notifications",
        "Sends email, SMS, and push notifications triggered by events across the platform.",
    )
    .with_entities(["Notification", "Template", "Recipient", "DeliveryLog"])
    .with_operations([
        "Send email notification",
        "Send SMS notification",
        "Send push notification",
        "Render template with dynamic data",
        "Track delivery status",
        "Manage user notification preferences",
    ])
    .with_integrations([
        "SendGrid (email)",
        "Twilio (SMS)",
        "Firebase Cloud Messaging (push)",
        "Kafka (consume events from other services)",
        "PostgreSQL (delivery logs, preferences)",
    ])
    .with_extra_requirements([
        "Respect user opt-out preferences",
        "Retry failed deliveries with backoff",
        "Deduplicate notifications using idempotency keys",
    ])
}
