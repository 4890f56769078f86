//! Group-order command handlers: listing, counting, creation, and the
//! join/leave/pay flow through [`ParticipationController`].

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use panieco_client::{
    create_group_order, GroupOrderSnapshot, PaniecoClient, ParticipationController,
    ParticipationError, ParticipationState,
};
use panieco_core::status::to_cents;
use panieco_core::{cart_total, status_config, CartItem};
use rust_decimal::Decimal;

/// Reads a cart file: a JSON array of cart items.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid cart.
pub(crate) fn load_cart(path: &Path) -> anyhow::Result<Vec<CartItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read cart file {}", path.display()))?;
    parse_cart(&raw).with_context(|| format!("invalid cart file {}", path.display()))
}

pub(crate) fn parse_cart(raw: &str) -> Result<Vec<CartItem>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Turns a participation failure into the message the widget would show,
/// keeping the technical cause for `RUST_LOG=debug` readers.
fn user_facing(err: ParticipationError) -> anyhow::Error {
    tracing::debug!(error = ?err, kind = ?err.kind(), "participation failed");
    anyhow::anyhow!("{}", err.user_message())
}

pub(crate) async fn run_orders(client: &PaniecoClient, pickup_point_id: &str) -> anyhow::Result<()> {
    let orders = client.group_orders_at(pickup_point_id).await?;
    if orders.is_empty() {
        println!("no group orders at pickup point {pickup_point_id}");
        return Ok(());
    }

    println!(
        "{:<16}{:>10}{:>10}  STATUS",
        "PUBLIC ID", "TOTAL", "MIN"
    );
    for order in &orders {
        let badge = status_config(&order.status, order.total_amount, order.free_shipping_min);
        println!(
            "{:<16}{:>10}{:>10}  {}",
            order.public_id,
            to_cents(order.total_amount),
            to_cents(order.free_shipping_min),
            badge.label
        );
    }
    Ok(())
}

pub(crate) async fn run_counts(client: &PaniecoClient, ids: &[String]) -> anyhow::Result<()> {
    let counts = client.count_group_orders(ids).await?;
    for id in ids {
        println!("{id}\t{}", counts.get(id).copied().unwrap_or(0));
    }
    Ok(())
}

pub(crate) async fn run_create(
    client: &PaniecoClient,
    pickup_point_id: &str,
    cart_path: &Path,
) -> anyhow::Result<()> {
    let cart = load_cart(cart_path)?;
    let public_id = create_group_order(client, pickup_point_id, &cart)
        .await
        .map_err(user_facing)?;
    println!("Panieco n° {public_id} créé avec succès !");
    Ok(())
}

pub(crate) async fn run_show(
    client: Arc<PaniecoClient>,
    public_id: &str,
    free_shipping_min: Decimal,
) -> anyhow::Result<()> {
    let controller = ParticipationController::new(client, public_id, free_shipping_min);
    let snapshot = controller.refresh().await.map_err(user_facing)?;
    print_snapshot(&snapshot);
    Ok(())
}

pub(crate) async fn run_join(
    client: Arc<PaniecoClient>,
    public_id: &str,
    free_shipping_min: Decimal,
    cart_path: &Path,
) -> anyhow::Result<()> {
    let cart = load_cart(cart_path)?;
    let controller = ParticipationController::new(client, public_id, free_shipping_min);
    controller.refresh().await.map_err(user_facing)?;
    let snapshot = controller.join(&cart).await.map_err(user_facing)?;
    println!(
        "Vous avez rejoint le Panieco avec {} €.",
        to_cents(cart_total(&cart)?)
    );
    print_snapshot(&snapshot);
    Ok(())
}

pub(crate) async fn run_leave(
    client: Arc<PaniecoClient>,
    public_id: &str,
    free_shipping_min: Decimal,
) -> anyhow::Result<()> {
    let controller = ParticipationController::new(client, public_id, free_shipping_min);
    controller.refresh().await.map_err(user_facing)?;
    let snapshot = controller.leave().await.map_err(user_facing)?;
    println!("Vous avez quitté le Panieco.");
    print_snapshot(&snapshot);
    Ok(())
}

pub(crate) async fn run_pay(
    client: Arc<PaniecoClient>,
    public_id: &str,
    free_shipping_min: Decimal,
    cart_path: &Path,
) -> anyhow::Result<()> {
    let cart = load_cart(cart_path)?;
    let controller = ParticipationController::new(client, public_id, free_shipping_min);
    controller.refresh().await.map_err(user_facing)?;
    let url = controller.pay(&cart).await.map_err(user_facing)?;
    println!("{url}");
    Ok(())
}

fn print_snapshot(snapshot: &GroupOrderSnapshot) {
    println!("Panieco n° {}", snapshot.public_id);
    println!(
        "Total: {} € / {} € ({}%)",
        to_cents(snapshot.total_amount),
        to_cents(snapshot.free_shipping_min),
        snapshot.progress_percent().round()
    );
    if let Some(badge) = snapshot.status_config() {
        println!("Statut: {}", badge.label);
    }
    println!("Participation: {}", participation_label(snapshot.participation));
}

fn participation_label(state: ParticipationState) -> &'static str {
    match state {
        ParticipationState::NotParticipating => "vous ne participez pas",
        ParticipationState::ParticipantUnpaid { .. } => "inscrit, paiement en attente",
        ParticipationState::ParticipantPaid { .. } => "inscrit, payé",
    }
}
