//! `search`: pickup points near a reference point.

use panieco_client::PaniecoClient;
use panieco_core::{group_by_day, rank_by_distance, Relay};

/// Searches pickup points, ranks them nearest first, and prints a table.
///
/// # Errors
///
/// Returns an error if the search request fails.
pub(crate) async fn run_search(
    client: &PaniecoClient,
    query: &str,
    lat: f64,
    lng: f64,
    show_hours: bool,
) -> anyhow::Result<()> {
    let mut relays = client.search_relays_near(query, lat, lng).await?;
    if relays.is_empty() {
        println!("no pickup points found for \"{query}\"");
        return Ok(());
    }
    rank_by_distance(&mut relays);

    let counts = client
        .count_group_orders(&relays.iter().map(|r| r.id.clone()).collect::<Vec<_>>())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not count group orders");
            Default::default()
        });

    println!(
        "{:<10}{:<14}{:<8}{:<32}ADDRESS",
        "DIST (km)", "ID", "ORDERS", "NAME"
    );
    for relay in &relays {
        let orders = counts.get(&relay.id).copied().unwrap_or(0);
        println!(
            "{:<10}{:<14}{:<8}{:<32}{}",
            fmt_distance(relay.distance_km),
            relay.id,
            orders,
            truncate(&relay.name, 30),
            fmt_address(relay)
        );
        if show_hours {
            print_hours(relay);
        }
    }

    Ok(())
}

fn print_hours(relay: &Relay) {
    let grouped = group_by_day(&relay.opening_hours);
    if grouped.is_empty() {
        println!("    horaires non communiqués");
        return;
    }
    let split = grouped.has_afternoon_column();
    for row in grouped.rows() {
        if split {
            println!("    {:<10}{:<16}{}", row.day, row.morning, row.afternoon);
        } else {
            println!("    {:<10}{}", row.day, row.morning);
        }
    }
}

fn fmt_distance(distance_km: Option<f64>) -> String {
    distance_km.map_or_else(|| "\u{2014}".to_string(), |d| format!("{d:.1}"))
}

fn fmt_address(relay: &Relay) -> String {
    let address = &relay.place.address;
    [
        address.street_address.as_str(),
        address.postal_code.as_str(),
        address.address_locality.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
