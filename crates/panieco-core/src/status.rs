//! User-facing status badges and free-shipping progress for group orders.
//!
//! Everything here is a pure function of `(status, total, threshold)` and
//! can be recomputed at any time from the latest backend read.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::group_order::GroupOrderStatus;

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    /// Still collecting towards the free-shipping threshold.
    Pending,
    Ready,
    Paid,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    /// Unknown status; no styling.
    Neutral,
}

impl StatusStyle {
    /// CSS classes used by the storefront badge.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            StatusStyle::Pending => "bg-yellow-100 text-yellow-800",
            StatusStyle::Ready | StatusStyle::Paid => "bg-green-100 text-green-800",
            StatusStyle::Confirmed => "bg-green-200 text-green-900",
            StatusStyle::Shipped => "bg-purple-100 text-purple-800",
            StatusStyle::Delivered => "bg-teal-100 text-teal-800",
            StatusStyle::Cancelled => "bg-red-100 text-red-800",
            StatusStyle::Neutral => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    pub label: String,
    pub style: StatusStyle,
}

/// Derives the badge for a group order.
///
/// While collecting, the label shows the amount still missing for free
/// shipping; once the threshold is reached the order reads as ready to pay
/// even if the backend has not moved its status yet.
#[must_use]
pub fn status_config(
    status: &GroupOrderStatus,
    total_amount: Decimal,
    free_shipping_min: Decimal,
) -> StatusConfig {
    if status.is_collecting() {
        return match free_shipping_min.checked_sub(total_amount) {
            Some(remaining) if remaining > Decimal::ZERO => StatusConfig {
                label: format!("Plus que {} € pour livraison gratuite", to_cents(remaining)),
                style: StatusStyle::Pending,
            },
            Some(_) => fixed_config(&GroupOrderStatus::ReadyToPay),
            // Unrepresentable remainder: show the raw status, unstyled.
            None => StatusConfig {
                label: status.as_str().to_string(),
                style: StatusStyle::Neutral,
            },
        };
    }
    fixed_config(status)
}

fn fixed_config(status: &GroupOrderStatus) -> StatusConfig {
    let (label, style) = match status {
        GroupOrderStatus::ReadyToPay => ("Prêt à être payé", StatusStyle::Ready),
        GroupOrderStatus::Paid => ("Payé", StatusStyle::Paid),
        GroupOrderStatus::Confirmed => ("Confirmé", StatusStyle::Confirmed),
        GroupOrderStatus::Shipped => ("Expédié", StatusStyle::Shipped),
        GroupOrderStatus::Delivered => ("Livré", StatusStyle::Delivered),
        GroupOrderStatus::Cancelled => ("Annulé", StatusStyle::Cancelled),
        other => (other.as_str(), StatusStyle::Neutral),
    };
    StatusConfig {
        label: label.to_string(),
        style,
    }
}

/// Rounds half away from zero and pins the scale so `10` prints as `10.00`.
#[must_use]
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents
}

/// Progress towards free shipping, in percent, clamped to `0..=100`.
///
/// A non-positive threshold counts as already reached.
#[must_use]
pub fn progress_percent(total_amount: Decimal, free_shipping_min: Decimal) -> Decimal {
    if free_shipping_min <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    let pct = total_amount
        .checked_div(free_shipping_min)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    match pct {
        Some(pct) => pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        // The threshold is positive here, so the overflow sign follows the total.
        None if total_amount.is_sign_negative() => Decimal::ZERO,
        None => Decimal::ONE_HUNDRED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(raw: &str) -> GroupOrderStatus {
        GroupOrderStatus::from(raw)
    }

    #[test]
    fn pending_below_threshold_shows_remaining_amount() {
        let cfg = status_config(&status("pending"), Decimal::from(40), Decimal::from(50));
        assert!(cfg.label.contains("10.00"), "label: {}", cfg.label);
        assert_eq!(cfg.style, StatusStyle::Pending);
    }

    #[test]
    fn remaining_amount_is_rounded_to_cents() {
        let cfg = status_config(
            &status("collecting"),
            Decimal::new(12_345, 3),
            Decimal::from(30),
        );
        assert_eq!(cfg.label, "Plus que 17.66 € pour livraison gratuite");
    }

    #[test]
    fn pending_at_or_above_threshold_reads_ready_to_pay() {
        let over = status_config(&status("pending"), Decimal::from(60), Decimal::from(50));
        let exact = status_config(&status("collecting"), Decimal::from(50), Decimal::from(50));
        let ready = status_config(&status("ready_to_pay"), Decimal::ZERO, Decimal::from(50));
        assert_eq!(over, ready);
        assert_eq!(exact, ready);
        assert_eq!(ready.label, "Prêt à être payé");
    }

    #[test]
    fn fixed_statuses_ignore_amounts() {
        let cfg = status_config(&status("shipped"), Decimal::ZERO, Decimal::from(50));
        assert_eq!(cfg.label, "Expédié");
        assert_eq!(cfg.style.class(), "bg-purple-100 text-purple-800");
        assert_eq!(
            status_config(&status("cancelled"), Decimal::ZERO, Decimal::ZERO).label,
            "Annulé"
        );
    }

    #[test]
    fn unknown_status_falls_back_to_raw_string() {
        let cfg = status_config(&status("on_hold"), Decimal::ZERO, Decimal::from(50));
        assert_eq!(cfg.label, "on_hold");
        assert_eq!(cfg.style, StatusStyle::Neutral);
        assert_eq!(cfg.style.class(), "");
    }

    #[test]
    fn to_cents_pads_and_rounds() {
        assert_eq!(to_cents(Decimal::from(10)).to_string(), "10.00");
        assert_eq!(to_cents(Decimal::new(4_005, 3)).to_string(), "4.01");
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(
            progress_percent(Decimal::from(25), Decimal::from(50)),
            Decimal::from(50)
        );
        assert_eq!(
            progress_percent(Decimal::from(80), Decimal::from(50)),
            Decimal::ONE_HUNDRED
        );
        assert_eq!(
            progress_percent(Decimal::from(-5), Decimal::from(50)),
            Decimal::ZERO
        );
    }

    #[test]
    fn progress_saturates_when_ratio_overflows() {
        let tiny = Decimal::new(1, 10);
        let huge = Decimal::from_scientific("7e28").unwrap();
        assert_eq!(progress_percent(huge, tiny), Decimal::ONE_HUNDRED);
        assert_eq!(progress_percent(Decimal::MAX, tiny), Decimal::ONE_HUNDRED);
        assert_eq!(progress_percent(Decimal::MIN, tiny), Decimal::ZERO);
    }

    #[test]
    fn unrepresentable_remaining_amount_falls_back_to_raw_status() {
        let cfg = status_config(&status("pending"), Decimal::MIN, Decimal::MAX);
        assert_eq!(cfg.label, "pending");
        assert_eq!(cfg.style, StatusStyle::Neutral);
    }

    #[test]
    fn huge_total_reads_ready_to_pay() {
        let cfg = status_config(&status("collecting"), Decimal::MAX, Decimal::from(50));
        assert_eq!(cfg.label, "Prêt à être payé");
    }

    #[test]
    fn progress_with_non_positive_threshold_is_complete() {
        assert_eq!(
            progress_percent(Decimal::ZERO, Decimal::ZERO),
            Decimal::ONE_HUNDRED
        );
    }
}
