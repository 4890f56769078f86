//! Domain logic for the Panieco pickup-point widget: configuration, relay
//! normalization, opening-hours aggregation, group-order status, and cart
//! totals. Pure and synchronous; all I/O lives in `panieco-client`.

pub mod app_config;
pub mod cart;
pub mod config;
pub mod geo;
pub mod group_order;
pub mod hours;
pub mod relay;
pub mod status;

pub use app_config::{Environment, WidgetConfig};
pub use cart::{cart_total, validate_cart, CartError, CartItem};
pub use config::{load_widget_config, load_widget_config_from_env, ConfigError};
pub use geo::distance_km;
pub use group_order::{GroupOrder, GroupOrderStatus};
pub use hours::{format_hours, group_by_day, GroupedDay, GroupedHours, HoursRow, OpeningHour};
pub use relay::{
    normalize_relay, normalize_relays, normalize_relays_with_distance, rank_by_distance,
    RawRelay, Relay,
};
pub use status::{progress_percent, status_config, StatusConfig, StatusStyle};
