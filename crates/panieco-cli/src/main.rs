mod orders;
mod relays;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use panieco_client::PaniecoClient;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "panieco")]
#[command(about = "Panieco pickup points and group orders from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search pickup points and rank them by distance
    Search {
        /// Free-text query (city, postal code, street)
        query: String,
        /// Latitude of the reference point
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the reference point
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Print the weekly opening hours of each pickup point
        #[arg(long)]
        hours: bool,
    },
    /// List group orders open at a pickup point
    Orders { pickup_point_id: String },
    /// Count group orders for one or more pickup points
    Counts {
        #[arg(required = true)]
        pickup_point_ids: Vec<String>,
    },
    /// Open a new group order at a pickup point
    Create {
        pickup_point_id: String,
        /// JSON file holding the cart items
        #[arg(long)]
        cart: PathBuf,
    },
    /// Show a group order and this shopper's participation
    Show {
        public_id: String,
        #[arg(long)]
        free_shipping_min: Decimal,
    },
    /// Join a group order with the cart
    Join {
        public_id: String,
        #[arg(long)]
        free_shipping_min: Decimal,
        #[arg(long)]
        cart: PathBuf,
    },
    /// Leave a group order
    Leave {
        public_id: String,
        #[arg(long)]
        free_shipping_min: Decimal,
    },
    /// Start the checkout for this shopper's share and print the payment URL
    Pay {
        public_id: String,
        #[arg(long)]
        free_shipping_min: Decimal,
        #[arg(long)]
        cart: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = panieco_core::load_widget_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if config.env.is_production() {
        subscriber.with_ansi(false).compact().init();
    } else {
        subscriber.init();
    }

    let client = Arc::new(
        PaniecoClient::new(&config)
            .map_err(|e| anyhow::anyhow!("failed to build Panieco client: {e}"))?,
    );

    match cli.command {
        Commands::Search {
            query,
            lat,
            lng,
            hours,
        } => relays::run_search(&client, &query, lat, lng, hours).await,
        Commands::Orders { pickup_point_id } => {
            orders::run_orders(&client, &pickup_point_id).await
        }
        Commands::Counts { pickup_point_ids } => {
            orders::run_counts(&client, &pickup_point_ids).await
        }
        Commands::Create {
            pickup_point_id,
            cart,
        } => orders::run_create(&client, &pickup_point_id, &cart).await,
        Commands::Show {
            public_id,
            free_shipping_min,
        } => orders::run_show(client, &public_id, free_shipping_min).await,
        Commands::Join {
            public_id,
            free_shipping_min,
            cart,
        } => orders::run_join(client, &public_id, free_shipping_min, &cart).await,
        Commands::Leave {
            public_id,
            free_shipping_min,
        } => orders::run_leave(client, &public_id, free_shipping_min).await,
        Commands::Pay {
            public_id,
            free_shipping_min,
            cart,
        } => orders::run_pay(client, &public_id, free_shipping_min, &cart).await,
    }
}
