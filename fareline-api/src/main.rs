use fareline_api::{Ticketing, TimerGroup};
use fareline_shared::time::{format_date, format_serials, format_time, format_timer};
use fareline_shared::SystemClock;
use fareline_store::{AppConfig, FileBackend};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fareline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "no config files found, using built-in defaults");
        AppConfig::default()
    });

    let backend = Arc::new(FileBackend::open("data")?);
    let service = Arc::new(Ticketing::new(config, backend, Arc::new(SystemClock)));

    // housekeeping a page load would do
    service.sync_statistics();
    let swept = service.sweep_expired_cache();
    if swept > 0 {
        tracing::info!(swept, "dropped stale cache entries");
    }

    let card = service.card_profile();
    println!("Card •••• {} | balance {}", card.card_last4, card.balance);

    let ticket = service.create_ticket("217", 2)?;
    println!(
        "Ticket for vehicle №{} on {} at {}",
        ticket.transport_number,
        format_date(ticket.purchase_time),
        format_time(ticket.purchase_time)
    );
    println!("Serials:\n{}", format_serials(&ticket.serial_numbers));

    let stats = service.compute_statistics();
    println!(
        "Rides today {} / week {} / month {} / total {}, spent {:.2}",
        stats.today, stats.week, stats.month, stats.total, stats.total_spent
    );

    // watch the fresh ticket count down for a few beats, then tear down
    let timers = TimerGroup::new();
    timers.watch(service.clone(), &ticket, |remaining| {
        tracing::info!(countdown = %format_timer(remaining as i64));
    });
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    timers.stop_all();

    Ok(())
}
