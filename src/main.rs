use std::sync::Arc;

use fedmsg_relay::classify::{ClassifyContext, SUPPORTED_TOPICS};
use fedmsg_relay::config::RelayConfig;
use fedmsg_relay::liveness::Liveness;
use fedmsg_relay::queue::HttpTaskQueue;
use fedmsg_relay::relay::EventRouter;
use fedmsg_relay::source::HttpBusSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;

    eprintln!("📨 Fedmsg Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Deployment: {}", config.deployment);
    eprintln!("   Automation user: {}", config.automation_user);
    eprintln!("   Bus: {}", config.bus_url);
    eprintln!("   Broker: {}", config.broker_url);
    eprintln!("   Topics: {} subscribed\n", SUPPORTED_TOPICS.len());

    let queue = Arc::new(HttpTaskQueue::new(&config.broker_url));
    let liveness = Liveness::new(&config.liveness_file);
    let ctx = ClassifyContext::from_config(&config);

    let router = EventRouter::new(queue, liveness, ctx);
    let source = HttpBusSource::new(&config.bus_url);

    router.consume(source).await?;

    Ok(())
}
