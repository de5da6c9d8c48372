use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moodflix-bff")]
#[command(about = "Backend-for-frontend for mood-based movie recommendations", long_about = None)]
struct Args {
    /// Optional YAML config file
    #[arg(short, long)]
    config: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "moodflix=info,tower_http=info".into());

    if args.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = moodflix::run(args.config.as_deref()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
