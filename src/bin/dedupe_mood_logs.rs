//! Offline dedup pass: for every (user, date) group with more than one mood
//! row, keep the authoritative row and delete the rest. Exclusive,
//! single-run; do not run two maintenance passes against the same table at
//! once.

use moodtrack_api::{config::Config, store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodtrack_api=info".into()),
        )
        .init();

    let config = Config::from_env();
    let store = match store::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match store.dedupe_mood_logs().await {
        Ok(deleted) => println!("Deduplication complete. Deleted {deleted} rows."),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
