//! Offline normalize pass: recompute canonical labels, rescaled scores, and
//! canonical meta.selected_mood for every mood row, updating only rows that
//! actually change. Exclusive, single-run.

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

    match store.normalize_mood_logs().await {
        Ok(updated) => println!("Normalization complete. Updated {updated} rows."),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
