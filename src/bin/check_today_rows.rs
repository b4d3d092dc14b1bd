//! Diagnostic: list today's mood row groups per user, with member ids.
//! Useful for eyeballing duplicate buildup before running the dedup pass.

use chrono::Utc;

use moodtrack_api::{config::Config, store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let store = match store::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let today = Utc::now().date_naive();
    match store.mood_row_groups(today).await {
        Ok(groups) => {
            for group in groups {
                println!(
                    "user_id={} date={} count={} ids={}",
                    group.user_id, group.date, group.count, group.ids
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
