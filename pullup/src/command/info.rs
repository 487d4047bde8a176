use pullup_client::settings::Settings;
use pullup_client::ApiProvider;
use eyre::Result;
use std::path::PathBuf;
use time::{Duration, OffsetDateTime};

use crate::VERSION;

fn naive_time_ago(timestamp: OffsetDateTime) -> String {
    let now = OffsetDateTime::now_utc();
    let duration = now - timestamp;

    if duration < Duration::hours(1) {
        format!("{} minutes ago", duration.whole_minutes())
    } else if duration < Duration::days(1) {
        format!("{} hours ago", duration.whole_hours())
    } else {
        format!("{} days ago", duration.whole_days())
    }
}

pub fn run(settings: &Settings, api: &ApiProvider) -> Result<()> {
    let env_config_dir = std::env::var("PULLUP_CONFIG_DIR");

    let config_dir = if let Ok(config_dir) = &env_config_dir {
        PathBuf::from(config_dir)
    } else {
        pullup_common::utils::config_dir()
    };

    let mut config_file = config_dir.clone();
    config_file.push("config.toml");

    let vars = format!(
        "VARS:\nPULLUP_CONFIG_DIR = {:?}",
        env_config_dir.unwrap_or("None".into())
    );
    println!("{vars}\n");

    let mut paths = String::from("PATHS:\n");
    paths.push_str(&format!("config_path: {config_file:?}\n"));
    paths.push_str(&format!("token_path: {:?}", settings.token_path));
    println!("{paths}\n");

    println!("BACKEND:");
    println!("Kind: {}", api.kind());
    println!("Server: {}", settings.server_address);
    println!("Timeout: {}s\n", settings.timeout_secs);

    println!("ACCOUNT:");
    match api.claims() {
        Ok(claims) => {
            println!("Auth: {} {}", claims.role, claims.actor_id);
            let issued = claims
                .issued_at
                .and_then(|v| OffsetDateTime::from_unix_timestamp(v).ok())
                .map(naive_time_ago)
                .unwrap_or("Unknown".into());
            println!("Logged in: {issued}");
        }
        Err(e) if api.is_logged_in() => println!("Auth: unreadable token ({e})"),
        Err(_) => println!("Auth: Unauthenticated"),
    }

    println!();
    println!("Version: {VERSION}");
    Ok(())
}
