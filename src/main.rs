use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use ulid::Ulid;

use seatwise::config::Config;
use seatwise::engine::SeatingManager;
use seatwise::model::CustomerGroup;
use seatwise::service::{SeatingHandle, SeatingService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    seatwise::observability::init(config.metrics_port)?;

    let manager = SeatingManager::with_sizes(&config.tables)?;
    let handle = SeatingService::spawn(manager, config.queue_depth);
    info!("seatwise ready");
    info!("  tables: {:?}", config.tables);
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
        }
    };
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let reply = execute(&handle, line.trim()).await;
                println!("{reply}");
            }
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("seatwise stopped");
    Ok(())
}

/// Run one line command and render the reply as a JSON line.
async fn execute(handle: &SeatingHandle, line: &str) -> serde_json::Value {
    let mut words = line.split_whitespace();
    let result = match (words.next(), words.next()) {
        (Some("arrive"), Some(size)) => match size.parse::<u32>() {
            Ok(size) => {
                let group = CustomerGroup::new(size);
                handle
                    .arrive(group)
                    .await
                    .map(|table| serde_json::json!({ "group": group.id, "table": table }))
            }
            Err(_) => return error_reply(format!("bad size: {size}")),
        },
        (Some("leave"), Some(id)) => match id.parse::<Ulid>() {
            Ok(id) => handle
                .leave(id)
                .await
                .map(|d| serde_json::json!({ "group": id, "released": d.released })),
            Err(_) => return error_reply(format!("bad group id: {id}")),
        },
        (Some("locate"), Some(id)) => match id.parse::<Ulid>() {
            Ok(id) => handle
                .locate(id)
                .await
                .map(|table| serde_json::json!({ "group": id, "table": table })),
            Err(_) => return error_reply(format!("bad group id: {id}")),
        },
        (Some("stats"), None) => handle.stats().await.map(|s| serde_json::json!(s)),
        (Some("queue"), None) => handle
            .waiting_order()
            .await
            .map(|ids| serde_json::json!({ "waiting": ids })),
        _ => return error_reply(format!("unknown command: {line}")),
    };
    result.unwrap_or_else(|e| error_reply(e.to_string()))
}

fn error_reply(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
