//! Print backlight changes as they happen
//!
//! ```text
//! RUST_LOG=linstat=debug cargo run --example watch -- 'intel*'
//! ```
use anyhow::Context;
use linstat::system::class::Backlight;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pattern = std::env::args().nth(1).unwrap_or_else(|| "*".into());
    let watches = Backlight::watch_all(&pattern).context("couldn't list backlights")?;
    if watches.is_empty() {
        println!("no backlight matches `{pattern}`");
        return Ok(());
    }
    let (channels, mut errors, token) = watches.into_parts();

    // Merge every device into one stream for printing
    let (tx, mut rx) = mpsc::channel(channels.len());
    for (name, mut snapshots) in channels {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(bl) = snapshots.recv().await {
                if tx.send((name.clone(), bl)).await.is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some((name, bl)) = rx.recv() => println!(
                "{name}: {}/{} (actual {}, power {}, {})",
                bl.brightness(),
                bl.max_brightness(),
                bl.actual_brightness(),
                bl.bl_power(),
                bl.ty(),
            ),
            Some(err) = errors.recv() => eprintln!("{err}"),
            else => break,
        }
    }
    token.cancel();
    Ok(())
}
