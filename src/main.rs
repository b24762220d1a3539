//! Scripted demo: drives a session through a short lesson with a stdout
//! renderer, so the scheduling behavior can be watched without a browser
//! shell or a live vendor bridge.

use anyhow::Result;
use chalkboard::{
    AudioChunk, Config, ConnectionStatus, NullSink, Point, Session, StdoutRenderer,
    VisualInstruction,
};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// 200ms of a 440Hz tone at the configured sample rate.
fn tone_chunk(sample_rate: u32) -> AudioChunk {
    let samples: Vec<i16> = (0..sample_rate / 5)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            ((t * 440.0 * std::f64::consts::TAU).sin() * 3000.0) as i16
        })
        .collect();
    AudioChunk::from_samples(&samples)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load_or_default(Path::new("chalkboard.toml"))?.with_env_overrides();
    config.validate()?;

    let handle = Session::spawn(
        &config,
        Box::new(StdoutRenderer::new(&config.graph)),
        Box::new(NullSink),
    );

    handle.set_status(ConnectionStatus::Connected).await?;

    // Visuals arriving before any narration audio queue up...
    handle
        .offer_visual(VisualInstruction::ShapeDraw {
            shape: "triangle".to_string(),
            vertices: vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 3.0),
            ],
            color: "#4dd0e1".to_string(),
        })
        .await?;

    // ...until the first chunk establishes the timeline and flushes them.
    for _ in 0..5 {
        handle.offer_audio(tone_chunk(config.audio.sample_rate)).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    handle
        .offer_visual(VisualInstruction::GraphDraw {
            expression: "x * x - 2.0".to_string(),
            domain: [-3.0, 3.0],
            color: "#ffb74d".to_string(),
        })
        .await?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    let mut snapshots = handle.subscribe();
    handle
        .offer_visual(VisualInstruction::SequenceAnimate {
            title: "Solve 2x + 5 = 13".to_string(),
            steps: vec![
                "Subtract 5 from both sides".to_string(),
                "Divide both sides by 2".to_string(),
                "x = 4".to_string(),
            ],
        })
        .await?;

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        println!(
            "[pages] '{}' page {}/{} revealed {:?} animating={}",
            snapshot.title,
            snapshot.current_page + 1,
            snapshot.page_count.max(1),
            snapshot.revealed,
            snapshot.is_animating
        );
        if !snapshot.is_animating
            && !snapshot.revealed.is_empty()
            && snapshot.revealed.iter().all(|r| *r)
        {
            break;
        }
    }

    handle.set_status(ConnectionStatus::Disconnected).await?;
    handle.shutdown().await;
    Ok(())
}
