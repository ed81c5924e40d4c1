//! Traffic-Light Detector - Main Entry Point

use detector_node::{init_logging, DetectorNode, NodeChannels, NodeConfig};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Traffic Light Detector v{} ===", env!("CARGO_PKG_VERSION"));

    let config = NodeConfig::load("tl_detector")?;
    let node = DetectorNode::new(config)?;

    // Transport adapters feed `channels`; the node publishes the stop
    // waypoint (or -1) once per triggered cycle
    let (channels, inputs) = NodeChannels::new(64);
    let (output_tx, mut output_rx) = mpsc::channel(16);
    let node_task = tokio::spawn(node.run(inputs, output_tx));

    tokio::spawn(async move {
        while let Some(waypoint) = output_rx.recv().await {
            info!("Traffic waypoint: {}", waypoint);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down detector node");
    drop(channels);
    node_task.await??;

    Ok(())
}
