//! Detector node: session state and per-frame pipeline

use crate::{NodeConfig, NodeError};
use light_classifier::{CameraFrame, LightClassifier, LightState};
use route_map::{Pose, RouteError, RouteMap};
use state_debounce::{Debouncer, NO_STOP};
use stop_selector::{Selection, StopLine, StopSelector};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Input "topics" feeding the node
pub struct NodeInputs {
    pub pose: mpsc::Receiver<Pose>,
    pub route: mpsc::Receiver<Vec<(f64, f64)>>,
    pub lights: mpsc::Receiver<Vec<LightState>>,
    pub images: mpsc::Receiver<CameraFrame>,
}

/// Sender halves of the input topics, owned by the transport adapters
pub struct NodeChannels {
    pub pose: mpsc::Sender<Pose>,
    pub route: mpsc::Sender<Vec<(f64, f64)>>,
    pub lights: mpsc::Sender<Vec<LightState>>,
    pub images: mpsc::Sender<CameraFrame>,
}

impl NodeChannels {
    /// Create the paired topic channels
    pub fn new(capacity: usize) -> (Self, NodeInputs) {
        let (pose_tx, pose_rx) = mpsc::channel(capacity);
        let (route_tx, route_rx) = mpsc::channel(capacity);
        let (lights_tx, lights_rx) = mpsc::channel(capacity);
        let (images_tx, images_rx) = mpsc::channel(capacity);
        (
            Self {
                pose: pose_tx,
                route: route_tx,
                lights: lights_tx,
                images: images_tx,
            },
            NodeInputs {
                pose: pose_rx,
                route: route_rx,
                lights: lights_rx,
                images: images_rx,
            },
        )
    }
}

/// Traffic-light detector node
///
/// Owns all mutable session state for the single-threaded processing
/// path: latest pose, the route map (built once), the last reported
/// light list, the selector, the debouncer, and the frame counter.
pub struct DetectorNode {
    config: NodeConfig,
    classifier: LightClassifier,
    debouncer: Debouncer,
    pose: Option<Pose>,
    route: Option<RouteMap>,
    selector: Option<StopSelector>,
    lights: Vec<LightState>,
    frame_count: u32,
}

impl DetectorNode {
    /// Create the node from static configuration
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let classifier = LightClassifier::new(config.classifier.clone())?;
        let debouncer = Debouncer::new(config.debounce);
        info!(
            "Detector node starting ({} mode, processing every {} frame(s), {} stop line(s))",
            if config.is_site { "site" } else { "simulation" },
            config.frame_skip(),
            config.stop_lines.len(),
        );

        Ok(Self {
            config,
            classifier,
            debouncer,
            pose: None,
            route: None,
            selector: None,
            lights: Vec::new(),
            frame_count: 0,
        })
    }

    /// Latest vehicle pose, most-recent-wins
    pub fn on_pose(&mut self, pose: Pose) {
        self.pose = Some(pose);
    }

    /// Route delivery; the spatial index is built on the first one only
    pub fn on_route(&mut self, positions: &[(f64, f64)]) -> Result<(), RouteError> {
        if self.route.is_some() {
            debug!("Route already received; keeping existing index");
            return Ok(());
        }

        let route = RouteMap::from_positions(positions)?;
        info!("Route received: {} waypoints, spatial index built", route.len());

        let stop_lines: Vec<StopLine> = self
            .config
            .stop_lines
            .iter()
            .map(|&p| StopLine::from(p))
            .collect();
        self.selector = Some(StopSelector::new(stop_lines, &route));
        self.route = Some(route);
        Ok(())
    }

    /// Current tracked-light list with ground-truth colors
    ///
    /// The list must stay index-aligned with the configured stop lines; a
    /// count mismatch makes selection indexing unsafe and is fatal.
    pub fn on_lights(&mut self, lights: Vec<LightState>) -> Result<(), NodeError> {
        if lights.len() != self.config.stop_lines.len() {
            return Err(NodeError::LightCountMismatch {
                stop_lines: self.config.stop_lines.len(),
                lights: lights.len(),
            });
        }
        self.lights = lights;
        Ok(())
    }

    /// Image delivery; every Nth frame triggers the pipeline and yields a
    /// value to publish
    pub fn on_image(&mut self, frame: &CameraFrame) -> Option<i32> {
        self.frame_count += 1;
        if self.frame_count < self.config.frame_skip() {
            return None;
        }
        self.frame_count = 0;
        Some(self.process(frame))
    }

    /// Run one pipeline cycle: select the upcoming stop line, estimate the
    /// light color, and debounce
    fn process(&mut self, frame: &CameraFrame) -> i32 {
        let selection = self.select_stop_line();
        let raw = match selection {
            Some(sel) => self.light_estimate(frame, sel.stop_line),
            None => LightState::Unknown,
        };
        let stop_waypoint = selection.map(|s| s.waypoint as i32).unwrap_or(NO_STOP);
        self.debouncer.update(raw, stop_waypoint)
    }

    fn select_stop_line(&self) -> Option<Selection> {
        let pose = self.pose.as_ref()?;
        let route = self.route.as_ref()?;
        self.selector.as_ref()?.select(route, pose)
    }

    /// Color estimate for the selected light: classifier output on site,
    /// the simulator's ground truth otherwise
    fn light_estimate(&mut self, frame: &CameraFrame, stop_line: usize) -> LightState {
        let truth = self.lights.get(stop_line).copied();
        if self.config.is_site {
            let predicted = self.classifier.classify(frame);
            if let Some(truth) = truth {
                debug!("True state {}, predicted state {}", truth, predicted);
            }
            predicted
        } else {
            truth.unwrap_or_default()
        }
    }

    /// Route map, once received
    pub fn route(&self) -> Option<&RouteMap> {
        self.route.as_ref()
    }

    /// Event loop: handle inbound signals as they arrive and publish one
    /// integer per triggered pipeline run
    pub async fn run(
        mut self,
        mut inputs: NodeInputs,
        output: mpsc::Sender<i32>,
    ) -> Result<(), NodeError> {
        loop {
            tokio::select! {
                Some(pose) = inputs.pose.recv() => self.on_pose(pose),
                Some(route) = inputs.route.recv() => {
                    if let Err(e) = self.on_route(&route) {
                        warn!("Rejected route delivery: {}", e);
                    }
                }
                Some(lights) = inputs.lights.recv() => self.on_lights(lights)?,
                Some(frame) = inputs.images.recv() => {
                    if let Some(value) = self.on_image(&frame) {
                        if output.send(value).await.is_err() {
                            break;
                        }
                    }
                }
                else => break,
            }
        }
        info!("Detector node stopped");
        Ok(())
    }
}
