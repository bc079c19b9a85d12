// THEORY:
// The `pipeline` module is the top-level API of the vision front-end. One call
// to `FramePipeline::run_once` processes one frame end to end:
//
//   segmentation → selection → geometry → encoding → transport
//
// Key architectural principles:
// 1.  **Injected Collaborators**: The segmentation backend and the transport are
//     passed in, never global. Tests drive the pipeline with scripted fakes and
//     an in-memory transport.
// 2.  **No Memory**: Nothing is carried from one frame to the next. Running the
//     pipeline twice on the same blob lists produces byte-identical lines.
// 3.  **Fixed Order**: Targets are always processed and emitted as ball, yellow
//     goal, blue goal.
// 4.  **All or Nothing**: A collaborator failure aborts the frame before anything
//     is written, so a partial line never reaches the controller.

use crate::config::{BlobQuery, PipelineConfig};
use crate::core_modules::ball_selector::{BallRange, ball_selector};
use crate::core_modules::blob::Blob;
use crate::core_modules::encoder::encoder;
use crate::core_modules::geometry::{Polar, ReferencePoint};
use crate::core_modules::goal_selector::goal_selector;
use crate::error::Result;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{debug, trace};

/// The segmentation collaborator for the current frame.
pub trait Segmenter {
    fn find_blobs(&self, query: &BlobQuery) -> Result<Vec<Blob>>;
}

impl<S: Segmenter + ?Sized> Segmenter for &S {
    fn find_blobs(&self, query: &BlobQuery) -> Result<Vec<Blob>> {
        (**self).find_blobs(query)
    }
}

impl<S: Segmenter + ?Sized> Segmenter for Arc<S> {
    fn find_blobs(&self, query: &BlobQuery) -> Result<Vec<Blob>> {
        (**self).find_blobs(query)
    }
}

/// The three objects the robot looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Ball,
    YellowGoal,
    BlueGoal,
}

impl Target {
    /// Processing and wire order.
    pub const ALL: [Target; 3] = [Target::Ball, Target::YellowGoal, Target::BlueGoal];

    pub fn query(self, config: &PipelineConfig) -> &BlobQuery {
        match self {
            Target::Ball => &config.ball,
            Target::YellowGoal => &config.yellow_goal,
            Target::BlueGoal => &config.blue_goal,
        }
    }
}

/// An accepted blob and where it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub blob: Blob,
    pub position: Polar,
}

/// The output of one frame, in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameResult {
    pub ball: Option<Detection>,
    pub yellow_goal: Option<Detection>,
    pub blue_goal: Option<Detection>,
}

impl FrameResult {
    pub fn get(&self, target: Target) -> Option<&Detection> {
        match target {
            Target::Ball => self.ball.as_ref(),
            Target::YellowGoal => self.yellow_goal.as_ref(),
            Target::BlueGoal => self.blue_goal.as_ref(),
        }
    }

    /// The wire line for this frame; absent targets become `0 0`.
    pub fn encode(&self) -> Vec<u8> {
        encoder::encode(
            self.ball.as_ref().map(|d| d.position),
            self.yellow_goal.as_ref().map(|d| d.position),
            self.blue_goal.as_ref().map(|d| d.position),
        )
    }
}

/// Runs the selector for `target` over its candidates and locates the winner.
pub fn select_target(
    target: Target,
    candidates: &[Blob],
    config: &PipelineConfig,
    reference: &ReferencePoint,
) -> Option<Detection> {
    trace!(?target, candidates = candidates.len(), "selecting");
    let blob = match target {
        Target::Ball => {
            let selection = ball_selector::select(candidates, &config.ball_policy, reference)?;
            debug!(
                near = selection.range == BallRange::Near,
                area = selection.blob.area,
                roundness = selection.blob.roundness,
                "ball accepted"
            );
            selection.blob
        }
        Target::YellowGoal | Target::BlueGoal => goal_selector::select_largest(candidates)?.clone(),
    };
    let position = reference.polar(blob.cx(), blob.cy());
    Some(Detection { blob, position })
}

/// The main, top-level struct for the vision front-end.
pub struct FramePipeline<T: Transport> {
    config: PipelineConfig,
    reference: ReferencePoint,
    transport: T,
}

impl<T: Transport> FramePipeline<T> {
    pub fn new(config: PipelineConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let reference = config.reference_point();
        Ok(Self {
            config,
            reference,
            transport,
        })
    }

    /// Segments and selects all three targets without sending anything.
    pub fn detect<S: Segmenter + ?Sized>(&self, segmenter: &S) -> Result<FrameResult> {
        let mut result = FrameResult::default();
        for target in Target::ALL {
            let candidates = segmenter.find_blobs(target.query(&self.config))?;
            let detection = select_target(target, &candidates, &self.config, &self.reference);
            match target {
                Target::Ball => result.ball = detection,
                Target::YellowGoal => result.yellow_goal = detection,
                Target::BlueGoal => result.blue_goal = detection,
            }
        }
        Ok(result)
    }

    /// Processes one frame and sends its line.
    pub fn run_once<S: Segmenter + ?Sized>(&mut self, segmenter: &S) -> Result<FrameResult> {
        let result = self.detect(segmenter)?;
        self.emit(&result)?;
        Ok(result)
    }

    pub(crate) fn emit(&mut self, result: &FrameResult) -> Result<()> {
        let line = result.encode();
        debug!(line = %String::from_utf8_lossy(&line).trim_end(), "sending");
        self.transport.send(&line)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reference_point(&self) -> ReferencePoint {
        self.reference
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
