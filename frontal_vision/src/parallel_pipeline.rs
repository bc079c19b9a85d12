// THEORY:
// The ball, yellow goal and blue goal are independent of one another: each
// target's segmentation query and selection is side-effect free. The
// `ParallelFramePipeline` fans the three jobs out onto tokio's blocking pool
// and joins them before anything is encoded.
//
// Ordering guarantees are unchanged from `FramePipeline`:
// - fields are assembled in ball, yellow goal, blue goal order no matter which
//   job finishes first;
// - `run_once` takes `&mut self`, so frame N+1 cannot start before frame N's
//   line has been handed to the transport;
// - if any job fails, the whole frame is dropped and nothing is sent.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{Detection, FramePipeline, FrameResult, Segmenter, Target, select_target};
use crate::transport::Transport;
use std::future::Future;
use std::sync::Arc;
use tracing::trace;

pub struct ParallelFramePipeline<T: Transport> {
    inner: FramePipeline<T>,
    config: Arc<PipelineConfig>,
    frame_counter: u64,
}

impl<T: Transport> ParallelFramePipeline<T> {
    pub fn new(config: PipelineConfig, transport: T) -> Result<Self> {
        let inner = FramePipeline::new(config.clone(), transport)?;
        Ok(Self {
            inner,
            config: Arc::new(config),
            frame_counter: 0,
        })
    }

    fn spawn_target<S>(&self, target: Target, segmenter: Arc<S>) -> impl Future<Output = Result<Option<Detection>>>
    where
        S: Segmenter + Send + Sync + 'static,
    {
        let config = Arc::clone(&self.config);
        let reference = self.inner.reference_point();
        let handle = tokio::task::spawn_blocking(move || -> Result<Option<Detection>> {
            let candidates = segmenter.find_blobs(target.query(&config))?;
            Ok(select_target(target, &candidates, &config, &reference))
        });
        async move { handle.await? }
    }

    /// Segments and selects all three targets concurrently without sending anything.
    pub async fn detect<S>(&self, segmenter: Arc<S>) -> Result<FrameResult>
    where
        S: Segmenter + Send + Sync + 'static,
    {
        let (ball, yellow_goal, blue_goal) = futures::try_join!(
            self.spawn_target(Target::Ball, Arc::clone(&segmenter)),
            self.spawn_target(Target::YellowGoal, Arc::clone(&segmenter)),
            self.spawn_target(Target::BlueGoal, segmenter),
        )?;
        Ok(FrameResult {
            ball,
            yellow_goal,
            blue_goal,
        })
    }

    /// Processes one frame and sends its line.
    pub async fn run_once<S>(&mut self, segmenter: Arc<S>) -> Result<FrameResult>
    where
        S: Segmenter + Send + Sync + 'static,
    {
        let result = self.detect(segmenter).await?;
        self.inner.emit(&result)?;
        self.frame_counter += 1;
        trace!(frame = self.frame_counter, "frame sent");
        Ok(result)
    }

    /// Number of lines handed to the transport so far.
    pub fn frames_sent(&self) -> u64 {
        self.frame_counter
    }

    pub fn transport(&self) -> &T {
        self.inner.transport()
    }

    pub fn into_transport(self) -> T {
        self.inner.into_transport()
    }
}
