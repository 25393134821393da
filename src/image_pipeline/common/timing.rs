use std::time::{Duration, Instant};
use std::collections::HashMap;

use tracing::info;

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub name: String,
    pub duration: Duration,
}

/// Wall time spent in each pipeline stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PipelineTimings {
    stages: Vec<StageTiming>,
    stage_map: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        self.stages.push(StageTiming {
            name: name.clone(),
            duration,
        });
        *self.stage_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    /// Runs `f`, records its wall time under `name` and passes its result through.
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(name);
        let out = f();
        let (name, duration) = timer.stop();
        self.record(name, duration);
        out
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn get_stage(&self, name: &str) -> Option<Duration> {
        self.stage_map.get(name).copied()
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for stage in &self.stages {
            let percentage = if total.as_secs_f64() > 0.0 {
                (stage.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            info!(
                stage = %stage.name,
                "{:>10.3}ms ({:>5.1}%)",
                stage.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        info!("Total pipeline time: {:.3}ms", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}
