// Optimization run - Progress steps streamed while the optimizer works
use crate::application::input_service::{InputService, SubmitError};
use crate::domain::inputs::{DesalterInputs, OperatingPoint};
use crate::domain::optimization::OptimizationSummary;
use crate::domain::optimizer::{optimize, Objective, OptimizerOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const STEPS: [(&str, &str); 5] = [
    ("Optimizing Process", "Analyzing parameters and calculating optimal settings..."),
    ("Validating Parameters", "Checking parameter ranges and constraints..."),
    ("Running Algorithm", "Applying advanced mathematical models..."),
    ("Generating Results", "Finding the best parameter combination..."),
    ("Complete!", "Optimization complete! Preparing results..."),
];

/// Step at which the optimizer itself runs
const ALGORITHM_STEP: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunMessage {
    Progress {
        step: usize,
        title: &'static str,
        subtitle: &'static str,
    },
    Result {
        summary: OptimizationSummary,
        priorities: Vec<Objective>,
        optimizer: OptimizerOutcome,
        duration_ms: u64,
    },
}

#[derive(Clone)]
pub struct OptimizationService {
    inputs: InputService,
    step_delay: Duration,
    seed: Option<u64>,
}

impl OptimizationService {
    pub fn new(inputs: InputService, step_delay: Duration, seed: Option<u64>) -> Self {
        Self {
            inputs,
            step_delay,
            seed,
        }
    }

    /// Validate and store the form, then start a run.
    ///
    /// Validation and storage failures are returned before anything is
    /// streamed. The returned operating point is the one the run optimizes.
    pub async fn start(
        &self,
        form: &DesalterInputs,
    ) -> Result<(OperatingPoint, mpsc::Receiver<RunMessage>), SubmitError> {
        self.inputs.submit(form).await?;
        let point = self.inputs.load_operating_point().await;
        let priorities = self.inputs.load_priorities().await.objectives();
        let samples = form.n_samples as usize;

        let (tx, rx) = mpsc::channel(16);
        let step_delay = self.step_delay;
        let mut rng = Some(match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        });
        let run_point = point.clone();

        tokio::spawn(async move {
            let started = Instant::now();
            let mut outcome = None;

            for (step, &(title, subtitle)) in STEPS.iter().enumerate() {
                if step > 0 {
                    tokio::time::sleep(step_delay).await;
                }
                let msg = RunMessage::Progress {
                    step,
                    title,
                    subtitle,
                };
                if tx.send(msg).await.is_err() {
                    tracing::debug!("Optimization run abandoned at step {}", step);
                    return;
                }
                if step != ALGORITHM_STEP {
                    continue;
                }
                if let Some(mut rng) = rng.take() {
                    let point = run_point.clone();
                    let keys = priorities.clone();
                    let search = tokio::task::spawn_blocking(move || {
                        optimize(&point, samples, &keys, &mut rng)
                    });
                    match search.await {
                        Ok(found) => outcome = Some(found),
                        Err(e) => {
                            tracing::error!("Optimizer task failed: {}", e);
                            return;
                        }
                    }
                }
            }

            let Some(optimizer) = outcome else {
                return;
            };
            tracing::info!(
                "Optimization run finished: {} samples, {} feasible",
                optimizer.samples,
                optimizer.feasible
            );
            let result = RunMessage::Result {
                summary: OptimizationSummary::compute(&run_point),
                priorities,
                optimizer,
                duration_ms: started.elapsed().as_millis() as u64,
            };
            let _ = tx.send(result).await;
        });

        Ok((point, rx))
    }
}
