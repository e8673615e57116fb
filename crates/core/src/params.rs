//! User-facing generation parameters.

/// Seed value asking the worker to pick a random seed.
pub const RANDOM_SEED: i64 = -1;

/// The full parameter set for one generation request.
///
/// Values are passed through to the worker as-is; the worker owns
/// validation. `Default` mirrors the worker's own defaults, so an empty
/// form submits something sensible.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub prompt: String,
    pub negative_prompt: String,
    /// Checkpoint to generate with; empty means the worker's active model.
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    /// [`RANDOM_SEED`] delegates seed choice to the worker.
    pub seed: i64,
    pub sampler: String,
    pub batch_size: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: String::new(),
            model_id: String::new(),
            width: 512,
            height: 512,
            steps: 30,
            cfg_scale: 7.0,
            seed: RANDOM_SEED,
            sampler: "euler_a".into(),
            batch_size: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_worker_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.width, 512);
        assert_eq!(params.height, 512);
        assert_eq!(params.steps, 30);
        assert_eq!(params.cfg_scale, 7.0);
        assert_eq!(params.seed, RANDOM_SEED);
        assert_eq!(params.sampler, "euler_a");
        assert_eq!(params.batch_size, 1);
    }
}
