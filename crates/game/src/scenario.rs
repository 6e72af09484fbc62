//! Scripted driver input, standing in for a keyboard or gamepad.

use serde::Deserialize;
use vehicle::InputSample;

/// Hold `steer`/`throttle` until `until_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub until_secs: f32,
    pub steer: f32,
    pub throttle: f32,
}

impl ScriptStep {
    pub fn new(until_secs: f32, steer: f32, throttle: f32) -> Self {
        Self {
            until_secs,
            steer,
            throttle,
        }
    }
}

/// Timeline of input steps, sampled once per frame.
#[derive(Debug, Clone)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by(|a, b| a.until_secs.total_cmp(&b.until_secs));
        Self { steps }
    }

    /// Input at `elapsed` seconds. Past the last step the driver lets go.
    pub fn sample(&self, elapsed: f32) -> InputSample {
        self.steps
            .iter()
            .find(|step| elapsed < step.until_secs)
            .map(|step| InputSample::new(step.steer, step.throttle))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_the_active_step() {
        let script = InputScript::new(vec![
            ScriptStep::new(2.0, 0.5, 1.0),
            ScriptStep::new(1.0, 0.0, 0.0),
        ]);
        assert_eq!(script.sample(0.5), InputSample::new(0.0, 0.0));
        assert_eq!(script.sample(1.5), InputSample::new(0.5, 1.0));
        assert_eq!(script.sample(2.5), InputSample::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let script = InputScript::new(vec![ScriptStep::new(1.0, -4.0, 2.0)]);
        assert_eq!(script.sample(0.0), InputSample { steer: -1.0, throttle: 1.0 });
    }
}
