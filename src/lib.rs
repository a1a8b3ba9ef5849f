pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod report;
pub mod scenario;

pub use crate::scenario::{RunResults, Scenario};

use crate::errors::{EnergiekompasError, OutputError};
use crate::input::{ingest_for_processing, CalculationInput};
use crate::output::Output;
use std::io::Read;

/// Estimate annual energy costs and DPE grade for one input snapshot.
/// Pure: no I/O, no state, same input always yields the same results.
pub fn estimate(input: &CalculationInput) -> RunResults {
    Scenario::from_input(input).run()
}

/// Ingest a JSON calculation request, run the estimation, and write the
/// result artefacts to the given output.
pub fn run_project(
    input: impl Read,
    output: impl Output,
) -> Result<RunResults, EnergiekompasError> {
    let calculation_input = ingest_for_processing(input)?;
    let scenario = Scenario::from_input(&calculation_input);
    let results = scenario.run();
    report::write_results(&output, &scenario, &results)
        .map_err(|error| EnergiekompasError::FailureInOutput(OutputError::new(error)))?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SinkOutput;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn run_project_accepts_a_minimal_request() {
        let results = run_project(
            r#"{"building": {"floor_area": 120}}"#.as_bytes(),
            SinkOutput,
        )
        .unwrap();
        assert!(results.costs.total_cost > 0.);
    }

    #[rstest]
    fn run_project_rejects_malformed_json() {
        let result = run_project(r#"{"building": }"#.as_bytes(), SinkOutput);
        assert!(matches!(
            result,
            Err(EnergiekompasError::InvalidRequest(_))
        ));
    }

    #[rstest]
    fn estimate_matches_run_project() {
        let raw = r#"{"building": {"floor_area": 120}}"#;
        let input: CalculationInput = serde_json::from_str(raw).unwrap();
        let from_estimate = estimate(&input);
        let from_run = run_project(raw.as_bytes(), SinkOutput).unwrap();
        assert_eq!(
            from_estimate.costs.total_cost,
            from_run.costs.total_cost
        );
        assert_eq!(from_estimate.dpe.class, from_run.dpe.class);
    }
}
