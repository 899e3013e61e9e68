// Predict request handler
//
// The single predict operation, independent of any UI toolkit: raw field
// text in schema order goes in, a display string comes out. The TUI and
// the `predict` subcommand both call through here.

use ndarray::Array1;

use crate::errors::InputError;
use crate::training::TrainedBundle;

/// Display string for a positive prediction.
pub const FRAUD: &str = "Fraud";
/// Display string for a negative prediction.
pub const NOT_FRAUD: &str = "Not Fraud";

/// Parse the raw field values, classify the resulting vector, and format
/// the result for display.
///
/// Values must arrive in schema order, the same order the form renders
/// its fields and the model was trained on. Each predict request is
/// independent and stateless.
pub fn on_predict_requested(
    bundle: &TrainedBundle,
    raw_values: &[String],
) -> Result<String, InputError> {
    let vector = parse_feature_vector(&bundle.schema, raw_values)?;
    let label = bundle.model.predict_row(&vector.view());
    Ok(format_result(label))
}

/// Parse every raw field into an `f32`, failing on the first field that is
/// not a number and naming it in the error.
pub fn parse_feature_vector(
    schema: &[String],
    raw_values: &[String],
) -> Result<Array1<f32>, InputError> {
    if raw_values.len() != schema.len() {
        return Err(InputError::FieldCountMismatch {
            expected: schema.len(),
            actual: raw_values.len(),
        });
    }

    let mut parsed = Vec::with_capacity(raw_values.len());
    for (name, raw) in schema.iter().zip(raw_values) {
        // Finite numbers only; "NaN"/"inf" parse but cannot be classified
        let value = raw
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| InputError::NotNumeric {
                field: name.clone(),
                value: raw.clone(),
            })?;
        parsed.push(value);
    }
    Ok(Array1::from_vec(parsed))
}

/// Map a binary label to the result text shown to the user.
pub fn format_result(label: usize) -> String {
    let class = if label == 1 { FRAUD } else { NOT_FRAUD };
    format!("The predicted class is: {class}")
}
