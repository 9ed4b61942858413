//! Tests for the time-of-week feature encoder.


/// Feature order used by the shipped model.
pub(crate) fn canonical_order() -> Vec<String> {
    crate::encoder::TimeFeatures::compute(
        &crate::time::TimeInput::new(0, 0, 0).expect("valid input"),
    )
    .named()
    .iter()
    .map(|(name, _)| name.to_string())
    .collect()
}
