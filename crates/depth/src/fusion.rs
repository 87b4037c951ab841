//! Fusion of the accelerometer and barometer depth curves.

use contracts::{ContractError, DepthMethod, DepthSource};
use tracing::debug;

use crate::DepthProfile;

/// Sample-wise mean of two zero-referenced depth curves.
///
/// The motion window and velocity tolerance are taken from `primary`. Both
/// inputs stay untouched; the result owns a fresh curve.
pub fn fuse(primary: &DepthProfile, secondary: &DepthProfile) -> Result<DepthProfile, ContractError> {
    if primary.values().len() != secondary.values().len() {
        return Err(ContractError::length_mismatch(
            "fused depth",
            primary.values().len(),
            secondary.values().len(),
        ));
    }

    let values = primary
        .values()
        .iter()
        .zip(secondary.values())
        .map(|(a, b)| (a + b) / 2.0)
        .collect();
    let depth = primary.depth().with_values(values)?;
    debug!(
        start = primary.start(),
        stop = primary.stop(),
        "accelerometer and barometer depth fused"
    );

    Ok(DepthProfile::new(
        DepthSource::Fused,
        depth,
        primary.start(),
        primary.stop(),
        primary.tolerance(),
    ))
}

/// Choose the reported depth curve for `method` from whichever estimators
/// are available.
///
/// `Fused` averages both when present and otherwise uses the one that exists;
/// a specific estimator falls back to the other when it is missing.
pub fn select_depth(
    method: DepthMethod,
    accelerometer: Option<&DepthProfile>,
    barometer: Option<&DepthProfile>,
) -> Result<Option<DepthProfile>, ContractError> {
    let selected = match (method, accelerometer, barometer) {
        (DepthMethod::Fused, Some(acc), Some(baro)) => Some(fuse(acc, baro)?),
        (DepthMethod::Barometer, _, Some(baro)) => Some(baro.clone()),
        (_, Some(acc), _) => Some(acc.clone()),
        (_, None, baro) => baro.cloned(),
    };
    Ok(selected)
}
