// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// How a construction wave picks ready resources from the topological order.
///
/// - `Conservative`: stop scanning at the first resource whose dependencies
///   are not all built yet (default). Later waves pick up the remainder.
/// - `Full`: scan the whole order and take every ready resource. Same final
///   result, possibly fewer waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveScan {
    #[default]
    Conservative,
    Full,
}

impl FromStr for WaveScan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(WaveScan::Conservative),
            "full" => Ok(WaveScan::Full),
            other => Err(format!(
                "invalid wave_scan: {other} (expected \"conservative\" or \"full\")"
            )),
        }
    }
}
