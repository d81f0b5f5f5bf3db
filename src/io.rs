use std::io::Write;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::homography::ProjectiveTransform;
use crate::types::CalibrationSet;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &str, object: &T) -> Result<(), IoError> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &str) -> Result<T, IoError> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes a human-readable calibration report.
///
/// Lists the solved coefficients and the per-anchor remap error, which for
/// an exactly determined solve should sit at floating-point noise.
pub fn write_calibration_report(
    output_path: &str,
    set: &CalibrationSet,
    transform: &ProjectiveTransform,
) -> Result<(), IoError> {
    let mut s = String::new();
    s += "coefficients (a1, b1, c1, a2, b2, c2, a3, b3):\n";
    for c in transform.coeffs() {
        s += format!("    {:.9}\n", c).as_str();
    }
    s += "\n";
    for pair in &set.pairs {
        let err = transform
            .apply(pair.camera)
            .map(|p| p.distance(pair.display));
        match err {
            Some(err) => {
                s += format!("{:?}:\n", pair.anchor).as_str();
                s += format!(
                    "    camera ({:.2}, {:.2}) -> display ({:.2}, {:.2}), remap error {:.6} px\n",
                    pair.camera.x, pair.camera.y, pair.display.x, pair.display.y, err
                )
                .as_str();
            }
            None => {
                s += format!("{:?}: denominator vanished at the camera point\n", pair.anchor)
                    .as_str();
            }
        }
    }
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(s.as_bytes())?;
    Ok(())
}
