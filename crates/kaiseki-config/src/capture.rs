use kaiseki_types::CaptureRegion;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_region() -> CaptureRegion {
    CaptureRegion {
        left: 543,
        top: 1094,
        width: 1943 - 543,
        height: 1336 - 1094,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_region")]
    pub region: CaptureRegion,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
        }
    }
}

impl CaptureConfig {
    pub fn from_vars<F>(vars: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = match vars("CAPTURE_REGION") {
            Some(raw) if !raw.trim().is_empty() => parse_region(&raw)?,
            _ => default_region(),
        };

        Ok(Self { region })
    }
}

/// Parse `left,top,width,height`
pub fn parse_region(raw: &str) -> Result<CaptureRegion, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "CAPTURE_REGION",
        reason,
    };

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [left, top, width, height] = parts.as_slice() else {
        return Err(invalid(format!(
            "expected left,top,width,height but got '{raw}'"
        )));
    };

    let region = CaptureRegion {
        left: left.parse().map_err(|e| invalid(format!("left: {e}")))?,
        top: top.parse().map_err(|e| invalid(format!("top: {e}")))?,
        width: width.parse().map_err(|e| invalid(format!("width: {e}")))?,
        height: height.parse().map_err(|e| invalid(format!("height: {e}")))?,
    };

    if region.is_empty() {
        return Err(invalid("width and height must be non-zero".to_string()));
    }

    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_origin() {
        let region = parse_region("-1920,0,640,480").unwrap();
        assert_eq!(
            region,
            CaptureRegion {
                left: -1920,
                top: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("1,2,3,4,5").is_err());
    }

    #[test]
    fn rejects_zero_size() {
        assert!(parse_region("0,0,0,10").is_err());
    }

    #[test]
    fn rejects_negative_size() {
        assert!(parse_region("0,0,-5,10").is_err());
    }
}
