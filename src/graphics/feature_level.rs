//! Direct3D feature levels and device-creation negotiation.
//!
//! The device is created at the highest level the adapter accepts. Levels are
//! always tried from highest to lowest regardless of the order they were
//! configured in.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capability tier requested when creating the device.
///
/// Variants are declared lowest first so the derived `Ord` matches the
/// capability order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureLevel {
    #[serde(rename = "11_0")]
    Level11_0,
    #[serde(rename = "11_1")]
    Level11_1,
    #[serde(rename = "12_0")]
    Level12_0,
    #[serde(rename = "12_1")]
    Level12_1,
}

impl FeatureLevel {
    /// Every supported level, highest first.
    pub const ALL_DESCENDING: [FeatureLevel; 4] = [
        FeatureLevel::Level12_1,
        FeatureLevel::Level12_0,
        FeatureLevel::Level11_1,
        FeatureLevel::Level11_0,
    ];

    /// Major and minor version of the level.
    pub fn version(&self) -> (u32, u32) {
        match self {
            FeatureLevel::Level11_0 => (11, 0),
            FeatureLevel::Level11_1 => (11, 1),
            FeatureLevel::Level12_0 => (12, 0),
            FeatureLevel::Level12_1 => (12, 1),
        }
    }

    #[cfg(windows)]
    pub fn to_d3d(self) -> windows::Win32::Graphics::Direct3D::D3D_FEATURE_LEVEL {
        use windows::Win32::Graphics::Direct3D::{
            D3D_FEATURE_LEVEL_11_0, D3D_FEATURE_LEVEL_11_1, D3D_FEATURE_LEVEL_12_0,
            D3D_FEATURE_LEVEL_12_1,
        };

        match self {
            FeatureLevel::Level11_0 => D3D_FEATURE_LEVEL_11_0,
            FeatureLevel::Level11_1 => D3D_FEATURE_LEVEL_11_1,
            FeatureLevel::Level12_0 => D3D_FEATURE_LEVEL_12_0,
            FeatureLevel::Level12_1 => D3D_FEATURE_LEVEL_12_1,
        }
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor) = self.version();
        write!(f, "{}.{}", major, minor)
    }
}

/// Sort and deduplicate levels, highest first.
pub fn descending(levels: &[FeatureLevel]) -> Vec<FeatureLevel> {
    let mut sorted = levels.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

/// Every level was tried and none produced a device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no feature level accepted ({})", describe_attempts(.attempts))]
pub struct NegotiationFailed {
    /// Each level tried with the error it returned, in try order
    pub attempts: Vec<(FeatureLevel, String)>,
}

fn describe_attempts(attempts: &[(FeatureLevel, String)]) -> String {
    if attempts.is_empty() {
        return "no levels configured".to_string();
    }
    attempts
        .iter()
        .map(|(level, err)| format!("{}: {}", level, err))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Try `attempt` for each level from highest to lowest and return the first
/// success together with the level that produced it.
pub fn negotiate<T, E, F>(levels: &[FeatureLevel], mut attempt: F) -> Result<(FeatureLevel, T), NegotiationFailed>
where
    E: fmt::Debug,
    F: FnMut(FeatureLevel) -> Result<T, E>,
{
    let mut attempts = Vec::new();

    for level in descending(levels) {
        match attempt(level) {
            Ok(value) => {
                log::debug!("[negotiate] Feature level {} accepted", level);
                return Ok((level, value));
            }
            Err(e) => {
                log::debug!("[negotiate] Feature level {} rejected: {:?}", level, e);
                attempts.push((level, format!("{:?}", e)));
            }
        }
    }

    Err(NegotiationFailed { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_capability() {
        assert!(FeatureLevel::Level12_1 > FeatureLevel::Level12_0);
        assert!(FeatureLevel::Level12_0 > FeatureLevel::Level11_1);
        assert!(FeatureLevel::Level11_1 > FeatureLevel::Level11_0);
    }

    #[test]
    fn all_descending_is_sorted() {
        assert_eq!(
            descending(&FeatureLevel::ALL_DESCENDING),
            FeatureLevel::ALL_DESCENDING.to_vec()
        );
    }

    #[test]
    fn descending_sorts_and_dedups() {
        let levels = [
            FeatureLevel::Level11_0,
            FeatureLevel::Level12_1,
            FeatureLevel::Level11_0,
            FeatureLevel::Level12_0,
        ];
        assert_eq!(
            descending(&levels),
            vec![
                FeatureLevel::Level12_1,
                FeatureLevel::Level12_0,
                FeatureLevel::Level11_0
            ]
        );
    }

    #[test]
    fn display_uses_dotted_version() {
        assert_eq!(FeatureLevel::Level12_1.to_string(), "12.1");
        assert_eq!(FeatureLevel::Level11_0.to_string(), "11.0");
    }

    #[test]
    fn serde_uses_underscored_names() {
        let json = serde_json::to_string(&FeatureLevel::Level11_1).unwrap();
        assert_eq!(json, "\"11_1\"");

        let level: FeatureLevel = serde_json::from_str("\"12_0\"").unwrap();
        assert_eq!(level, FeatureLevel::Level12_0);

        assert!(serde_json::from_str::<FeatureLevel>("\"10_0\"").is_err());
    }

    #[test]
    fn negotiate_stops_at_first_success() {
        let mut tried = Vec::new();
        let result = negotiate(&FeatureLevel::ALL_DESCENDING, |level| {
            tried.push(level);
            if level <= FeatureLevel::Level12_0 {
                Ok("device")
            } else {
                Err("unsupported")
            }
        });

        assert_eq!(result, Ok((FeatureLevel::Level12_0, "device")));
        assert_eq!(tried, vec![FeatureLevel::Level12_1, FeatureLevel::Level12_0]);
    }

    #[test]
    fn negotiate_tries_highest_first_even_if_configured_ascending() {
        let mut tried = Vec::new();
        let ascending = [FeatureLevel::Level11_0, FeatureLevel::Level12_1];
        let result = negotiate(&ascending, |level| {
            tried.push(level);
            Ok::<_, ()>(())
        });

        assert_eq!(result.map(|(level, _)| level), Ok(FeatureLevel::Level12_1));
        assert_eq!(tried, vec![FeatureLevel::Level12_1]);
    }

    #[test]
    fn negotiate_reports_every_failed_attempt() {
        let err = negotiate(&FeatureLevel::ALL_DESCENDING, |_| Err::<(), _>("E_FAIL"))
            .unwrap_err();

        assert_eq!(err.attempts.len(), 4);
        assert_eq!(err.attempts[0].0, FeatureLevel::Level12_1);
        assert_eq!(err.attempts[3].0, FeatureLevel::Level11_0);
        assert!(err.to_string().contains("11.0"));
    }

    #[test]
    fn negotiate_with_no_levels_fails() {
        let err = negotiate(&[], |_| Ok::<_, ()>(())).unwrap_err();
        assert!(err.attempts.is_empty());
        assert!(err.to_string().contains("no levels configured"));
    }
}
