//! Per-call configuration for the contouring entry points.
//!
//! `Options` is a plain immutable value. Every entry point takes it by reference,
//! so nothing is carried over between calls.

use crate::error::{ContourError, Result};
use serde::{Deserialize, Serialize};

/// Output and tracing switches shared by isolines and isobands.
///
/// Serialized keys use camelCase (`linearRing`, `noQuadTree`, `noFrame`), and
/// missing keys fall back to [`Options::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Emit unstitched per-cell polygons instead of traced paths.
    pub polygons: bool,
    /// Close every finished ring by repeating its first point. For isolines this
    /// also enables frame walking; without it lines stop at the grid boundary.
    pub linear_ring: bool,
    /// Never build or consult a QuadTree, even for multi-level calls.
    pub no_quad_tree: bool,
    /// Suppress the enclosing frame polygon.
    pub no_frame: bool,
    /// Log a summary line per pass at info level.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            polygons: false,
            linear_ring: true,
            no_quad_tree: false,
            no_frame: false,
            verbose: false,
        }
    }
}

impl Options {
    /// Parse options from a JSON object such as `{"polygons": true, "noFrame": true}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ContourError::InvalidOptions(e.to_string()))
    }

    /// Per-cell polygon output.
    pub fn polygons() -> Self {
        Self {
            polygons: true,
            ..Self::default()
        }
    }

    /// Traced output without closing points, so isolines stay open at the boundary.
    pub fn open_paths() -> Self {
        Self {
            linear_ring: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert!(!opts.polygons);
        assert!(opts.linear_ring, "rings are closed unless disabled");
        assert!(!opts.no_quad_tree);
        assert!(!opts.no_frame);
        assert!(!opts.verbose);
    }

    #[test]
    fn test_from_json_partial() {
        let opts = Options::from_json(r#"{"polygons": true, "noQuadTree": true}"#).unwrap();
        assert!(opts.polygons);
        assert!(opts.no_quad_tree);
        assert!(opts.linear_ring, "missing keys keep their defaults");
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let opts = Options::from_json(r#"{"linearRing": false, "noFrame": true, "verbose": true}"#)
            .unwrap();
        assert_eq!(
            opts,
            Options {
                linear_ring: false,
                no_frame: true,
                verbose: true,
                ..Options::default()
            }
        );
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let err = Options::from_json(r#"{"polygons": "yes"}"#).unwrap_err();
        assert!(matches!(err, ContourError::InvalidOptions(_)));
    }

    #[test]
    fn test_serialize_round_keys() {
        let json = serde_json::to_value(Options::polygons()).unwrap();
        assert_eq!(json["polygons"], serde_json::json!(true));
        assert_eq!(json["linearRing"], serde_json::json!(true));
    }
}
