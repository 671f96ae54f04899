//! # iso-marching-squares
//!
//! Marching squares over a 2D scalar field, producing **isolines** (contours at
//! one threshold) and **isobands** (regions between two thresholds).
//!
//! Each cell of the grid is classified against the threshold or band, mapped to
//! a shape from a fixed case table and, for ambiguous saddle configurations,
//! resolved by the average of its corners. The resulting edges are stitched into
//! paths by walking from cell to cell, following the grid frame where a contour
//! touches the boundary so that every band region comes out as a closed ring.
//!
//! ## Coordinates and orientation
//!
//! The field is indexed `(x, y)` with `y` growing upward, and output points are
//! in fractional grid units from the bottom-left sample. Every traced path keeps
//! the contour region on its right: outer rings run clockwise, holes
//! counter-clockwise.
//!
//! ## Examples
//!
//! ### Isolines
//!
//! ```rust
//! use iso_marching_squares::{iso_lines, Options, ScalarField};
//!
//! let field = ScalarField::new(vec![
//!     vec![1.0, 1.0, 1.0],
//!     vec![1.0, 5.0, 1.0],
//!     vec![1.0, 1.0, 1.0],
//! ]).unwrap();
//!
//! let rings = iso_lines(&field, 3.0, &Options::default()).unwrap();
//! assert_eq!(rings.len(), 1);
//! ```
//!
//! ### Isobands at several levels
//!
//! Multi-level calls index the field with a [`QuadTree`] once and reuse it for
//! every band. A prebuilt tree can also be passed directly.
//!
//! ```rust
//! use iso_marching_squares::{iso_bands_multi, Options, QuadTree};
//!
//! let tree = QuadTree::from_rows(vec![
//!     vec![0.0, 1.0, 2.0],
//!     vec![1.0, 2.0, 3.0],
//!     vec![2.0, 3.0, 4.0],
//! ]).unwrap();
//!
//! let bands = iso_bands_multi(&tree, &[0.0, 2.0], &[2.0], &Options::default()).unwrap();
//! assert_eq!(bands.len(), 2);
//! ```
//!
//! ### GeoJSON output
//!
//! ```rust
//! use iso_marching_squares::{features, iso_bands, Options, ScalarField};
//!
//! let field = ScalarField::new(vec![vec![0.0, 10.0], vec![10.0, 20.0]]).unwrap();
//! let paths = iso_bands(&field, 5.0, 10.0, &Options::default()).unwrap();
//! let feature = features::bands_feature(&paths, 5.0, 15.0);
//! assert!(feature.geometry.is_some());
//! ```
//!
//! ## Logging
//!
//! Pass timings go to `tracing` at debug level, per-pass summaries at info level
//! when [`Options::verbose`] is set. The library installs no subscriber.

pub mod cell;
pub mod edge;
pub mod error;
pub mod features;
pub mod field;
pub mod interpolation;
pub mod line_shape;
pub mod marching_squares;
pub mod options;
pub mod point;
pub mod quadtree;
pub mod saddle;
pub mod shape;
pub mod tracer;

pub use cell::{Band, Cell, Trit};
pub use error::{ContourError, Result};
pub use field::ScalarField;
pub use marching_squares::{
    iso_bands, iso_bands_multi, iso_bands_with, iso_lines, iso_lines_multi, iso_lines_with, Input,
};
pub use options::Options;
pub use point::{is_closed, signed_area, Path, Point};
pub use quadtree::{QuadNode, QuadTree};
