//! Quadrant path resolution.
//!
//! Maps a numeric set key to the four absolute file paths that make up the
//! comparison set. Pure path construction: no existence checks are performed
//! here, so the resolved paths may point to files that do not exist yet.
//!
//! # Filename Convention
//!
//! | Quadrant     | Directory       | Filename                                                    |
//! |--------------|-----------------|-------------------------------------------------------------|
//! | top-left     | reference dir   | `{key}-4x_cropped.png`                                      |
//! | top-right    | reference dir   | `{key}-20x.png`                                             |
//! | bottom-left  | variant dir 1   | `{key}-4x_cropped_HAT_RAW_FDL_grayscale_v2_TEST.png`        |
//! | bottom-right | variant dir 2   | `{key}-4x_cropped_HAT_DUAL_earlyfusion_FDL_grayscale_v2_TEST.png` |

use std::path::{Path, PathBuf};

// =============================================================================
// Quadrant
// =============================================================================

/// One of the four fixed display positions of a comparison set.
///
/// Each quadrant is bound to a specific source directory and filename suffix.
/// The enumeration is fixed; quadrants are not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Reference image, cropped 4x magnification.
    TopLeft,
    /// Reference image, 20x magnification.
    TopRight,
    /// First algorithm-output variant.
    BottomLeft,
    /// Second algorithm-output variant.
    BottomRight,
}

impl Quadrant {
    /// All four quadrants in display order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// The short wire code used in URLs and JSON ("tl", "tr", "bl", "br").
    pub fn code(&self) -> &'static str {
        match self {
            Quadrant::TopLeft => "tl",
            Quadrant::TopRight => "tr",
            Quadrant::BottomLeft => "bl",
            Quadrant::BottomRight => "br",
        }
    }

    /// Parse a wire code into a quadrant.
    ///
    /// Returns `None` for anything other than "tl", "tr", "bl" or "br".
    pub fn from_code(code: &str) -> Option<Quadrant> {
        match code {
            "tl" => Some(Quadrant::TopLeft),
            "tr" => Some(Quadrant::TopRight),
            "bl" => Some(Quadrant::BottomLeft),
            "br" => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// The filename for this quadrant given a set key.
    pub fn filename(&self, key: &str) -> String {
        match self {
            Quadrant::TopLeft => format!("{key}-4x_cropped.png"),
            Quadrant::TopRight => format!("{key}-20x.png"),
            Quadrant::BottomLeft => {
                format!("{key}-4x_cropped_HAT_RAW_FDL_grayscale_v2_TEST.png")
            }
            Quadrant::BottomRight => {
                format!("{key}-4x_cropped_HAT_DUAL_earlyfusion_FDL_grayscale_v2_TEST.png")
            }
        }
    }
}

// =============================================================================
// QuadrantPaths
// =============================================================================

/// The four resolved absolute paths for one set key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadrantPaths {
    pub tl: PathBuf,
    pub tr: PathBuf,
    pub bl: PathBuf,
    pub br: PathBuf,
}

impl QuadrantPaths {
    /// Get the path for a specific quadrant.
    pub fn get(&self, quadrant: Quadrant) -> &Path {
        match quadrant {
            Quadrant::TopLeft => &self.tl,
            Quadrant::TopRight => &self.tr,
            Quadrant::BottomLeft => &self.bl,
            Quadrant::BottomRight => &self.br,
        }
    }

    /// Iterate over all four (quadrant, path) pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &Path)> {
        Quadrant::ALL.iter().map(move |&q| (q, self.get(q)))
    }

    /// Whether all four files exist on disk.
    pub fn all_exist(&self) -> bool {
        self.iter().all(|(_, path)| path.exists())
    }
}

// =============================================================================
// PathResolver
// =============================================================================

/// Resolves set keys to quadrant file paths.
///
/// Holds the three directory roots and builds the four expected paths by
/// string-formatting the key into the per-quadrant filename templates.
#[derive(Debug, Clone)]
pub struct PathResolver {
    reference_dir: PathBuf,
    variant_dir_1: PathBuf,
    variant_dir_2: PathBuf,
}

impl PathResolver {
    /// Create a resolver over the three source directories.
    pub fn new(
        reference_dir: impl Into<PathBuf>,
        variant_dir_1: impl Into<PathBuf>,
        variant_dir_2: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reference_dir: reference_dir.into(),
            variant_dir_1: variant_dir_1.into(),
            variant_dir_2: variant_dir_2.into(),
        }
    }

    /// The reference directory (basis for set discovery).
    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    /// The first variant directory.
    pub fn variant_dir_1(&self) -> &Path {
        &self.variant_dir_1
    }

    /// The second variant directory.
    pub fn variant_dir_2(&self) -> &Path {
        &self.variant_dir_2
    }

    /// Resolve the four expected paths for a set key.
    ///
    /// Always returns four paths; they may point to nonexistent files.
    pub fn resolve(&self, key: &str) -> QuadrantPaths {
        QuadrantPaths {
            tl: self.reference_dir.join(Quadrant::TopLeft.filename(key)),
            tr: self.reference_dir.join(Quadrant::TopRight.filename(key)),
            bl: self.variant_dir_1.join(Quadrant::BottomLeft.filename(key)),
            br: self.variant_dir_2.join(Quadrant::BottomRight.filename(key)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
