//! Geodetic projector: converts WGS84 (lon, lat) degrees into planar
//! metric coordinates so Euclidean distance approximates transit/walking
//! distance in meters.
//!
//! A pure function wrapper around `proj::Proj` — no per-call I/O, no
//! hidden global state; one `Projector` is built at startup and handed to
//! the graph builder, the index builder, and the query coordinator.

use proj::Proj;

use crate::error::Error;

const SOURCE_CRS: &str = "EPSG:4326";
const DEFAULT_TARGET_CRS: &str = "EPSG:32720";

/// Deterministic WGS84 -> metric-CRS projector.
///
/// Inputs outside the CRS's valid domain still produce finite numbers —
/// `Proj::convert` is not asked to validate geographic range, only to
/// transform it.
pub struct Projector {
    inner: Proj,
    target_crs: String,
}

impl Projector {
    /// Build the default projector (EPSG:4326 -> EPSG:32720).
    pub fn new() -> Result<Self, Error> {
        Self::with_target_crs(DEFAULT_TARGET_CRS)
    }

    /// Build a projector targeting an explicit metric CRS, for
    /// deployments outside the default service area.
    pub fn with_target_crs(target_crs: &str) -> Result<Self, Error> {
        let inner = Proj::new_known_crs(SOURCE_CRS, target_crs, None)?;
        Ok(Self {
            inner,
            target_crs: target_crs.to_string(),
        })
    }

    #[must_use]
    pub fn target_crs(&self) -> &str {
        &self.target_crs
    }

    /// Project a single (lon, lat) pair into planar (x, y) meters.
    pub fn project(&self, lon: f64, lat: f64) -> Result<(f64, f64), Error> {
        self.inner.convert((lon, lat)).map_err(Error::from)
    }

    /// Project a batch of (lon, lat) pairs, in order.
    pub fn project_many(&self, points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, Error> {
        points
            .iter()
            .map(|&(lon, lat)| self.project(lon, lat))
            .collect()
    }
}
