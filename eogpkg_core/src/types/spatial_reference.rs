//! The registry of supported spatial reference systems.
//!
//! Only geographic WGS 84 (EPSG:4326) is supported.

use crate::StoreError;
use anyhow::{Result, bail};

/// One row of `gpkg_spatial_ref_sys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialReference {
	pub srs_id: i32,
	pub srs_name: &'static str,
	pub organization: &'static str,
	pub organization_coordsys_id: i32,
	pub definition: &'static str,
}

pub const WGS84: SpatialReference = SpatialReference {
	srs_id: 4326,
	srs_name: "WGS 84",
	organization: "epsg",
	organization_coordsys_id: 4326,
	definition: concat!(
		r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,"#,
		r#"AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,"#,
		r#"AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],"#,
		r#"AUTHORITY["EPSG","4326"]]"#
	),
};

impl SpatialReference {
	pub const SUPPORTED: &'static [SpatialReference] = &[WGS84];

	/// Looks up a supported spatial reference.
	///
	/// # Errors
	/// Returns [`StoreError::Configuration`] for any id other than 4326.
	pub fn from_id(srs_id: i32) -> Result<&'static SpatialReference> {
		match SpatialReference::SUPPORTED.iter().find(|srs| srs.srs_id == srs_id) {
			Some(srs) => Ok(srs),
			None => bail!(StoreError::Configuration(format!(
				"spatial reference {srs_id} is not supported, only EPSG:4326 is"
			))),
		}
	}
}
