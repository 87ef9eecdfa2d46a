//! Reference catalog compiled into the binary so campaigns run without data files.

use crate::data::team::CatalogFile;
use crate::error::{Result, SimError};

pub const REFERENCE_CATALOG_YAML: &str = include_str!("../../data/t20_world_cup_2026.yaml");

pub fn reference_catalog() -> Result<CatalogFile> {
    serde_yaml::from_str(REFERENCE_CATALOG_YAML)
        .map_err(|err| SimError::parse("<builtin catalog>", err))
}
