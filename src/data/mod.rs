pub mod builtin;
pub mod registry;
pub mod team;
pub mod validate;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Result, SimError};

pub use builtin::reference_catalog;
pub use registry::{Group, TeamId, TeamRegistry, VenueProfile};
pub use team::{load_catalog, CatalogFile, Competitor, Condition, ScheduleSpec, VenueSpec};
pub use validate::{validate_catalog, ValidationDiagnostic, ValidationReport, ValidationSeverity};

/// Read a YAML (`.yaml`/`.yml`) or JSON document, chosen by file extension.
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|err| SimError::io(path, err))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|err| SimError::parse(path, err))
    } else {
        serde_json::from_str(&raw).map_err(|err| SimError::parse(path, err))
    }
}
