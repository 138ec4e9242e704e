//! Model artifact loading.

use std::path::Path;

use tracing::info;

use wattcast_ai::{ModelArtifact, Regressor};

use crate::error::InfraError;

/// Read and validate the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<ModelArtifact, InfraError> {
    if !path.exists() {
        return Err(InfraError::ModelMissing {
            path: path.to_path_buf(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|source| InfraError::Io {
        artifact: "model",
        path: path.to_path_buf(),
        source,
    })?;

    let model = ModelArtifact::from_json(&json).map_err(|source| InfraError::ModelMalformed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        kind = model.kind(),
        features = model.n_features(),
        "loaded model artifact"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("energy_model.json")).unwrap_err();
        assert!(matches!(err, InfraError::ModelMissing { .. }));
        assert!(err.to_string().contains("energy_model.json"));
    }

    #[test]
    fn malformed_file_names_the_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"kind\":\"linear\",\"intercept\":0.0}}").unwrap();

        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(err, InfraError::ModelMalformed { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn valid_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"kind":"linear","intercept":0.2,"coefficients":[0.1,0.2]}}"#
        )
        .unwrap();

        let model = load_model(file.path()).unwrap();
        assert_eq!(model.kind(), "linear");
        assert_eq!(model.n_features(), 2);
    }
}
