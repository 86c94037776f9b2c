//! Shared application state handed to every handler.

use std::sync::Arc;

use pharmai_core::{InteractionResolver, InteractionStore, Ledger, StoreError};
use pharmai_llm::{DisabledInferencer, GeminiClient, InferenceResult, Inferencer};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<InteractionResolver>,
    pub store: Arc<InteractionStore>,
    pub ledger: Arc<Ledger>,
    pub inferencer: Arc<dyn Inferencer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<InteractionStore>,
        ledger: Arc<Ledger>,
        inferencer: Arc<dyn Inferencer>,
    ) -> Self {
        let resolver = Arc::new(InteractionResolver::new(store.clone(), inferencer.clone()));
        Self {
            resolver,
            store,
            ledger,
            inferencer,
            config: Arc::new(config),
        }
    }
}

/// Load the configured dataset, or the built-in one.
pub fn load_store(config: &Config) -> Result<InteractionStore, StoreError> {
    let store = match &config.dataset_path {
        Some(path) => InteractionStore::from_path(path)?,
        None => InteractionStore::builtin()?,
    };

    tracing::info!(
        records = store.len(),
        duplicates = store.duplicates().len(),
        fingerprint = store.fingerprint(),
        "Interaction table loaded"
    );
    Ok(store)
}

/// Gemini client when a key is configured, otherwise the disabled stand-in.
///
/// Must run outside the async runtime: the Gemini client is blocking.
pub fn build_inferencer(config: &Config) -> InferenceResult<Arc<dyn Inferencer>> {
    match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                &config.gemini_base_url,
                &config.gemini_model,
                key,
                config.inference_timeout_secs,
            )?;
            tracing::info!(model = %config.gemini_model, "Gemini inference enabled");
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, AI fallback and chat are disabled");
            Ok(Arc::new(DisabledInferencer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_store() {
        let store = load_store(&Config::default()).unwrap();
        assert!(store.len() > 100);
    }

    #[test]
    fn test_load_store_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[{"drugs":["zinc","doxycycline"],"severity":"Moderate","risk":"Medium","effects":"e","mechanism":"m","recommendation":"r"}]"#,
        )
        .unwrap();

        let config = Config {
            dataset_path: Some(path),
            ..Config::default()
        };
        let store = load_store(&config).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_malformed_dataset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"[{"drugs":["zinc"],"severity":"Moderate","risk":"Medium","effects":"e","mechanism":"m","recommendation":"r"}]"#).unwrap();

        let config = Config {
            dataset_path: Some(path),
            ..Config::default()
        };
        assert!(matches!(
            load_store(&config),
            Err(StoreError::MalformedDataset { index: 0, .. })
        ));
    }

    #[test]
    fn test_no_key_disables_inference() {
        let inferencer = build_inferencer(&Config::default()).unwrap();
        assert!(!inferencer.is_configured());
    }
}
