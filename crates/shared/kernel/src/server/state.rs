use axum::extract::FromRef;
use cwatch_domain::config::ApiConfig;
use cwatch_domain::user::Dataset;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use tracing::debug;

#[cwatch_derive::cwatch_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub dataset: Dataset,
}

/// Shared, read-only application state handed to every handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for Dataset {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.dataset.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    dataset: Option<Dataset>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Finalizes the state.
    ///
    /// # Errors
    /// Returns [`ApiStateError::Validation`] if the config or the dataset is missing.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let dataset = self.dataset.ok_or_else(|| ApiStateError::Validation {
            message: "Dataset not provided".into(),
            context: None,
        })?;

        debug!(records = dataset.len(), "API state assembled");
        Ok(ApiState { inner: Arc::new(ApiStateInner { config, dataset }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_dataset() {
        let err = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
        assert!(err.to_string().contains("Dataset not provided"));
    }

    #[test]
    fn build_requires_config() {
        let err = ApiState::builder().dataset(Dataset::generate(2)).build().unwrap_err();
        assert!(err.to_string().contains("ApiConfig not provided"));
    }

    #[test]
    fn extracted_dataset_shares_records() {
        let state = ApiState::builder()
            .config(ApiConfig::default())
            .dataset(Dataset::generate(8))
            .build()
            .unwrap();

        let extracted = Dataset::from_ref(&state);
        assert!(std::ptr::eq(extracted.as_slice(), state.dataset.as_slice()));
    }
}
