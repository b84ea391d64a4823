// Input service - Use cases for the input form and priority list
use crate::application::state_store::{StateStore, INPUTS_KEY, PRIORITY_ORDER_KEY};
use crate::domain::inputs::{DesalterInputs, InputError, OperatingPoint};
use crate::domain::priority::{PriorityItem, PriorityList, ReorderError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] InputError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error("failed to persist state: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct InputService {
    store: Arc<dyn StateStore>,
}

impl InputService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Raw stored value, with read failures treated as "nothing stored".
    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Error reading {}: {}", key, e);
                None
            }
        }
    }

    /// The input form as last submitted, or the form defaults.
    pub async fn load_form(&self) -> DesalterInputs {
        let Some(raw) = self.read(INPUTS_KEY).await else {
            return DesalterInputs::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", INPUTS_KEY, e);
            DesalterInputs::default()
        })
    }

    /// The dashboard's view of the stored form, each field defaulted on its own.
    pub async fn load_operating_point(&self) -> OperatingPoint {
        let Some(raw) = self.read(INPUTS_KEY).await else {
            tracing::debug!("No {} stored, using default operating point", INPUTS_KEY);
            return OperatingPoint::default();
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.is_object() => OperatingPoint::from_form(&value),
            Ok(_) => {
                tracing::warn!("Ignoring non-object {}", INPUTS_KEY);
                OperatingPoint::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", INPUTS_KEY, e);
                OperatingPoint::default()
            }
        }
    }

    /// Validate and persist the form.
    pub async fn submit(&self, inputs: &DesalterInputs) -> Result<(), SubmitError> {
        inputs.validate()?;
        let body = serde_json::to_string(inputs).map_err(anyhow::Error::from)?;
        self.store.set(INPUTS_KEY, body).await?;
        tracing::info!(
            "Stored input form (spec_bsw={}, n_samples={})",
            inputs.spec_bsw,
            inputs.n_samples
        );
        Ok(())
    }

    /// Forget the stored form and hand back the defaults.
    pub async fn reset(&self) -> Result<DesalterInputs, SubmitError> {
        self.store.remove(INPUTS_KEY).await?;
        Ok(DesalterInputs::default())
    }

    pub async fn load_priorities(&self) -> PriorityList {
        let Some(raw) = self.read(PRIORITY_ORDER_KEY).await else {
            return PriorityList::default();
        };
        match serde_json::from_str::<Vec<PriorityItem>>(&raw) {
            Ok(saved) => PriorityList::restore(&saved),
            Err(e) => {
                tracing::warn!("Could not load saved priority order: {}", e);
                PriorityList::default()
            }
        }
    }

    /// Move one priority and persist the new order.
    pub async fn reorder_priorities(
        &self,
        from: usize,
        to: usize,
    ) -> Result<PriorityList, SubmitError> {
        let mut list = self.load_priorities().await;
        list.reorder(from, to)?;
        let body = serde_json::to_string(list.items()).map_err(anyhow::Error::from)?;
        self.store.set(PRIORITY_ORDER_KEY, body).await?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::ParameterSet;
    use crate::infrastructure::file_store::MemoryStore;

    fn service() -> (InputService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (InputService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let (service, _) = service();
        let mut inputs = DesalterInputs::default();
        inputs.spec_bsw = 0.42;
        inputs.t_min = 108.0;
        inputs.baseline_wash = 3.3;
        inputs.use_minimize_wash = true;

        service.submit(&inputs).await.unwrap();
        assert_eq!(service.load_form().await, inputs);

        let point = service.load_operating_point().await;
        assert_eq!(point.target_bsw, 0.42);
        assert_eq!(point.temp_range.min, 108.0);
        assert_eq!(point.current.wash_percent, 3.3);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_stored() {
        let (service, store) = service();
        let mut inputs = DesalterInputs::default();
        inputs.flow_min = 70000.0;

        let err = service.submit(&inputs).await.unwrap_err();
        assert_eq!(err.to_string(), "Flow min must be less than max.");
        assert_eq!(store.get(INPUTS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_state_falls_back_to_defaults() {
        let (service, store) = service();
        store.set(INPUTS_KEY, "{\"spec_bsw\": ".to_string()).await.unwrap();
        store.set(PRIORITY_ORDER_KEY, "not json".to_string()).await.unwrap();

        assert_eq!(service.load_form().await, DesalterInputs::default());
        assert_eq!(service.load_operating_point().await, OperatingPoint::default());
        assert_eq!(service.load_priorities().await, PriorityList::default());

        store.set(INPUTS_KEY, "[1, 2, 3]".to_string()).await.unwrap();
        assert_eq!(service.load_operating_point().await.current, ParameterSet::default());
    }

    #[tokio::test]
    async fn test_reset_removes_stored_form() {
        let (service, store) = service();
        service.submit(&DesalterInputs::default()).await.unwrap();
        let defaults = service.reset().await.unwrap();
        assert_eq!(defaults, DesalterInputs::default());
        assert_eq!(store.get(INPUTS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reorder_is_persisted() {
        let (service, _) = service();
        let list = service.reorder_priorities(4, 0).await.unwrap();
        assert_eq!(list.items()[0].text, "Minimize Voltage");

        let reloaded = service.load_priorities().await;
        assert_eq!(reloaded, list);

        assert!(matches!(
            service.reorder_priorities(0, 9).await,
            Err(SubmitError::Reorder(_))
        ));
    }
}
