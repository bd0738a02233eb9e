//! List Models use case

use crate::ports::responder::{ChatGateway, ResponderError};
use serde::Serialize;
use slogan_domain::Model;
use std::sync::Arc;

/// A model the backend can serve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEntry {
    pub name: String,
    pub display_name: String,
    pub is_default: bool,
}

/// Use case for listing the backend's models
pub struct ListModelsUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
    default_model: Model,
}

impl<G: ChatGateway + 'static> ListModelsUseCase<G> {
    pub fn new(gateway: Arc<G>, default_model: Model) -> Self {
        Self {
            gateway,
            default_model,
        }
    }

    /// Models in backend order, with the configured default marked
    pub async fn execute(&self) -> Result<Vec<ModelEntry>, ResponderError> {
        let models = self.gateway.available_models().await?;
        Ok(models
            .into_iter()
            .map(|model| ModelEntry {
                display_name: model.display_name(),
                is_default: model == self.default_model,
                name: model.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::responder::Responder;
    use async_trait::async_trait;
    use slogan_domain::AgentRole;

    struct ListingGateway(Result<Vec<Model>, ResponderError>);

    #[async_trait]
    impl ChatGateway for ListingGateway {
        async fn create_responder(
            &self,
            _model: &Model,
            _role: AgentRole,
        ) -> Result<Box<dyn Responder>, ResponderError> {
            Err(ResponderError::Other("not used".to_string()))
        }

        async fn available_models(&self) -> Result<Vec<Model>, ResponderError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_marks_default_model() {
        let gateway = Arc::new(ListingGateway(Ok(vec![
            Model::new("mistral:latest").unwrap(),
            Model::new("llama3.2:latest").unwrap(),
        ])));
        let entries = ListModelsUseCase::new(gateway, Model::default())
            .execute()
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_default);
        assert!(entries[1].is_default);
        assert_eq!(entries[1].display_name, "Llama3.2 Latest");
        assert_eq!(entries[0].name, "mistral:latest");
    }

    #[tokio::test]
    async fn test_propagates_backend_error() {
        let gateway = Arc::new(ListingGateway(Err(ResponderError::Connection(
            "refused".to_string(),
        ))));
        let err = ListModelsUseCase::new(gateway, Model::default())
            .execute()
            .await
            .unwrap_err();
        assert!(err.is_connection());
    }
}
