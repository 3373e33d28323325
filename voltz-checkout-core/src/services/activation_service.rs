//! Onboarding activation steps aggregator

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{
    ActivationProgress, ActivationStep, ActivationStepId, ActivationStepState, DomainStatus,
    Store,
};

/// Onboarding step catalog, in display order
pub const ACTIVATION_STEPS: [ActivationStep; 5] = [
    ActivationStep {
        id: ActivationStepId::Billing,
        title: "Faturamento",
        description: "Cadastre os dados de faturamento da loja",
        required: true,
    },
    ActivationStep {
        id: ActivationStepId::Domain,
        title: "Domínio",
        description: "Configure e verifique um domínio para o checkout",
        required: true,
    },
    ActivationStep {
        id: ActivationStepId::Gateway,
        title: "Gateway de pagamento",
        description: "Conecte um gateway para processar pagamentos",
        required: true,
    },
    ActivationStep {
        id: ActivationStepId::Shipping,
        title: "Frete",
        description: "Defina as opções de frete",
        required: true,
    },
    ActivationStep {
        id: ActivationStepId::Shopify,
        title: "Shopify",
        description: "Integre sua loja Shopify (opcional)",
        required: false,
    },
];

/// Activation steps service
///
/// Reads and writes step completion on the persisted store record; there is no
/// second copy of the flags.
pub struct ActivationService {
    ctx: Arc<ServiceContext>,
}

impl ActivationService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Onboarding step catalog
    #[must_use]
    pub fn steps(&self) -> &'static [ActivationStep] {
        &ACTIVATION_STEPS
    }

    /// Current onboarding progress of a store
    pub async fn progress(&self, store_id: &str) -> CoreResult<ActivationProgress> {
        let store = self.ctx.require_store(store_id).await?;
        Ok(compute_progress(&store))
    }

    /// Mark a step as completed or not.
    ///
    /// Demo stores are never written: they always report full progress.
    pub async fn update_step_completion(
        &self,
        store_id: &str,
        step: ActivationStepId,
        completed: bool,
    ) -> CoreResult<ActivationProgress> {
        let mut store = self.ctx.require_store(store_id).await?;

        if store.is_demo {
            log::debug!("Ignoring step {step} update on demo store {store_id}");
            return Ok(compute_progress(&store));
        }

        if store.status.get(step) != completed {
            self.ctx
                .store_repository
                .update_step(store_id, step, completed)
                .await?;
            store.status.set(step, completed);
            log::info!("Store {store_id}: step {step} completed={completed}");
        }

        Ok(compute_progress(&store))
    }

    /// Recompute the `domain` step: completed while at least one of the store's
    /// domains is active.
    pub async fn sync_domain_step(&self, store_id: &str) -> CoreResult<ActivationProgress> {
        let any_active = self
            .ctx
            .domain_repository
            .find_by_store(store_id)
            .await?
            .iter()
            .any(|d| d.status == DomainStatus::Active);

        self.update_step_completion(store_id, ActivationStepId::Domain, any_active)
            .await
    }
}

/// Derive progress from a store record
#[must_use]
pub fn compute_progress(store: &Store) -> ActivationProgress {
    let steps: Vec<ActivationStepState> = ACTIVATION_STEPS
        .iter()
        .map(|step| ActivationStepState {
            step: step.clone(),
            completed: store.is_demo || store.status.get(step.id),
        })
        .collect();

    let total_required = steps.iter().filter(|s| s.step.required).count();
    let completed_required = steps
        .iter()
        .filter(|s| s.step.required && s.completed)
        .count();
    let is_all_completed = completed_required == total_required;

    let percent_complete = if total_required == 0 {
        100
    } else {
        u8::try_from((completed_required * 100 + total_required / 2) / total_required)
            .unwrap_or(100)
    };

    ActivationProgress {
        store_id: store.id.clone(),
        steps,
        completed_required,
        total_required,
        is_all_completed,
        percent_complete,
        is_publishing_allowed: is_all_completed && !store.is_demo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::test_utils::create_test_harness;
    use crate::traits::{Clock, DomainRepository, StoreRepository};
    use crate::types::Domain;

    #[test]
    fn catalog_marks_only_shopify_optional() {
        for step in &ACTIVATION_STEPS {
            assert_eq!(step.required, step.id.is_required());
        }
        assert_eq!(ACTIVATION_STEPS.iter().filter(|s| !s.required).count(), 1);
    }

    #[tokio::test]
    async fn new_store_starts_at_zero() {
        let h = create_test_harness();
        let store = h.add_store("Loja").await;
        let p = h.activation_service().progress(&store.id).await.unwrap();

        assert_eq!(p.completed_required, 0);
        assert_eq!(p.total_required, 4);
        assert_eq!(p.percent_complete, 0);
        assert!(!p.is_all_completed);
        assert!(!p.is_publishing_allowed);
    }

    #[tokio::test]
    async fn required_steps_gate_publishing() {
        let h = create_test_harness();
        let store = h.add_store("Loja").await;
        let svc = h.activation_service();

        let mut p = svc
            .update_step_completion(&store.id, ActivationStepId::Billing, true)
            .await
            .unwrap();
        assert_eq!(p.percent_complete, 25);

        for step in [
            ActivationStepId::Domain,
            ActivationStepId::Gateway,
            ActivationStepId::Shipping,
        ] {
            p = svc
                .update_step_completion(&store.id, step, true)
                .await
                .unwrap();
        }

        assert!(p.is_all_completed);
        assert_eq!(p.percent_complete, 100);
        assert!(p.is_publishing_allowed);
        assert!(!p.steps.iter().any(|s| s.step.id == ActivationStepId::Shopify && s.completed));
    }

    #[tokio::test]
    async fn completion_is_persisted_on_store() {
        let h = create_test_harness();
        let store = h.add_store("Loja").await;
        h.activation_service()
            .update_step_completion(&store.id, ActivationStepId::Gateway, true)
            .await
            .unwrap();

        let saved = h.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert!(saved.status.gateway);

        h.activation_service()
            .update_step_completion(&store.id, ActivationStepId::Gateway, false)
            .await
            .unwrap();
        let saved = h.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert!(!saved.status.gateway);
    }

    #[tokio::test]
    async fn demo_store_is_complete_but_never_publishable() {
        let h = create_test_harness();
        let demo = h.add_demo_store().await;
        let svc = h.activation_service();

        let p = svc.progress(&demo.id).await.unwrap();
        assert!(p.is_all_completed);
        assert_eq!(p.percent_complete, 100);
        assert!(!p.is_publishing_allowed);

        let p = svc
            .update_step_completion(&demo.id, ActivationStepId::Billing, false)
            .await
            .unwrap();
        assert!(p.is_all_completed);
        assert!(!p.is_publishing_allowed);

        let saved = h.stores.find_by_id(&demo.id).await.unwrap().unwrap();
        assert_eq!(saved.status, demo.status);
    }

    #[tokio::test]
    async fn sync_domain_step_follows_active_domains() {
        let h = create_test_harness();
        let store = h.add_store("Loja").await;
        let svc = h.activation_service();

        let mut d = Domain::new(store.id.clone(), "loja.com".to_string(), h.clock.now());
        h.domains.insert(&d).await.unwrap();
        let p = svc.sync_domain_step(&store.id).await.unwrap();
        assert!(!p.steps.iter().any(|s| s.step.id == ActivationStepId::Domain && s.completed));

        d.status = DomainStatus::Active;
        h.domains.update(&d).await.unwrap();
        let p = svc.sync_domain_step(&store.id).await.unwrap();
        assert!(p.steps.iter().any(|s| s.step.id == ActivationStepId::Domain && s.completed));
    }

    #[tokio::test]
    async fn unknown_store() {
        let h = create_test_harness();
        let err = h.activation_service().progress("nope").await.unwrap_err();
        assert!(matches!(err, CoreError::StoreNotFound(_)));
    }
}
