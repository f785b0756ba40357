//! The service boundary every caller goes through
//!
//! The store sits behind a `tokio::sync::Mutex`: one operation at a time, so
//! concurrent updates of the same procedure cannot interleave. A mutation
//! clones the aggregate, applies a pure transition, persists the result and
//! only then commits it in memory.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::application::{build_application, first_blocking_stage, issue_permit, ApplicationDraft};
use crate::auth::{authenticate, ensure_allowed, Action, Scope, Session};
use crate::domain::{
    apply_status_transition, apply_step_outcome, check_integrity, pending_queue, pipeline_for,
    record_decision, review_document, DecisionResult, DecisionSubmission, IntegrityIssue,
    StepOutcome, StepUpdate, TransitionResult,
};
use crate::errors::{CadastreError, Result};
use crate::schemas::{
    CommitteeDecision, Config, Document, DocumentStatus, LegalEntity, Permit, Procedure,
    ProcedureStatus, ProcedureType, Substance,
};
use crate::search::{DocumentFilter, PermitFilter, ProcedureFilter, SearchContext};
use crate::stats::{dashboard_stats, operator_summary, DashboardStats, OperatorSummary};

use super::Store;

/// A document listed with the procedure it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRow {
    pub procedure_code: String,
    pub entity_name: String,
    pub document: Document,
}

/// What a mutation produced: the aggregate to persist (if it changed) and the caller's value
struct Change<T> {
    procedure: Option<Procedure>,
    value: T,
}

fn transition(result: TransitionResult) -> Result<Procedure> {
    match result {
        TransitionResult::Success { next_procedure } => Ok(next_procedure),
        TransitionResult::Error { error } => Err(CadastreError::StateTransition(error)),
    }
}

/// Case-management operations over a loaded store
pub struct CadastreService {
    store: Mutex<Store>,
    clock: fn() -> DateTime<Utc>,
}

impl CadastreService {
    pub fn new(store: Store) -> Self {
        CadastreService {
            store: Mutex::new(store),
            clock: Utc::now,
        }
    }

    /// Open the store found at or above `cwd`
    pub fn open(cwd: &Path) -> Result<Self> {
        Ok(CadastreService::new(Store::open(cwd)?))
    }

    /// Use a fixed clock instead of the system time
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub async fn config(&self) -> Config {
        self.store.lock().await.config.clone()
    }

    // ===== AUTHENTICATION =====

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Session> {
        let store = self.store.lock().await;
        let session = authenticate(&store.dataset.users, email, password, &store.config, self.now());
        match &session {
            Ok(s) => tracing::info!(user = %s.user.email, role = %s.role(), "Logged in"),
            Err(_) => tracing::warn!(email = %email, "Failed login attempt"),
        }
        session
    }

    /// Re-resolve a saved session against the current users
    pub async fn resume_session(&self, saved: &Session) -> Result<Session> {
        let store = self.store.lock().await;
        saved.refresh(&store.dataset.users)
    }

    // ===== QUERIES =====

    /// Permits visible to the session, narrowed by `filter`
    pub async fn permits(&self, session: &Session, filter: &PermitFilter) -> Vec<Permit> {
        let store = self.store.lock().await;
        let ctx = SearchContext::new(&store.dataset, self.today());
        let scoped = Scope::for_session(session).permits(&store.dataset);
        filter.apply(scoped, &ctx).into_iter().cloned().collect()
    }

    /// One permit by id or code
    pub async fn permit(&self, session: &Session, key: &str) -> Result<Permit> {
        let store = self.store.lock().await;
        store
            .dataset
            .permit(key)
            .filter(|p| Scope::for_session(session).allows_entity(&p.entity_id))
            .cloned()
            .ok_or_else(|| CadastreError::not_found("Permit", key))
    }

    pub async fn procedures(&self, session: &Session, filter: &ProcedureFilter) -> Vec<Procedure> {
        let store = self.store.lock().await;
        let ctx = SearchContext::new(&store.dataset, self.today());
        let scoped = Scope::for_session(session).procedures(&store.dataset);
        filter.apply(scoped, &ctx).into_iter().cloned().collect()
    }

    /// One procedure by id or code
    pub async fn procedure(&self, session: &Session, key: &str) -> Result<Procedure> {
        let store = self.store.lock().await;
        find_procedure(&store, session, key).cloned()
    }

    /// Procedures acting on a permit, e.g. for the permit detail view
    pub async fn procedures_for_permit(&self, session: &Session, permit_id: &str) -> Vec<Procedure> {
        let store = self.store.lock().await;
        let scope = Scope::for_session(session);
        store
            .dataset
            .procedures_for_permit(permit_id)
            .into_iter()
            .filter(|p| scope.allows_entity(&p.entity_id))
            .cloned()
            .collect()
    }

    /// Documents of every visible procedure, narrowed by `filter`
    pub async fn documents(&self, session: &Session, filter: &DocumentFilter) -> Vec<DocumentRow> {
        let store = self.store.lock().await;
        let ctx = SearchContext::new(&store.dataset, self.today());
        let scope = Scope::for_session(session);
        let visible = store
            .dataset
            .documents()
            .into_iter()
            .filter(|(p, _)| scope.allows_entity(&p.entity_id));
        filter
            .apply(visible, &ctx)
            .into_iter()
            .map(|(p, d)| DocumentRow {
                procedure_code: p.code.clone(),
                entity_name: store.dataset.entity_name(&p.entity_id).to_string(),
                document: d.clone(),
            })
            .collect()
    }

    /// Committee decisions of every visible procedure
    pub async fn decisions(&self, session: &Session) -> Vec<CommitteeDecision> {
        let store = self.store.lock().await;
        Scope::for_session(session)
            .procedures(&store.dataset)
            .into_iter()
            .flat_map(|p| p.decisions.iter().cloned())
            .collect()
    }

    /// Entities visible to the session: an operator sees only their own
    pub async fn entities(&self, session: &Session) -> Vec<LegalEntity> {
        let store = self.store.lock().await;
        let scope = Scope::for_session(session);
        store
            .dataset
            .entities
            .iter()
            .filter(|e| scope.allows_entity(&e.id))
            .cloned()
            .collect()
    }

    pub async fn entity(&self, session: &Session, id: &str) -> Result<LegalEntity> {
        let store = self.store.lock().await;
        store
            .dataset
            .entity(id)
            .filter(|e| Scope::for_session(session).allows_entity(&e.id))
            .cloned()
            .ok_or_else(|| CadastreError::not_found("Entity", id))
    }

    pub async fn substances(&self) -> Vec<Substance> {
        self.store.lock().await.dataset.substances.clone()
    }

    /// Back-office dashboard, over the session's scope
    pub async fn dashboard_stats(&self, session: &Session) -> DashboardStats {
        let store = self.store.lock().await;
        match Scope::for_session(session) {
            Scope::All => dashboard_stats(&store.dataset, self.today()),
            scope => {
                let mut scoped = store.dataset.clone();
                scoped.permits.retain(|p| scope.allows_entity(&p.entity_id));
                scoped.procedures.retain(|p| scope.allows_entity(&p.entity_id));
                dashboard_stats(&scoped, self.today())
            }
        }
    }

    pub async fn operator_summary(&self, session: &Session) -> OperatorSummary {
        let store = self.store.lock().await;
        let scope = Scope::for_session(session);
        operator_summary(
            &scope.permits(&store.dataset),
            &scope.procedures(&store.dataset),
            self.today(),
            store.config.expiring_window_days,
        )
    }

    /// Procedures waiting for a committee decision
    pub async fn pending_committee_queue(&self, session: &Session) -> Result<Vec<Procedure>> {
        ensure_allowed(session, Action::Decide)?;
        let store = self.store.lock().await;
        Ok(pending_queue(&store.dataset.procedures)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn check_integrity(&self) -> Vec<IntegrityIssue> {
        check_integrity(&self.store.lock().await.dataset)
    }

    // ===== MUTATIONS =====

    /// Run one transaction on a procedure.
    ///
    /// When the change completes a `demande`, the granted permit is issued and
    /// linked in the same transaction.
    async fn mutate_procedure<T, F>(
        &self,
        session: &Session,
        key: &str,
        apply: F,
    ) -> Result<(Procedure, T)>
    where
        F: FnOnce(&Procedure, &Config) -> Result<Change<T>>,
    {
        let mut store = self.store.lock().await;
        let current = find_procedure(&store, session, key)?.clone();
        let change = apply(&current, &store.config)?;

        let next = match change.procedure {
            Some(next) => next,
            None => return Ok((current, change.value)),
        };

        let issued = issue_permit(
            &next,
            &store.dataset,
            store.config.permit_validity_years,
            self.today(),
        )?;
        match issued {
            Some(permit) => {
                let linked = next.with_permit(Some(permit.id.clone()));
                let code = permit.code.clone();
                store.commit_issuance(linked.clone(), permit)?;
                tracing::info!(permit = %code, procedure = %linked.code, "Issued permit");
                Ok((linked, change.value))
            }
            None => {
                store.commit_procedure(next.clone())?;
                Ok((next, change.value))
            }
        }
    }

    /// Record an agent's outcome on a pending step
    pub async fn update_step(
        &self,
        session: &Session,
        procedure: &str,
        step_id: &str,
        outcome: StepOutcome,
        comment: Option<String>,
    ) -> Result<Procedure> {
        ensure_allowed(session, Action::UpdateStep)?;
        let now = self.now();
        let update = StepUpdate {
            outcome,
            comment: comment.filter(|c| !c.trim().is_empty()),
            agent_id: Some(session.user_id().to_string()),
        };

        let (next, ()) = self
            .mutate_procedure(session, procedure, |current, config| {
                let pipeline = pipeline_for(config, current.procedure_type);
                let next = transition(apply_step_outcome(current, step_id, &update, pipeline, now))?;
                Ok(Change { procedure: Some(next), value: () })
            })
            .await?;

        tracing::info!(
            procedure = %next.code,
            step = %step_id,
            outcome = ?outcome,
            status = %next.status,
            "Updated step"
        );
        Ok(next)
    }

    /// Review one document of a procedure
    pub async fn submit_document_validation(
        &self,
        session: &Session,
        procedure: &str,
        document_id: &str,
        status: DocumentStatus,
        comment: Option<String>,
    ) -> Result<Document> {
        ensure_allowed(session, Action::ValidateDocument)?;

        let (next, ()) = self
            .mutate_procedure(session, procedure, |current, _| {
                let next = transition(review_document(current, document_id, status, comment))?;
                Ok(Change { procedure: Some(next), value: () })
            })
            .await?;

        tracing::info!(procedure = %next.code, document = %document_id, status = %status, "Reviewed document");
        next.document(document_id)
            .cloned()
            .ok_or_else(|| CadastreError::not_found("Document", document_id))
    }

    /// Record a committee decision. An identical resubmission after the
    /// procedure left the queue returns the existing record.
    pub async fn submit_committee_decision(
        &self,
        session: &Session,
        procedure: &str,
        submission: &DecisionSubmission,
    ) -> Result<CommitteeDecision> {
        ensure_allowed(session, Action::Decide)?;
        if let Err(reason) = submission.validate() {
            return Err(CadastreError::Validation(reason));
        }
        let now = self.now();
        let member_id = session.user_id().to_string();

        let (next, decision) = self
            .mutate_procedure(session, procedure, |current, config| {
                let pipeline = pipeline_for(config, current.procedure_type);
                match record_decision(current, submission, &member_id, pipeline, now) {
                    DecisionResult::Recorded { next_procedure, decision } => Ok(Change {
                        procedure: Some(next_procedure),
                        value: decision,
                    }),
                    DecisionResult::Duplicate { decision } => Ok(Change {
                        procedure: None,
                        value: decision,
                    }),
                    DecisionResult::Error { error } => Err(CadastreError::StateTransition(error)),
                }
            })
            .await?;

        tracing::info!(
            procedure = %next.code,
            decision = %decision.decision,
            status = %next.status,
            "Committee decision"
        );
        Ok(decision)
    }

    async fn set_status(&self, session: &Session, procedure: &str, target: ProcedureStatus) -> Result<Procedure> {
        let now = self.now();
        let (next, ()) = self
            .mutate_procedure(session, procedure, |current, config| {
                let pipeline = pipeline_for(config, current.procedure_type);
                let next = transition(apply_status_transition(current, target, pipeline, now))?;
                Ok(Change { procedure: Some(next), value: () })
            })
            .await?;
        tracing::info!(procedure = %next.code, status = %next.status, "Changed procedure status");
        Ok(next)
    }

    pub async fn suspend_procedure(&self, session: &Session, procedure: &str) -> Result<Procedure> {
        ensure_allowed(session, Action::Suspend)?;
        self.set_status(session, procedure, ProcedureStatus::Suspended).await
    }

    pub async fn resume_procedure(&self, session: &Session, procedure: &str) -> Result<Procedure> {
        ensure_allowed(session, Action::Resume)?;
        self.set_status(session, procedure, ProcedureStatus::InProgress).await
    }

    /// Open a `demande` procedure from a complete application draft
    pub async fn submit_application(&self, session: &Session, draft: &ApplicationDraft) -> Result<Procedure> {
        ensure_allowed(session, Action::SubmitApplication)?;
        if !Scope::for_session(session).allows_entity(&draft.entity_id) {
            return Err(CadastreError::Forbidden(format!(
                "{} may only apply for their own entity",
                session.user.name
            )));
        }

        let mut store = self.store.lock().await;
        if let Some((stage, reason)) = first_blocking_stage(draft, &store.dataset) {
            return Err(CadastreError::Validation(format!(
                "stage {} ({}): {}",
                stage.number(),
                stage.title(),
                reason
            )));
        }

        let pipeline = pipeline_for(&store.config, ProcedureType::Application);
        let procedure = build_application(draft, &store.dataset, pipeline, self.now());
        store.commit_procedure(procedure.clone())?;

        tracing::info!(
            procedure = %procedure.code,
            entity = %procedure.entity_id,
            "Submitted application"
        );
        Ok(procedure)
    }
}

/// A procedure by id or code, within the session's scope
fn find_procedure<'a>(store: &'a Store, session: &Session, key: &str) -> Result<&'a Procedure> {
    store
        .dataset
        .procedure(key)
        .filter(|p| Scope::for_session(session).allows_entity(&p.entity_id))
        .ok_or_else(|| CadastreError::not_found("Procedure", key))
}
