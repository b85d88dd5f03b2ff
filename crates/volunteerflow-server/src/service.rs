//! The assembled VolunteerFlow service.
//!
//! `ServiceBuilder` wires one `PermissionTable` into the gate, the redaction
//! policy and the evaluator handed to the UI layer. It also decides, once
//! and for the life of the service, which identity provider is in use:
//!
//! - `IdentityMode::External` requires a provider from the host and mounts
//!   no development routes.
//! - `IdentityMode::Development` builds the `DevIdentityProvider`, refuses a
//!   host provider, and is refused in production.
//!
//! `VolunteerFlowService::handle` resolves the route, runs the gate, then
//! dispatches to the handler and applies the outbound restricted-field check.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, error, info};

use volunteerflow_audit::InMemoryAuditWriter;
use volunteerflow_contracts::{
    access::AccessRecord,
    error::{FlowError, FlowResult},
    user::{RequestId, User},
};
use volunteerflow_core::{
    traits::{AuditWriter, Authorizer, IdentityProvider, UserDirectory, Verifier},
    Gate, GateRequest, RedactionPolicy,
};
use volunteerflow_rbac::{PermissionEvaluator, PermissionTable};
use volunteerflow_verify::{restricted_fields_schema, SchemaVerifier};

use crate::{
    config::{AppConfig, IdentityMode},
    dev_auth::DevIdentityProvider,
    handlers::{to_body, Handlers, Reply},
    routes::{dev_routes, protected_routes, Access, ApiRequest, ApiResponse, Endpoint, PathParams, Route},
    schemas,
    store::InMemoryStore,
};

/// Audit sink used when `[audit] enabled = false`. Decisions are still
/// logged at debug level.
struct DiscardAudit;

impl AuditWriter for DiscardAudit {
    fn write(&self, record: &AccessRecord) -> FlowResult<()> {
        debug!(operation = %record.operation, outcome = ?record.outcome, "audit disabled; decision not recorded");
        Ok(())
    }
}

pub struct ServiceBuilder {
    config: AppConfig,
    table: Option<Arc<PermissionTable>>,
    store: Option<Arc<InMemoryStore>>,
    external_identity: Option<Arc<dyn IdentityProvider>>,
    audit: Option<Arc<dyn AuditWriter>>,
}

impl ServiceBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config, table: None, store: None, external_identity: None, audit: None }
    }

    /// Share an existing table. Defaults to `PermissionTable::standard()`.
    pub fn permission_table(mut self, table: Arc<PermissionTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Defaults to a seeded store.
    pub fn store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The real identity provider. Required in external mode, refused in
    /// development mode.
    pub fn external_identity(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.external_identity = Some(provider);
        self
    }

    /// Replace the default in-memory hash-chained audit trail.
    pub fn audit_writer(mut self, audit: Arc<dyn AuditWriter>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn build(self) -> FlowResult<VolunteerFlowService> {
        self.config.validate()?;

        let (identity, dev_identity): (Arc<dyn IdentityProvider>, Option<Arc<DevIdentityProvider>>) =
            match (self.config.identity.mode, self.external_identity) {
                (IdentityMode::Development, Some(_)) => {
                    return Err(FlowError::ConfigError {
                        reason: "development identity mode cannot be combined with an external identity provider"
                            .to_string(),
                    });
                }
                (IdentityMode::Development, None) => {
                    let dev = Arc::new(DevIdentityProvider::new(self.config.identity.session_ttl_secs));
                    info!(ttl_secs = self.config.identity.session_ttl_secs, "development identity bypass enabled");
                    let identity: Arc<dyn IdentityProvider> = dev.clone();
                    (identity, Some(dev))
                }
                (IdentityMode::External, Some(provider)) => (provider, None),
                (IdentityMode::External, None) => {
                    return Err(FlowError::ConfigError {
                        reason: "external identity mode requires an identity provider".to_string(),
                    });
                }
            };

        let table = self.table.unwrap_or_else(|| Arc::new(PermissionTable::standard()));
        let evaluator = PermissionEvaluator::new(table);
        let authorizer: Arc<dyn Authorizer> = Arc::new(evaluator.clone());
        let store = self.store.unwrap_or_else(|| Arc::new(InMemoryStore::seeded()));

        let mut audit_trail = None;
        let audit: Arc<dyn AuditWriter> = match self.audit {
            Some(custom) => custom,
            None if self.config.audit.enabled => {
                let trail = Arc::new(InMemoryAuditWriter::new(format!("volunteerflow-{}", uuid::Uuid::new_v4())));
                audit_trail = Some(Arc::clone(&trail));
                trail
            }
            None => Arc::new(DiscardAudit),
        };

        let directory: Arc<dyn UserDirectory> = store.clone();
        let gate = Gate::new(identity, directory, Arc::clone(&authorizer), audit);

        let mut routes = protected_routes();
        if dev_identity.is_some() {
            routes.extend(dev_routes());
        }

        Ok(VolunteerFlowService {
            config: self.config,
            gate,
            evaluator,
            redaction: RedactionPolicy::new(authorizer),
            verifier: SchemaVerifier::new(),
            store,
            audit_trail,
            dev_identity,
            routes,
        })
    }
}

pub struct VolunteerFlowService {
    config: AppConfig,
    gate: Gate,
    evaluator: PermissionEvaluator,
    redaction: RedactionPolicy,
    verifier: SchemaVerifier,
    store: Arc<InMemoryStore>,
    audit_trail: Option<Arc<InMemoryAuditWriter>>,
    dev_identity: Option<Arc<DevIdentityProvider>>,
    routes: Vec<Route>,
}

impl VolunteerFlowService {
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The evaluator every check in this service uses. Hand a clone to the
    /// UI layer so both sides read the same table.
    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// The built-in audit trail, unless auditing is disabled or replaced.
    pub fn audit_trail(&self) -> Option<&Arc<InMemoryAuditWriter>> {
        self.audit_trail.as_ref()
    }

    /// The development identity provider, present only in development mode.
    pub fn dev_identity(&self) -> Option<&Arc<DevIdentityProvider>> {
        self.dev_identity.as_ref()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Handle one request end to end. Never panics and never returns data
    /// for a request the gate rejected.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let request_id = RequestId::new();

        let Some((route, params)) = self.resolve(request) else {
            debug!(request_id = %request_id, method = %request.method, path = %request.path, "no route");
            return ApiResponse::message(404, "not found");
        };
        let label = route.label();

        let result = match &route.access {
            Access::Public => self.handle_dev(route.endpoint, request),
            Access::Identified => self
                .gate
                .identify(request.credentials.as_ref())
                .and_then(|user| self.current_user(&user)),
            Access::Gated(requirement) => {
                let gate_request = GateRequest {
                    request_id: &request_id,
                    operation: &label,
                    credentials: request.credentials.as_ref(),
                    requirement,
                };
                self.gate.guard(gate_request, |caller| self.handlers().dispatch(route.endpoint, &params, request, caller))
            }
        };

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => return self.error_response(&request_id, &label, &e),
        };

        if !route.endpoint.carries_restricted_layer() {
            if let Err(e) = self.outbound_check(&reply.body) {
                return self.error_response(&request_id, &label, &e);
            }
        }

        ApiResponse::new(reply.status, reply.body)
    }

    /// Reject a response body that carries any restricted medical field.
    pub fn outbound_check(&self, body: &Value) -> FlowResult<()> {
        let report = self.verifier.verify(body, &restricted_fields_schema())?;
        if report.passed {
            return Ok(());
        }
        error!(failures = %report.summary(), "restricted medical fields in outbound response");
        Err(FlowError::Collaborator { reason: format!("outbound leak check failed: {}", report.summary()) })
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn handlers(&self) -> Handlers<'_> {
        Handlers { store: &self.store, verifier: &self.verifier, redaction: &self.redaction }
    }

    fn resolve(&self, request: &ApiRequest) -> Option<(&Route, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| route.matches(request.method, &request.path).map(|params| (route, params)))
    }

    /// The caller's profile, parsed role, capabilities and navigable sections.
    ///
    /// A user without a recognized role gets `role: null` and empty lists.
    fn current_user(&self, user: &User) -> FlowResult<Reply> {
        let capabilities: Vec<_> = self.evaluator.capabilities(Some(user)).all().collect();
        Ok(Reply {
            status: 200,
            body: json!({
                "user": to_body(user)?,
                "role": user.parsed_role(),
                "capabilities": capabilities,
                "visibleSections": self.evaluator.visible_sections(Some(user)),
                "landingPath": self.evaluator.landing_path(Some(user)),
            }),
        })
    }

    fn handle_dev(&self, endpoint: Endpoint, request: &ApiRequest) -> FlowResult<Reply> {
        // Dev routes are only mounted alongside the provider.
        let dev = self.dev_identity.as_ref().ok_or(FlowError::NotFound {
            resource: "route".to_string(),
            id: request.path.clone(),
        })?;

        match endpoint {
            Endpoint::DevUsers => Ok(Reply { status: 200, body: to_body(dev.users())? }),
            Endpoint::DevLogin => {
                #[derive(serde::Deserialize)]
                #[serde(rename_all = "camelCase")]
                struct LoginBody {
                    user_id: String,
                }
                let body: LoginBody = self.handlers().validated(request, &schemas::dev_login())?;
                let login = dev.login(&body.user_id)?;
                let mut reply = to_body(&login)?;
                reply["message"] = json!("Logged in successfully");
                Ok(Reply { status: 200, body: reply })
            }
            Endpoint::DevLogout => {
                dev.logout(request.credentials.as_ref())?;
                Ok(Reply { status: 200, body: json!({ "message": "Logged out successfully" }) })
            }
            other => Err(FlowError::Collaborator { reason: format!("{other:?} is not a development endpoint") }),
        }
    }

    fn error_response(&self, request_id: &RequestId, operation: &str, e: &FlowError) -> ApiResponse {
        let response = ApiResponse::from_error(e);
        if response.status >= 500 {
            error!(request_id = %request_id, operation, error = %e, "request failed");
        } else if !e.is_access_denial() {
            debug!(request_id = %request_id, operation, error = %e, status = response.status, "request rejected");
        }
        response
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use volunteerflow_contracts::{
        access::{AccessRecord, GateOutcome},
        error::{FlowError, FlowResult},
        user::{Credentials, Identity, User},
    };
    use volunteerflow_core::traits::{AuditWriter, IdentityProvider};

    use super::{ServiceBuilder, VolunteerFlowService};
    use crate::{
        config::{AppConfig, Environment, IdentityMode},
        routes::{ApiRequest, Method},
    };

    fn dev_service() -> VolunteerFlowService {
        ServiceBuilder::new(AppConfig::development()).build().unwrap()
    }

    fn login(service: &VolunteerFlowService, user_id: &str) -> Credentials {
        let dev = service.dev_identity().expect("development mode");
        Credentials::new(dev.login(user_id).unwrap().token)
    }

    /// Token equals subject. Stands in for a real provider.
    struct BearerIsSubject;

    impl IdentityProvider for BearerIsSubject {
        fn resolve(&self, credentials: Option<&Credentials>) -> FlowResult<Option<Identity>> {
            Ok(credentials.map(|c| Identity { subject: c.0.clone(), email: None }))
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        records: Mutex<Vec<AccessRecord>>,
    }

    impl AuditWriter for RecordingAudit {
        fn write(&self, record: &AccessRecord) -> FlowResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingAudit;

    impl AuditWriter for FailingAudit {
        fn write(&self, _record: &AccessRecord) -> FlowResult<()> {
            Err(FlowError::AuditWriteFailed { reason: "disk full".to_string() })
        }
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    /// A recruiter may see screening outcomes but not the restricted layer.
    #[test]
    fn test_recruiter_denied_medical_details() {
        let service = dev_service();
        let recruiter = login(&service, "user_1");

        let outcome = service.handle(&ApiRequest::get("/api/medical-screenings/ms-1").with_credentials(&recruiter));
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.body["outcomeNotes"], "Awaiting final clearance appointment");

        let details =
            service.handle(&ApiRequest::get("/api/medical-screenings/ms-1/details").with_credentials(&recruiter));
        assert_eq!(details.status, 403);
        assert!(details.body.get("medicalHistory").is_none());
        assert!(details.body["message"].as_str().unwrap().contains("viewMedicalDetails"));
    }

    #[test]
    fn test_screener_reads_outcome_and_details() {
        let service = dev_service();
        let screener = login(&service, "user_3");

        let outcome = service.handle(&ApiRequest::get("/api/medical-screenings/ms-1").with_credentials(&screener));
        assert_eq!(outcome.status, 200);

        let details =
            service.handle(&ApiRequest::get("/api/medical-screenings/ms-1/details").with_credentials(&screener));
        assert_eq!(details.status, 200);
        assert_eq!(details.body["disclosure"], "disclosed");
        assert_eq!(details.body["details"]["medicalHistory"], "Seasonal asthma, well controlled");

        // Allowed, but nothing on file: distinct from a denial.
        let empty =
            service.handle(&ApiRequest::get("/api/medical-screenings/ms-2/details").with_credentials(&screener));
        assert_eq!(empty.status, 200);
        assert_eq!(empty.body, json!({ "disclosure": "not_recorded" }));

        let missing =
            service.handle(&ApiRequest::get("/api/medical-screenings/ms-9/details").with_credentials(&screener));
        assert_eq!(missing.status, 404);
    }

    #[test]
    fn test_screener_replaces_details() {
        let service = dev_service();
        let screener = login(&service, "user_3");

        let response = service.handle(
            &ApiRequest::put(
                "/api/medical-screenings/ms-2/details",
                json!({ "clearanceReasoning": "No contraindications" }),
            )
            .with_credentials(&screener),
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["details"]["clearanceReasoning"], "No contraindications");

        let recruiter = login(&service, "user_1");
        let denied = service.handle(
            &ApiRequest::put("/api/medical-screenings/ms-2/details", json!({ "screeningNotes": "x" }))
                .with_credentials(&recruiter),
        );
        assert_eq!(denied.status, 403);
    }

    #[test]
    fn test_country_officer_creates_position_not_lead() {
        let service = dev_service();
        let officer = login(&service, "user_4");

        let position = service.handle(
            &ApiRequest::post(
                "/api/positions",
                json!({
                    "title": "Midwife Trainer",
                    "description": "Train community midwives",
                    "sector": "healthcare",
                    "country": "Malawi",
                    "startDate": "2026-02-01"
                }),
            )
            .with_credentials(&officer),
        );
        assert_eq!(position.status, 201, "body: {}", position.body);
        assert_eq!(position.body["endDate"], "2028-05-01");
        assert_eq!(position.body["isOpen"], true);

        let lead = service.handle(
            &ApiRequest::post(
                "/api/leads",
                json!({ "firstName": "Ada", "lastName": "Byron", "email": "ada@example.org" }),
            )
            .with_credentials(&officer),
        );
        assert_eq!(lead.status, 403);
    }

    /// A denied mutation never reaches the store.
    #[test]
    fn test_forbidden_delete_leaves_record() {
        let service = dev_service();
        let placement_officer = login(&service, "user_2");

        let denied = service.handle(&ApiRequest::delete("/api/leads/lead-1").with_credentials(&placement_officer));
        assert_eq!(denied.status, 403);
        assert!(service.store().read(|t| Ok(t.leads.contains("lead-1"))).unwrap());

        let recruiter = login(&service, "user_1");
        let deleted = service.handle(&ApiRequest::delete("/api/leads/lead-1").with_credentials(&recruiter));
        assert_eq!(deleted.status, 204);
        assert!(!service.store().read(|t| Ok(t.leads.contains("lead-1"))).unwrap());
    }

    /// An update rejected after merging leaves the stored record as it was.
    #[test]
    fn test_rejected_date_update_leaves_record() {
        let service = dev_service();
        let cases = [
            ("user_4", "/api/positions/pos-1", json!({ "endDate": "1900-01-01", "title": "CHANGED" })),
            ("user_2", "/api/placements/pl-1", json!({ "endDate": "1900-01-01", "notes": "CHANGED" })),
        ];

        for (user_id, path, patch) in cases {
            let caller = login(&service, user_id);
            let before = service.handle(&ApiRequest::get(path).with_credentials(&caller));
            assert_eq!(before.status, 200);

            let update = service.handle(&ApiRequest::patch(path, patch).with_credentials(&caller));
            assert_eq!(update.status, 400, "{path}: {}", update.body);

            let after = service.handle(&ApiRequest::get(path).with_credentials(&caller));
            assert_eq!(after.body, before.body, "{path} changed by a rejected update");
        }
    }

    #[test]
    fn test_placement_officer_reads_leads_only() {
        let service = dev_service();
        let officer = login(&service, "user_2");

        let list = service.handle(&ApiRequest::get("/api/leads").with_credentials(&officer));
        assert_eq!(list.status, 200);
        assert_eq!(list.body.as_array().unwrap().len(), 6);

        let update = service
            .handle(&ApiRequest::patch("/api/leads/lead-1", json!({ "status": "applied" })).with_credentials(&officer));
        assert_eq!(update.status, 403);
    }

    // ── Denial statuses ───────────────────────────────────────────────────────

    /// Every protected route rejects a caller with no credentials with 401
    /// and does not run the handler.
    #[test]
    fn test_every_protected_route_requires_identity() {
        let service = dev_service();
        let routes: Vec<_> = service.routes().iter().filter(|r| r.requirement().is_some()).cloned().collect();

        for route in routes {
            let path = route.pattern.replace(":id", "lead-1");
            let request = ApiRequest::new(route.method, path).with_body(json!({}));
            let response = service.handle(&request);
            assert_eq!(response.status, 401, "{} must require authentication", route.label());
        }

        let profile = service.handle(&ApiRequest::get("/api/auth/user"));
        assert_eq!(profile.status, 401);
    }

    /// Unknown tokens are unauthenticated; a legacy role is denied as 403.
    #[test]
    fn test_unauthenticated_and_no_role() {
        let audit = Arc::new(RecordingAudit::default());
        let service = ServiceBuilder::new(AppConfig::development()).audit_writer(audit.clone()).build().unwrap();
        service
            .store()
            .upsert_user(User {
                id: "user_legacy".to_string(),
                email: Some("legacy@volunteerflow.org".to_string()),
                first_name: None,
                last_name: None,
                role: Some("recruitment_manager".to_string()),
            })
            .unwrap();

        let forged = service.handle(&ApiRequest::get("/api/leads").with_credentials(&Credentials::new("forged")));
        assert_eq!(forged.status, 401);

        // Development sessions only exist for seed users, so use an
        // external provider to reach the legacy account.
        let external = ServiceBuilder::new(AppConfig::default())
            .external_identity(Arc::new(BearerIsSubject))
            .store(Arc::clone(service.store()))
            .audit_writer(audit.clone())
            .build()
            .unwrap();
        let legacy = external.handle(&ApiRequest::get("/api/leads").with_credentials(&Credentials::new("user_legacy")));
        assert_eq!(legacy.status, 403);
        assert_eq!(legacy.body["message"], "access restricted");

        // The legacy user still sees its own profile, with no role.
        let profile =
            external.handle(&ApiRequest::get("/api/auth/user").with_credentials(&Credentials::new("user_legacy")));
        assert_eq!(profile.status, 200);
        assert_eq!(profile.body["role"], Value::Null);
        assert_eq!(profile.body["visibleSections"], json!([]));
        assert_eq!(profile.body["landingPath"], "/");

        let outcomes: Vec<GateOutcome> = audit.records.lock().unwrap().iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(outcomes, vec![GateOutcome::RejectedUnauthenticated, GateOutcome::RejectedNoRole]);
    }

    #[test]
    fn test_validation_and_not_found_are_distinct() {
        let service = dev_service();
        let recruiter = login(&service, "user_1");

        let invalid = service
            .handle(&ApiRequest::post("/api/leads", json!({ "firstName": "Ada" })).with_credentials(&recruiter));
        assert_eq!(invalid.status, 400);

        let missing_body = service.handle(&ApiRequest::new(Method::Post, "/api/leads").with_credentials(&recruiter));
        assert_eq!(missing_body.status, 400);

        let missing = service.handle(&ApiRequest::get("/api/leads/lead-404").with_credentials(&recruiter));
        assert_eq!(missing.status, 404);

        let dangling = service.handle(
            &ApiRequest::post("/api/applications", json!({ "leadId": "lead-404", "positionId": "pos-1" }))
                .with_credentials(&recruiter),
        );
        assert_eq!(dangling.status, 400);
    }

    /// Restricted fields cannot be smuggled through the outcome route.
    #[test]
    fn test_screening_body_with_restricted_fields_rejected() {
        let service = dev_service();
        let screener = login(&service, "user_3");

        let response = service.handle(
            &ApiRequest::patch("/api/medical-screenings/ms-1", json!({ "medicalHistory": "asthma" }))
                .with_credentials(&screener),
        );
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_outbound_check() {
        let service = dev_service();
        assert!(service.outbound_check(&json!([{ "id": "ms-1", "outcomeNotes": "ok" }])).is_ok());
        assert!(service.outbound_check(&json!({ "notes": "medicalHistory" })).is_ok());

        match service.outbound_check(&json!({ "items": [{ "currentMedications": "..." }] })) {
            Err(FlowError::Collaborator { reason }) => assert!(reason.contains("currentMedications")),
            other => panic!("expected Collaborator, got {:?}", other),
        }
    }

    // ── Reports, filters, profile ─────────────────────────────────────────────

    #[test]
    fn test_reports_gated_by_view_reports() {
        let service = dev_service();

        let recruiter = login(&service, "user_1");
        let pipeline = service.handle(&ApiRequest::get("/api/reports/pipeline").with_credentials(&recruiter));
        assert_eq!(pipeline.status, 200);
        assert_eq!(pipeline.body[0]["stage"], "interested");

        let screener = login(&service, "user_3");
        let sectors = service.handle(&ApiRequest::get("/api/reports/sectors").with_credentials(&screener));
        assert_eq!(sectors.status, 403);
    }

    #[test]
    fn test_dashboard_endpoints_gated_by_view_reports() {
        let service = dev_service();
        let paths = ["/api/dashboard/metrics", "/api/dashboard/urgent-items", "/api/dashboard/recent-activities"];

        let recruiter = login(&service, "user_1");
        let screener = login(&service, "user_3");
        for path in paths {
            assert_eq!(service.handle(&ApiRequest::get(path)).status, 401, "{path}");
            assert_eq!(service.handle(&ApiRequest::get(path).with_credentials(&screener)).status, 403, "{path}");
            assert_eq!(service.handle(&ApiRequest::get(path).with_credentials(&recruiter)).status, 200, "{path}");
        }

        let metrics = service.handle(&ApiRequest::get("/api/dashboard/metrics").with_credentials(&recruiter));
        assert_eq!(metrics.body["activeLeads"], 1);
        assert_eq!(metrics.body["openPositions"], 3);
        assert_eq!(metrics.body["inScreening"], 2);
        assert_eq!(metrics.body["deployed"], 1);

        // app-1 is applied with no interview date. The medical alert depends
        // on the clock and is covered in reports.
        let urgent = service.handle(&ApiRequest::get("/api/dashboard/urgent-items").with_credentials(&recruiter));
        let pending: Vec<&Value> =
            urgent.body.as_array().unwrap().iter().filter(|i| i["type"] == "pending_interviews").collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0]["count"], 1);
    }

    #[test]
    fn test_changes_feed_recent_activities() {
        let service = dev_service();
        let recruiter = login(&service, "user_1");
        let feed = |service: &VolunteerFlowService| {
            service.handle(&ApiRequest::get("/api/dashboard/recent-activities").with_credentials(&recruiter)).body
        };
        assert_eq!(feed(&service), json!([]));

        let created = service.handle(
            &ApiRequest::post(
                "/api/leads",
                json!({ "firstName": "Ada", "lastName": "Byron", "email": "ada@example.org" }),
            )
            .with_credentials(&recruiter),
        );
        assert_eq!(created.status, 201);
        let lead_id = created.body["id"].clone();

        let moved = service.handle(
            &ApiRequest::patch(&format!("/api/leads/{}", lead_id.as_str().unwrap()), json!({ "status": "applied" }))
                .with_credentials(&recruiter),
        );
        assert_eq!(moved.status, 200);

        // Rejected requests leave no entry.
        let invalid = service
            .handle(&ApiRequest::post("/api/leads", json!({ "firstName": "Ada" })).with_credentials(&recruiter));
        assert_eq!(invalid.status, 400);
        let screener = login(&service, "user_3");
        let denied = service.handle(&ApiRequest::delete("/api/leads/lead-1").with_credentials(&screener));
        assert_eq!(denied.status, 403);

        let entries = feed(&service);
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["type"], "lead_updated");
        assert_eq!(entries[1]["type"], "lead_created");
        assert_eq!(entries[1]["description"], "New lead Ada Byron added");
        assert_eq!(entries[1]["leadId"], lead_id);
        assert_eq!(entries[1]["userId"], "user_1");
    }

    #[test]
    fn test_list_filters() {
        let service = dev_service();
        let officer = login(&service, "user_4");

        let education = service.handle(
            &ApiRequest::get("/api/positions").with_query("sector", "education").with_credentials(&officer),
        );
        let items = education.body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|p| p["sector"] == "education"));
    }

    #[test]
    fn test_current_user_profile() {
        let service = dev_service();
        let screener = login(&service, "user_3");

        let profile = service.handle(&ApiRequest::get("/api/auth/user").with_credentials(&screener));
        assert_eq!(profile.status, 200);
        assert_eq!(profile.body["role"], "medical_screener");
        assert_eq!(profile.body["user"]["firstName"], "Dr. Emily");
        assert_eq!(profile.body["visibleSections"], json!(["applications", "medical-screening"]));
        assert_eq!(profile.body["landingPath"], "/applications");
        assert!(profile.body["capabilities"].as_array().unwrap().contains(&json!("viewMedicalDetails")));
    }

    // ── Development identity isolation ────────────────────────────────────────

    #[test]
    fn test_dev_login_flow() {
        let service = dev_service();

        let users = service.handle(&ApiRequest::get("/api/dev/users"));
        assert_eq!(users.body.as_array().unwrap().len(), 4);

        let login = service.handle(&ApiRequest::post("/api/dev/login", json!({ "userId": "user_2" })));
        assert_eq!(login.status, 200);
        assert_eq!(login.body["message"], "Logged in successfully");
        let token = Credentials::new(login.body["token"].as_str().unwrap());

        assert_eq!(service.handle(&ApiRequest::get("/api/placements").with_credentials(&token)).status, 200);

        let logout = service.handle(&ApiRequest::post("/api/dev/logout", json!({})).with_credentials(&token));
        assert_eq!(logout.status, 200);
        assert_eq!(service.handle(&ApiRequest::get("/api/placements").with_credentials(&token)).status, 401);

        let bad = service.handle(&ApiRequest::post("/api/dev/login", json!({ "userId": "user_9" })));
        assert_eq!(bad.status, 400);
    }

    #[test]
    fn test_external_mode_has_no_dev_routes() {
        let service =
            ServiceBuilder::new(AppConfig::default()).external_identity(Arc::new(BearerIsSubject)).build().unwrap();

        assert!(service.dev_identity().is_none());
        let login = service.handle(&ApiRequest::post("/api/dev/login", json!({ "userId": "user_1" })));
        assert_eq!(login.status, 404);

        let recruiter = Credentials::new("user_1");
        assert_eq!(service.handle(&ApiRequest::get("/api/leads").with_credentials(&recruiter)).status, 200);
    }

    #[test]
    fn test_builder_refuses_unsafe_identity_setups() {
        let mixed = ServiceBuilder::new(AppConfig::development()).external_identity(Arc::new(BearerIsSubject)).build();
        assert!(matches!(mixed, Err(FlowError::ConfigError { .. })));

        let mut production_dev = AppConfig::development();
        production_dev.environment = Environment::Production;
        assert!(matches!(ServiceBuilder::new(production_dev).build(), Err(FlowError::ConfigError { .. })));

        let mut external = AppConfig::development();
        external.identity.mode = IdentityMode::External;
        assert!(matches!(ServiceBuilder::new(external).build(), Err(FlowError::ConfigError { .. })));
    }

    // ── Audit ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_every_gate_decision_is_chained() {
        let service = dev_service();
        let recruiter = login(&service, "user_1");

        service.handle(&ApiRequest::get("/api/leads").with_credentials(&recruiter));
        service.handle(&ApiRequest::get("/api/medical-screenings/ms-1/details").with_credentials(&recruiter));
        service.handle(&ApiRequest::get("/api/leads"));
        // Not gated, so not audited.
        service.handle(&ApiRequest::get("/api/dev/users"));

        let trail = service.audit_trail().expect("audit enabled by default");
        let log = trail.export_log().unwrap();
        assert_eq!(log.events.len(), 3);
        assert_eq!(trail.rejection_count().unwrap(), 2);
        assert!(trail.verify_integrity().unwrap());
        assert_eq!(log.events[1].record.operation, "GET /api/medical-screenings/:id/details");
    }

    #[test]
    fn test_audit_failure_rejects_request() {
        let service = ServiceBuilder::new(AppConfig::development()).audit_writer(Arc::new(FailingAudit)).build().unwrap();
        let recruiter = login(&service, "user_1");

        let response = service.handle(&ApiRequest::get("/api/leads").with_credentials(&recruiter));
        assert_eq!(response.status, 500);
        assert_eq!(response.body["message"], "internal server error");
    }

    #[test]
    fn test_audit_disabled() {
        let mut config = AppConfig::development();
        config.audit.enabled = false;
        let service = ServiceBuilder::new(config).build().unwrap();
        assert!(service.audit_trail().is_none());

        let recruiter = login(&service, "user_1");
        assert_eq!(service.handle(&ApiRequest::get("/api/leads").with_credentials(&recruiter)).status, 200);
    }
}
