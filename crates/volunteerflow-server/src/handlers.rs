//! Protected resource handlers.
//!
//! A handler runs only with an `Admitted` caller, so none of them re-derive
//! permissions. The one exception is the medical-details read, which goes
//! through `RedactionPolicy` and its own capability re-check.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::info;

use volunteerflow_contracts::{
    error::{FlowError, FlowResult},
    records::{
        Application, Lead, MedicalDetailsInput, MedicalScreening, MedicalScreeningDetails, NewApplication, NewLead,
        NewMedicalScreening, NewPlacement, NewPosition, PipelineStatus, Placement, Position,
    },
    verify::PayloadSchema,
};
use volunteerflow_core::{traits::Verifier, Admitted, Disclosure, RedactionPolicy};
use volunteerflow_verify::SchemaVerifier;

use crate::{
    activity::{Change, Tracked, RECENT_LIMIT},
    reports,
    routes::{ApiRequest, Endpoint, PathParams},
    schemas,
    store::InMemoryStore,
};

/// Default service length of a position with no explicit end date.
pub const DEFAULT_POSITION_MONTHS: u32 = 27;

/// A successful handler result.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    fn no_content() -> Self {
        Self { status: 204, body: Value::Null }
    }
}

pub(crate) struct Handlers<'a> {
    pub store: &'a InMemoryStore,
    pub verifier: &'a SchemaVerifier,
    pub redaction: &'a RedactionPolicy,
}

impl Handlers<'_> {
    pub fn dispatch(
        &self,
        endpoint: Endpoint,
        params: &PathParams,
        request: &ApiRequest,
        caller: &Admitted,
    ) -> FlowResult<Reply> {
        use Endpoint::*;

        match endpoint {
            ListLeads => self.list(request, |t| Ok(t.leads.list())),
            GetLead => self.get(|t| t.leads.get(params.id()?)),
            CreateLead => self.create_lead(request, caller),
            UpdateLead => self.update(request, caller, schemas::lead_update(), |t, body| t.leads.patch(params.id()?, body)),
            DeleteLead => self.delete(caller, |t| t.leads.remove(params.id()?)),

            ListPositions => self.list(request, |t| Ok(t.positions.list())),
            GetPosition => self.get(|t| t.positions.get(params.id()?)),
            CreatePosition => self.create_position(request, caller),
            UpdatePosition => self.update(request, caller, schemas::position_update(), |t, body| {
                t.positions.patch_checked(params.id()?, body, |p| check_dates(p.start_date, p.end_date))
            }),
            DeletePosition => self.delete(caller, |t| t.positions.remove(params.id()?)),

            ListApplications => self.list(request, |t| Ok(t.applications.list())),
            GetApplication => self.get(|t| t.applications.get(params.id()?)),
            CreateApplication => self.create_application(request, caller),
            UpdateApplication => self.update(request, caller, schemas::application_update(), |t, body| {
                t.applications.patch(params.id()?, body)
            }),

            ListScreenings => self.list(request, |t| Ok(t.screenings.list())),
            GetScreening => self.get(|t| t.screenings.get(params.id()?)),
            CreateScreening => self.create_screening(request, caller),
            UpdateScreening => self.update(request, caller, schemas::screening_update(), |t, body| {
                t.screenings.patch(params.id()?, body)
            }),
            GetMedicalDetails => self.medical_details(params.id()?, caller),
            PutMedicalDetails => self.replace_medical_details(params.id()?, request, caller),

            ListPlacements => self.list(request, |t| Ok(t.placements.list())),
            GetPlacement => self.get(|t| t.placements.get(params.id()?)),
            CreatePlacement => self.create_placement(request, caller),
            UpdatePlacement => self.update(request, caller, schemas::placement_update(), |t, body| {
                t.placements.patch_checked(params.id()?, body, |p| check_dates(p.start_date, p.end_date))
            }),

            PipelineReport => {
                let leads = self.store.read(|t| Ok(t.leads.list()))?;
                Ok(Reply::ok(to_body(&reports::pipeline(&leads))?))
            }
            SectorReport => {
                let positions = self.store.read(|t| Ok(t.positions.list()))?;
                Ok(Reply::ok(to_body(&reports::sectors(&positions))?))
            }

            DashboardMetrics => {
                let metrics = self.store.read(|t| {
                    Ok(reports::metrics(&t.leads.list(), &t.positions.list(), &t.placements.list()))
                })?;
                Ok(Reply::ok(to_body(&metrics)?))
            }
            UrgentItems => {
                let items = self
                    .store
                    .read(|t| Ok(reports::urgent_items(&t.screenings.list(), &t.applications.list(), Utc::now())))?;
                Ok(Reply::ok(to_body(&items)?))
            }
            RecentActivities => {
                let recent = self.store.read(|t| Ok(t.activities.recent(RECENT_LIMIT)))?;
                Ok(Reply::ok(to_body(&recent)?))
            }

            CurrentUser | DevLogin | DevUsers | DevLogout => Err(FlowError::Collaborator {
                reason: format!("{endpoint:?} is not a resource endpoint"),
            }),
        }
    }

    // ── Generic operations ────────────────────────────────────────────────────

    fn list<T: Serialize>(
        &self,
        request: &ApiRequest,
        rows: impl FnOnce(&crate::store::Tables) -> FlowResult<Vec<T>>,
    ) -> FlowResult<Reply> {
        let rows = self.store.read(rows)?;
        let filter = ListFilter::from_query(&request.query);
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let value = to_body(row)?;
            if filter.matches(&value) {
                items.push(value);
            }
        }
        Ok(Reply::ok(Value::Array(items)))
    }

    fn get<T: Serialize>(&self, row: impl FnOnce(&crate::store::Tables) -> FlowResult<T>) -> FlowResult<Reply> {
        Ok(Reply::ok(to_body(&self.store.read(row)?)?))
    }

    fn update<T: Tracked>(
        &self,
        request: &ApiRequest,
        caller: &Admitted,
        schema: PayloadSchema,
        apply: impl FnOnce(&mut crate::store::Tables, &Value) -> FlowResult<T>,
    ) -> FlowResult<Reply> {
        let body = self.validated_body(request, &schema)?;
        let updated = self.store.write(|t| {
            let updated = apply(t, body)?;
            t.activities.record(&updated, Change::Updated, &caller.user.id);
            Ok(updated)
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, schema_id = %schema.schema_id, "record updated");
        Ok(Reply::ok(to_body(&updated)?))
    }

    fn delete<T: Tracked>(
        &self,
        caller: &Admitted,
        remove: impl FnOnce(&mut crate::store::Tables) -> FlowResult<T>,
    ) -> FlowResult<Reply> {
        self.store.write(|t| {
            let removed = remove(t)?;
            t.activities.record(&removed, Change::Deleted, &caller.user.id);
            Ok(())
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, "record deleted");
        Ok(Reply::no_content())
    }

    // ── Creates ───────────────────────────────────────────────────────────────

    fn create_lead(&self, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let new: NewLead = self.validated(request, &schemas::lead_create())?;
        let now = Utc::now();
        let lead = Lead {
            id: new_id("lead"),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            nationality: new.nationality,
            current_country: new.current_country,
            skills: new.skills,
            languages: new.languages,
            status: new.status.unwrap_or(PipelineStatus::Interested),
            source: new.source,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        };
        let lead = self.store.write(|t| {
            t.activities.record(&lead, Change::Created, &caller.user.id);
            Ok(t.leads.put(lead))
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, lead_id = %lead.id, "lead created");
        Ok(Reply::created(to_body(&lead)?))
    }

    fn create_position(&self, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let new: NewPosition = self.validated(request, &schemas::position_create())?;
        let end_date = match new.end_date {
            Some(end) => end,
            None => default_end_date(new.start_date)?,
        };
        check_dates(new.start_date, end_date)?;

        let now = Utc::now();
        let position = Position {
            id: new_id("pos"),
            title: new.title,
            description: new.description,
            sector: new.sector,
            country: new.country,
            location: new.location,
            start_date: new.start_date,
            end_date,
            requirements: new.requirements,
            is_open: new.is_open.unwrap_or(true),
            max_volunteers: new.max_volunteers.unwrap_or(1),
            current_volunteers: 0,
            priority: new.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        let position = self.store.write(|t| {
            t.activities.record(&position, Change::Created, &caller.user.id);
            Ok(t.positions.put(position))
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, position_id = %position.id, "position created");
        Ok(Reply::created(to_body(&position)?))
    }

    fn create_application(&self, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let new: NewApplication = self.validated(request, &schemas::application_create())?;
        let now = Utc::now();
        let application = self.store.write(|t| {
            require_reference(t.leads.contains(&new.lead_id), "lead", &new.lead_id)?;
            require_reference(t.positions.contains(&new.position_id), "position", &new.position_id)?;
            let application = t.applications.put(Application {
                id: new_id("app"),
                lead_id: new.lead_id,
                position_id: new.position_id,
                status: new.status.unwrap_or(PipelineStatus::Applied),
                applied_at: now,
                interview_date: new.interview_date,
                interview_notes: None,
                score: None,
                rejection_reason: None,
                notes: new.notes,
                updated_at: now,
            });
            t.activities.record(&application, Change::Created, &caller.user.id);
            Ok(application)
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, application_id = %application.id, "application created");
        Ok(Reply::created(to_body(&application)?))
    }

    fn create_screening(&self, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let new: NewMedicalScreening = self.validated(request, &schemas::screening_create())?;
        let screening = self.store.write(|t| {
            require_reference(t.leads.contains(&new.lead_id), "lead", &new.lead_id)?;
            let screening = t.screenings.put(MedicalScreening {
                id: new_id("ms"),
                lead_id: new.lead_id,
                status: new.status.unwrap_or_default(),
                started_at: new.started_at,
                completed_at: None,
                expires_at: new.expires_at,
                vaccinations_complete: false,
                medical_clearance: false,
                mental_health_clearance: false,
                background_check: false,
                outcome_notes: new.outcome_notes,
                updated_at: Utc::now(),
            });
            t.activities.record(&screening, Change::Created, &caller.user.id);
            Ok(screening)
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, screening_id = %screening.id, "medical screening created");
        Ok(Reply::created(to_body(&screening)?))
    }

    fn create_placement(&self, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let new: NewPlacement = self.validated(request, &schemas::placement_create())?;
        check_dates(new.start_date, new.end_date)?;
        let placement = self.store.write(|t| {
            require_reference(t.leads.contains(&new.lead_id), "lead", &new.lead_id)?;
            require_reference(t.positions.contains(&new.position_id), "position", &new.position_id)?;
            let placement = t.placements.put(Placement {
                id: new_id("pl"),
                lead_id: new.lead_id,
                position_id: new.position_id,
                start_date: new.start_date,
                end_date: new.end_date,
                actual_end_date: None,
                status: new.status.unwrap_or_default(),
                onboarding_completed: false,
                supervisor: new.supervisor,
                notes: new.notes,
                updated_at: Utc::now(),
            });
            t.activities.record(&placement, Change::Created, &caller.user.id);
            Ok(placement)
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, placement_id = %placement.id, "placement created");
        Ok(Reply::created(to_body(&placement)?))
    }

    // ── Restricted layer ──────────────────────────────────────────────────────

    /// Read the restricted sub-record. "Nothing recorded" is a `200` with
    /// `not_recorded`, never confused with a denial.
    fn medical_details(&self, screening_id: &str, caller: &Admitted) -> FlowResult<Reply> {
        self.store.read(|t| t.screenings.get(screening_id))?;
        let disclosure = match self.redaction.fetch_medical_details(Some(&caller.user), screening_id, self.store)? {
            Some(details) => Disclosure::Disclosed(details),
            None => Disclosure::NotRecorded,
        };
        info!(request_id = %caller.request_id, subject = %caller.user.id, screening_id, "medical details read");
        Ok(Reply::ok(to_body(&disclosure)?))
    }

    /// Replace the restricted sub-record of an existing screening.
    fn replace_medical_details(&self, screening_id: &str, request: &ApiRequest, caller: &Admitted) -> FlowResult<Reply> {
        let input: MedicalDetailsInput = self.validated(request, &schemas::medical_details())?;
        let details = self.store.write(|t| {
            t.screenings.get(screening_id)?;
            Ok(t.medical_details.put(MedicalScreeningDetails {
                screening_id: screening_id.to_string(),
                medical_history: input.medical_history,
                current_medications: input.current_medications,
                screening_notes: input.screening_notes,
                clearance_reasoning: input.clearance_reasoning,
                updated_at: Utc::now(),
            }))
        })?;
        info!(request_id = %caller.request_id, subject = %caller.user.id, screening_id, "medical details replaced");
        Ok(Reply::ok(to_body(&Disclosure::Disclosed(details))?))
    }

    // ── Validation ────────────────────────────────────────────────────────────

    fn validated_body<'r>(&self, request: &'r ApiRequest, schema: &PayloadSchema) -> FlowResult<&'r Value> {
        let body = request
            .body
            .as_ref()
            .ok_or_else(|| FlowError::ValidationFailed { reason: "request body required".to_string() })?;
        let report = self.verifier.verify(body, schema)?;
        if !report.passed {
            return Err(FlowError::ValidationFailed { reason: report.summary() });
        }
        Ok(body)
    }

    pub(crate) fn validated<T: DeserializeOwned>(&self, request: &ApiRequest, schema: &PayloadSchema) -> FlowResult<T> {
        let body = self.validated_body(request, schema)?;
        serde_json::from_value(body.clone()).map_err(|e| FlowError::ValidationFailed {
            reason: format!("[{}] {}", schema.schema_id, e),
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `status`, `sector` and `country` query filters over serialized records.
///
/// `country` matches either a position's `country` or a lead's
/// `currentCountry`. Other query keys are ignored.
#[derive(Debug, Default)]
struct ListFilter<'q> {
    status: Option<&'q str>,
    sector: Option<&'q str>,
    country: Option<&'q str>,
}

impl<'q> ListFilter<'q> {
    fn from_query(query: &'q BTreeMap<String, String>) -> Self {
        Self {
            status: query.get("status").map(String::as_str),
            sector: query.get("sector").map(String::as_str),
            country: query.get("country").map(String::as_str),
        }
    }

    fn matches(&self, record: &Value) -> bool {
        let field_is = |field: &str, expected: &str| record.get(field).and_then(Value::as_str) == Some(expected);

        self.status.map_or(true, |s| field_is("status", s))
            && self.sector.map_or(true, |s| field_is("sector", s))
            && self.country.map_or(true, |c| field_is("country", c) || field_is("currentCountry", c))
    }
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

pub(crate) fn to_body<T: Serialize + ?Sized>(value: &T) -> FlowResult<Value> {
    serde_json::to_value(value).map_err(|e| FlowError::Collaborator {
        reason: format!("failed to serialize response: {}", e),
    })
}

/// `start` plus `DEFAULT_POSITION_MONTHS`, clamped to the end of the month.
pub fn default_end_date(start: NaiveDate) -> FlowResult<NaiveDate> {
    start
        .checked_add_months(Months::new(DEFAULT_POSITION_MONTHS))
        .ok_or_else(|| FlowError::ValidationFailed { reason: format!("start date {start} is out of range") })
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> FlowResult<()> {
    if end < start {
        return Err(FlowError::ValidationFailed {
            reason: format!("end date {end} precedes start date {start}"),
        });
    }
    Ok(())
}

fn require_reference(exists: bool, resource: &str, id: &str) -> FlowResult<()> {
    if exists {
        Ok(())
    } else {
        Err(FlowError::ValidationFailed { reason: format!("{resource} '{id}' does not exist") })
    }
}
