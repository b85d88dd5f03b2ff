//! End-to-end access scenarios run against a development-mode service.
//!
//! Each scenario signs in one seeded staff member, issues requests through
//! `VolunteerFlowService::handle`, and asserts the status it expects. The
//! navigation scenarios run the client guard on the same evaluator.

use serde_json::json;
use tracing::info;

use volunteerflow_contracts::{
    error::{FlowError, FlowResult},
    user::Credentials,
};
use volunteerflow_server::{ApiRequest, AppConfig, ServiceBuilder, VolunteerFlowService};
use volunteerflow_ui::{Navigation, NavigationGuard, SessionState};

const RECRUITER: &str = "user_1";
const PLACEMENT_OFFICER: &str = "user_2";
const MEDICAL_SCREENER: &str = "user_3";
const COUNTRY_OFFICER: &str = "user_4";

struct Harness {
    service: VolunteerFlowService,
    nav: NavigationGuard,
}

impl Harness {
    fn new() -> FlowResult<Self> {
        let service = ServiceBuilder::new(AppConfig::development()).build()?;
        let nav = NavigationGuard::new(service.evaluator().clone());
        Ok(Self { service, nav })
    }

    fn sign_in(&self, user_id: &str) -> FlowResult<(Credentials, SessionState)> {
        let dev = self.service.dev_identity().ok_or_else(|| FlowError::ConfigError {
            reason: "development identity is not enabled".to_string(),
        })?;
        let login = dev.login(user_id)?;
        Ok((Credentials::new(login.token), SessionState::signed_in(login.user)))
    }

    /// Send `request` and require `expected`.
    fn expect(&self, label: &str, request: ApiRequest, expected: u16) -> FlowResult<()> {
        let response = self.service.handle(&request);
        let mark = if response.status == expected { "ok " } else { "BAD" };
        println!("  [{mark}] {label:<58} -> {}", response.status);
        if response.status != expected {
            return Err(FlowError::Collaborator {
                reason: format!("{label}: expected {expected}, got {}", response.status),
            });
        }
        Ok(())
    }

    fn navigate(&self, label: &str, session: &SessionState, path: &str, expected: Navigation) -> FlowResult<()> {
        let outcome = self.nav.resolve(session, path);
        let mark = if outcome == expected { "ok " } else { "BAD" };
        println!("  [{mark}] {label:<58} -> {outcome:?}");
        if outcome != expected {
            return Err(FlowError::Collaborator {
                reason: format!("{label}: expected {expected:?}, got {outcome:?}"),
            });
        }
        Ok(())
    }
}

fn header(title: &str) {
    println!();
    println!("── {title} ──");
}

pub fn run_all() -> FlowResult<()> {
    let harness = Harness::new()?;
    medical_details(&harness)?;
    position_and_lead_creation(&harness)?;
    dashboard(&harness)?;
    navigation(&harness)?;
    audit_chain(&harness)
}

fn medical_details(h: &Harness) -> FlowResult<()> {
    header("Medical details restriction");

    let (recruiter, _) = h.sign_in(RECRUITER)?;
    h.expect(
        "recruiter reads screening outcome",
        ApiRequest::get("/api/medical-screenings/ms-1").with_credentials(&recruiter),
        200,
    )?;
    h.expect(
        "recruiter reads screening details",
        ApiRequest::get("/api/medical-screenings/ms-1/details").with_credentials(&recruiter),
        403,
    )?;

    let (screener, _) = h.sign_in(MEDICAL_SCREENER)?;
    h.expect(
        "medical screener reads screening outcome",
        ApiRequest::get("/api/medical-screenings/ms-1").with_credentials(&screener),
        200,
    )?;
    h.expect(
        "medical screener reads screening details",
        ApiRequest::get("/api/medical-screenings/ms-1/details").with_credentials(&screener),
        200,
    )
}

fn position_and_lead_creation(h: &Harness) -> FlowResult<()> {
    header("Country officer writes");

    let (officer, _) = h.sign_in(COUNTRY_OFFICER)?;
    let position = json!({
        "title": "Math Teacher",
        "description": "Secondary school mathematics",
        "sector": "education",
        "country": "Ghana",
        "startDate": "2025-09-01"
    });
    h.expect(
        "country officer creates a position",
        ApiRequest::post("/api/positions", position).with_credentials(&officer),
        201,
    )?;

    let lead = json!({ "firstName": "Ada", "lastName": "Byron", "email": "ada@example.org" });
    h.expect(
        "country officer creates a lead",
        ApiRequest::post("/api/leads", lead).with_credentials(&officer),
        403,
    )?;

    h.expect("anonymous lists leads", ApiRequest::get("/api/leads"), 401)
}

fn dashboard(h: &Harness) -> FlowResult<()> {
    header("Dashboard");

    let (officer, _) = h.sign_in(COUNTRY_OFFICER)?;
    h.expect(
        "country officer reads dashboard metrics",
        ApiRequest::get("/api/dashboard/metrics").with_credentials(&officer),
        200,
    )?;
    h.expect(
        "country officer reads recent activities",
        ApiRequest::get("/api/dashboard/recent-activities").with_credentials(&officer),
        200,
    )?;

    let (screener, _) = h.sign_in(MEDICAL_SCREENER)?;
    h.expect(
        "medical screener reads urgent items",
        ApiRequest::get("/api/dashboard/urgent-items").with_credentials(&screener),
        403,
    )
}

fn navigation(h: &Harness) -> FlowResult<()> {
    header("Client navigation");

    h.navigate(
        "anonymous opens /placements",
        &SessionState::anonymous(),
        "/placements",
        Navigation::Redirect { to: "/".to_string() },
    )?;

    let (_, placement_officer) = h.sign_in(PLACEMENT_OFFICER)?;
    h.navigate(
        "placement officer opens /leads",
        &placement_officer,
        "/leads",
        Navigation::Render { path: "/leads".to_string(), read_only: true },
    )?;

    let (_, officer) = h.sign_in(COUNTRY_OFFICER)?;
    h.navigate(
        "country officer opens /leads",
        &officer,
        "/leads",
        Navigation::Redirect { to: "/positions".to_string() },
    )
}

fn audit_chain(h: &Harness) -> FlowResult<()> {
    header("Audit trail");

    let Some(trail) = h.service.audit_trail() else {
        println!("  audit disabled");
        return Ok(());
    };
    let log = trail.export_log()?;
    let intact = trail.verify_integrity()?;
    println!("  events:        {}", log.events.len());
    println!("  rejections:    {}", trail.rejection_count()?);
    println!("  terminal hash: {}", log.terminal_hash);
    println!("  chain intact:  {intact}");
    info!(events = log.events.len(), intact, "audit chain checked");

    if !intact {
        return Err(FlowError::Collaborator { reason: "audit chain failed verification".to_string() });
    }
    Ok(())
}
