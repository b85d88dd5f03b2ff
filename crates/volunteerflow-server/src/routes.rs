//! Transport-agnostic request/response types and the route table.
//!
//! Every route that exposes or mutates a protected resource is declared here
//! with its `Requirement`. The service consults this table before dispatch,
//! so a handler can only run behind the gate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};

use volunteerflow_contracts::{
    access::Requirement,
    capability::Capability,
    error::{FlowError, FlowResult},
    user::Credentials,
};

// ── Transport types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    pub fn is_read(self) -> bool {
        self == Method::Get
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("unsupported method '{other}'")),
        }
    }
}

/// One inbound API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub credentials: Option<Credentials>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: BTreeMap::new(), credentials: None, body: None }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_credentials(mut self, credentials: &Credentials) -> Self {
        self.credentials = Some(credentials.clone());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn message(status: u16, message: &str) -> Self {
        Self::new(status, json!({ "message": message }))
    }

    /// Map an error to its response.
    ///
    /// Denials keep their distinct statuses; anything outside the known
    /// request errors becomes a generic `500` that reveals nothing.
    pub fn from_error(error: &FlowError) -> Self {
        match error {
            FlowError::Unauthenticated => Self::message(401, "authentication required"),
            FlowError::NoRole { .. } => Self::message(403, "access restricted"),
            FlowError::Forbidden { .. } | FlowError::NotFound { .. } | FlowError::ValidationFailed { .. } => {
                Self::message(status_for(error), &error.to_string())
            }
            _ => Self::message(500, "internal server error"),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP status for `error`.
pub fn status_for(error: &FlowError) -> u16 {
    match error {
        FlowError::Unauthenticated => 401,
        FlowError::NoRole { .. } | FlowError::Forbidden { .. } => 403,
        FlowError::NotFound { .. } => 404,
        FlowError::ValidationFailed { .. } => 400,
        FlowError::AuditWriteFailed { .. } | FlowError::ConfigError { .. } | FlowError::Collaborator { .. } => 500,
    }
}

// ── Route table ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListLeads,
    GetLead,
    CreateLead,
    UpdateLead,
    DeleteLead,
    ListPositions,
    GetPosition,
    CreatePosition,
    UpdatePosition,
    DeletePosition,
    ListApplications,
    GetApplication,
    CreateApplication,
    UpdateApplication,
    ListScreenings,
    GetScreening,
    CreateScreening,
    UpdateScreening,
    GetMedicalDetails,
    PutMedicalDetails,
    ListPlacements,
    GetPlacement,
    CreatePlacement,
    UpdatePlacement,
    PipelineReport,
    SectorReport,
    DashboardMetrics,
    UrgentItems,
    RecentActivities,
    CurrentUser,
    DevLogin,
    DevUsers,
    DevLogout,
}

impl Endpoint {
    /// True for the only endpoints allowed to return restricted medical fields.
    pub fn carries_restricted_layer(self) -> bool {
        matches!(self, Endpoint::GetMedicalDetails | Endpoint::PutMedicalDetails)
    }
}

/// What a route demands before its handler runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// No identity needed. Only the development routes use this.
    Public,
    /// A resolved identity, without any capability check.
    Identified,
    /// The full gate check against a requirement.
    Gated(Requirement),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    /// Path pattern; `:name` segments capture one path segment.
    pub pattern: &'static str,
    pub endpoint: Endpoint,
    pub access: Access,
}

impl Route {
    fn gated(method: Method, pattern: &'static str, endpoint: Endpoint, capabilities: &[Capability]) -> Self {
        Self { method, pattern, endpoint, access: Access::Gated(Requirement::all_of(capabilities)) }
    }

    /// `"GET /api/leads/:id"`, used as the gate operation label.
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.pattern)
    }

    pub fn requirement(&self) -> Option<&Requirement> {
        match &self.access {
            Access::Gated(requirement) => Some(requirement),
            _ => None,
        }
    }

    pub fn matches(&self, method: Method, path: &str) -> Option<PathParams> {
        if self.method != method {
            return None;
        }
        match_pattern(self.pattern, path)
    }
}

/// Captured `:name` path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(BTreeMap<&'static str, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn id(&self) -> FlowResult<&str> {
        self.get("id").ok_or_else(|| FlowError::ValidationFailed { reason: "missing path id".to_string() })
    }
}

/// Match `path` against `pattern`, ignoring one trailing slash.
pub fn match_pattern(pattern: &'static str, path: &str) -> Option<PathParams> {
    let path = path.split('?').next().unwrap_or(path);
    let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };

    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = BTreeMap::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(PathParams(params)),
            (Some(p), Some(s)) => {
                if let Some(name) = p.strip_prefix(':') {
                    if s.is_empty() {
                        return None;
                    }
                    params.insert(name, s.to_string());
                } else if p != s {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Every protected route and the `/api/auth/user` profile route.
pub fn protected_routes() -> Vec<Route> {
    use Capability::*;
    use Endpoint::*;
    use Method::*;

    vec![
        Route::gated(Get, "/api/leads", ListLeads, &[ViewLeads]),
        Route::gated(Get, "/api/leads/:id", GetLead, &[ViewLeads]),
        Route::gated(Post, "/api/leads", CreateLead, &[ManageLeads]),
        Route::gated(Patch, "/api/leads/:id", UpdateLead, &[ManageLeads]),
        Route::gated(Delete, "/api/leads/:id", DeleteLead, &[ManageLeads]),
        Route::gated(Get, "/api/positions", ListPositions, &[ViewPositions]),
        Route::gated(Get, "/api/positions/:id", GetPosition, &[ViewPositions]),
        Route::gated(Post, "/api/positions", CreatePosition, &[ManagePositions]),
        Route::gated(Patch, "/api/positions/:id", UpdatePosition, &[ManagePositions]),
        Route::gated(Delete, "/api/positions/:id", DeletePosition, &[ManagePositions]),
        Route::gated(Get, "/api/applications", ListApplications, &[ViewApplications]),
        Route::gated(Get, "/api/applications/:id", GetApplication, &[ViewApplications]),
        Route::gated(Post, "/api/applications", CreateApplication, &[ManageApplications]),
        Route::gated(Patch, "/api/applications/:id", UpdateApplication, &[ManageApplications]),
        Route::gated(Get, "/api/medical-screenings", ListScreenings, &[ViewMedicalScreenings]),
        Route::gated(Get, "/api/medical-screenings/:id", GetScreening, &[ViewMedicalScreenings]),
        Route::gated(Post, "/api/medical-screenings", CreateScreening, &[ManageMedicalScreenings]),
        Route::gated(Patch, "/api/medical-screenings/:id", UpdateScreening, &[ManageMedicalScreenings]),
        Route::gated(
            Get,
            "/api/medical-screenings/:id/details",
            GetMedicalDetails,
            &[ViewMedicalScreenings, ViewMedicalDetails],
        ),
        Route::gated(
            Put,
            "/api/medical-screenings/:id/details",
            PutMedicalDetails,
            &[ManageMedicalScreenings, ViewMedicalDetails],
        ),
        Route::gated(Get, "/api/placements", ListPlacements, &[ViewPlacements]),
        Route::gated(Get, "/api/placements/:id", GetPlacement, &[ViewPlacements]),
        Route::gated(Post, "/api/placements", CreatePlacement, &[ManagePlacements]),
        Route::gated(Patch, "/api/placements/:id", UpdatePlacement, &[ManagePlacements]),
        Route::gated(Get, "/api/reports/pipeline", PipelineReport, &[ViewReports]),
        Route::gated(Get, "/api/reports/sectors", SectorReport, &[ViewReports]),
        Route::gated(Get, "/api/dashboard/metrics", DashboardMetrics, &[ViewReports]),
        Route::gated(Get, "/api/dashboard/urgent-items", UrgentItems, &[ViewReports]),
        Route::gated(Get, "/api/dashboard/recent-activities", RecentActivities, &[ViewReports]),
        Route { method: Get, pattern: "/api/auth/user", endpoint: CurrentUser, access: Access::Identified },
    ]
}

/// The development identity routes. Mounted only in development identity mode.
pub fn dev_routes() -> Vec<Route> {
    vec![
        Route { method: Method::Post, pattern: "/api/dev/login", endpoint: Endpoint::DevLogin, access: Access::Public },
        Route { method: Method::Get, pattern: "/api/dev/users", endpoint: Endpoint::DevUsers, access: Access::Public },
        Route { method: Method::Post, pattern: "/api/dev/logout", endpoint: Endpoint::DevLogout, access: Access::Public },
    ]
}

#[cfg(test)]
mod tests {
    use volunteerflow_contracts::{capability::Capability, section::Section};

    use super::{dev_routes, match_pattern, protected_routes, Access, Method};

    fn section_of(pattern: &str) -> Option<Section> {
        let resource = pattern.trim_start_matches("/api/").split('/').next()?;
        match resource {
            "leads" => Some(Section::Leads),
            "positions" => Some(Section::Positions),
            "applications" => Some(Section::Applications),
            "medical-screenings" => Some(Section::MedicalScreening),
            "placements" => Some(Section::Placements),
            "reports" | "dashboard" => Some(Section::Reports),
            _ => None,
        }
    }

    /// Every resource route is gated by its section's capability: reads by
    /// the view capability, writes by the manage capability.
    #[test]
    fn test_every_resource_route_is_gated_consistently() {
        for route in protected_routes() {
            let Some(section) = section_of(route.pattern) else {
                assert_eq!(route.access, Access::Identified, "{} must be the profile route", route.label());
                continue;
            };
            let requirement = route.requirement().unwrap_or_else(|| panic!("{} is not gated", route.label()));
            assert!(!requirement.is_unrestricted(), "{} is unrestricted", route.label());

            let expected = if route.method.is_read() {
                section.view_capability()
            } else {
                section.manage_capability().unwrap_or_else(|| panic!("{} writes a read-only section", route.label()))
            };
            assert!(
                requirement.capabilities.contains(&expected),
                "{} must require {}",
                route.label(),
                expected
            );
        }
    }

    #[test]
    fn test_details_routes_require_view_medical_details() {
        let details: Vec<_> =
            protected_routes().into_iter().filter(|r| r.pattern.ends_with("/details")).collect();
        assert_eq!(details.len(), 2);
        for route in details {
            let requirement = route.requirement().unwrap();
            assert!(requirement.capabilities.contains(&Capability::ViewMedicalDetails));
            assert!(route.endpoint.carries_restricted_layer());
        }
    }

    /// The dashboard aggregates every section, so it sits behind the
    /// reporting capability and never carries restricted fields.
    #[test]
    fn test_dashboard_routes_are_reports() {
        let dashboard: Vec<_> =
            protected_routes().into_iter().filter(|r| r.pattern.starts_with("/api/dashboard/")).collect();
        assert_eq!(dashboard.len(), 3);
        for route in dashboard {
            assert_eq!(route.method, Method::Get);
            assert_eq!(route.requirement().unwrap().capabilities, vec![Capability::ViewReports]);
            assert!(!route.endpoint.carries_restricted_layer());
        }
    }

    #[test]
    fn test_no_two_routes_overlap() {
        let routes = protected_routes().into_iter().chain(dev_routes()).collect::<Vec<_>>();
        for (i, a) in routes.iter().enumerate() {
            for b in routes.iter().skip(i + 1) {
                assert!(
                    !(a.method == b.method && a.pattern == b.pattern),
                    "duplicate route {}",
                    a.label()
                );
            }
        }
    }

    #[test]
    fn test_pattern_matching() {
        let params = match_pattern("/api/leads/:id", "/api/leads/lead-1/").unwrap();
        assert_eq!(params.get("id"), Some("lead-1"));
        assert!(match_pattern("/api/leads/:id", "/api/leads").is_none());
        assert!(match_pattern("/api/leads/:id", "/api/leads/").is_none());
        assert!(match_pattern("/api/leads", "/api/leads?status=applied").is_some());
        assert!(match_pattern("/api/medical-screenings/:id", "/api/medical-screenings/ms-1/details").is_none());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("patch".parse::<Method>().unwrap(), Method::Patch);
        assert!("TRACE".parse::<Method>().is_err());
    }
}
