//! # volunteerflow-rbac
//!
//! The single role-permission table for VolunteerFlow and the fail-closed
//! evaluator built on it.
//!
//! ## Overview
//!
//! [`PermissionTable::standard`] is the only definition of who may do what.
//! [`PermissionEvaluator`] wraps a shared reference to it and answers
//! capability, role-set and section-visibility questions. It implements
//! [`Authorizer`](volunteerflow_core::traits::Authorizer) so the server gate
//! and the client gate consult the same value.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use volunteerflow_rbac::{PermissionEvaluator, PermissionTable};
//!
//! let evaluator = PermissionEvaluator::new(Arc::new(PermissionTable::standard()));
//! assert!(!evaluator.has_capability(None, Capability::ViewLeads));
//! ```

pub mod evaluator;
pub mod table;

pub use evaluator::PermissionEvaluator;
pub use table::{PermissionTable, RolePermissions};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use volunteerflow_contracts::{
        access::{AccessDecision, Requirement},
        capability::Capability,
        role::Role,
        section::Section,
        user::User,
    };
    use volunteerflow_core::traits::Authorizer;

    use crate::{PermissionEvaluator, PermissionTable};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn evaluator() -> PermissionEvaluator {
        PermissionEvaluator::new(Arc::new(PermissionTable::standard()))
    }

    fn user(role: Role) -> User {
        User::with_role(format!("{role}-1"), role)
    }

    fn user_with_raw_role(raw: &str) -> User {
        let mut u = User::without_role("raw");
        u.role = Some(raw.to_string());
        u
    }

    // ── 1. the table, cell by cell ────────────────────────────────────────────

    /// The table must match the published matrix exactly.
    #[test]
    fn test_table_matches_published_matrix() {
        use Capability::*;
        // Columns: recruiter, placement_officer, medical_screener, country_officer.
        let expected: [(Capability, [bool; 4]); 12] = [
            (ViewLeads, [true, true, false, false]),
            (ManageLeads, [true, false, false, false]),
            (ViewPositions, [true, true, false, true]),
            (ManagePositions, [false, false, false, true]),
            (ViewApplications, [true, true, true, true]),
            (ManageApplications, [true, true, false, false]),
            (ViewMedicalScreenings, [true, true, true, true]),
            (ManageMedicalScreenings, [false, false, true, false]),
            (ViewMedicalDetails, [false, false, true, false]),
            (ViewPlacements, [true, true, false, true]),
            (ManagePlacements, [false, true, false, true]),
            (ViewReports, [true, true, false, true]),
        ];

        let table = PermissionTable::standard();
        for (cap, row) in expected {
            for (role, granted) in Role::ALL.into_iter().zip(row) {
                assert_eq!(
                    table.lookup(role, cap),
                    granted,
                    "table[{role}][{cap}] should be {granted}"
                );
            }
        }
    }

    // ── 2. manage implies view ────────────────────────────────────────────────

    #[test]
    fn test_manage_implies_view_for_every_role() {
        let table = PermissionTable::standard();
        for role in Role::ALL {
            for (view, manage) in Capability::VIEW_MANAGE_PAIRS {
                if table.lookup(role, manage) {
                    assert!(table.lookup(role, view), "{role} holds {manage} without {view}");
                }
            }
        }
    }

    // ── 3. fail-closed ────────────────────────────────────────────────────────

    #[test]
    fn test_absent_user_has_no_capability() {
        let eval = evaluator();
        for cap in Capability::ALL {
            assert!(!eval.has_capability(None, cap), "absent user must not hold {cap}");
        }
    }

    #[test]
    fn test_user_without_role_has_no_capability() {
        let eval = evaluator();
        let no_role = User::without_role("u");
        for cap in Capability::ALL {
            assert!(!eval.has_capability(Some(&no_role), cap));
        }
        assert!(eval.capabilities(Some(&no_role)).is_empty());
    }

    /// Unknown, legacy, empty, and differently-cased role strings all hold nothing.
    #[test]
    fn test_unrecognized_role_has_no_capability() {
        let eval = evaluator();
        let table = PermissionTable::standard();
        for raw in ["recruitment_manager", "admin", "", "RECRUITER", " recruiter"] {
            let u = user_with_raw_role(raw);
            for cap in Capability::ALL {
                assert!(!eval.has_capability(Some(&u), cap), "'{raw}' must not hold {cap}");
                assert!(!table.lookup_named(raw, cap));
            }
            assert!(eval.visible_sections(Some(&u)).is_empty());
        }
    }

    // ── 4. the sensitive partition ────────────────────────────────────────────

    #[test]
    fn test_only_medical_screener_views_medical_details() {
        let eval = evaluator();
        for role in Role::ALL {
            assert_eq!(
                eval.has_capability(Some(&user(role)), Capability::ViewMedicalDetails),
                role == Role::MedicalScreener,
                "viewMedicalDetails for {role}"
            );
        }
    }

    #[test]
    fn test_every_role_views_screening_outcomes() {
        let eval = evaluator();
        for role in Role::ALL {
            assert!(eval.has_capability(Some(&user(role)), Capability::ViewMedicalScreenings));
        }
    }

    // ── 5. combinators ────────────────────────────────────────────────────────

    #[test]
    fn test_has_all_capabilities_empty_is_vacuous_pass() {
        let eval = evaluator();
        assert!(eval.has_all_capabilities(None, &[]));
        assert!(eval.has_all_capabilities(Some(&User::without_role("u")), &[]));
        assert!(eval.has_all_capabilities(Some(&user(Role::MedicalScreener)), &[]));
    }

    #[test]
    fn test_has_all_capabilities_is_logical_and() {
        let eval = evaluator();
        let recruiter = user(Role::Recruiter);
        assert!(eval.has_all_capabilities(
            Some(&recruiter),
            &[Capability::ViewLeads, Capability::ManageLeads]
        ));
        assert!(!eval.has_all_capabilities(
            Some(&recruiter),
            &[Capability::ViewMedicalScreenings, Capability::ViewMedicalDetails]
        ));
    }

    #[test]
    fn test_has_any_role() {
        let eval = evaluator();
        let officer = user(Role::CountryOfficer);
        assert!(eval.has_any_role(Some(&officer), &[]));
        assert!(eval.has_any_role(Some(&officer), &[Role::Recruiter, Role::CountryOfficer]));
        assert!(!eval.has_any_role(Some(&officer), &[Role::MedicalScreener]));
        assert!(!eval.has_any_role(None, &[Role::Recruiter]));
        assert!(!eval.has_any_role(Some(&User::without_role("u")), &[Role::Recruiter]));
    }

    // ── 6. visible sections ───────────────────────────────────────────────────

    #[test]
    fn test_visible_sections_per_role() {
        use Section::*;
        let eval = evaluator();
        let all = vec![Leads, Positions, Applications, MedicalScreening, Placements, Reports];
        assert_eq!(eval.visible_sections(Some(&user(Role::Recruiter))), all);
        assert_eq!(eval.visible_sections(Some(&user(Role::PlacementOfficer))), all);
        assert_eq!(
            eval.visible_sections(Some(&user(Role::MedicalScreener))),
            vec![Applications, MedicalScreening]
        );
        assert_eq!(
            eval.visible_sections(Some(&user(Role::CountryOfficer))),
            vec![Positions, Applications, MedicalScreening, Placements, Reports]
        );
        assert!(eval.visible_sections(None).is_empty());
    }

    #[test]
    fn test_visible_sections_is_deterministic() {
        let eval = evaluator();
        for role in Role::ALL {
            let first = eval.visible_sections(Some(&user(role)));
            for _ in 0..10 {
                assert_eq!(eval.visible_sections(Some(&user(role))), first);
            }
        }
    }

    #[test]
    fn test_landing_path() {
        let eval = evaluator();
        assert_eq!(eval.landing_path(None), "/");
        assert_eq!(eval.landing_path(Some(&user(Role::Recruiter))), "/leads");
        assert_eq!(eval.landing_path(Some(&user(Role::MedicalScreener))), "/applications");
        assert_eq!(eval.landing_path(Some(&user(Role::CountryOfficer))), "/positions");
    }

    // ── 7. Authorizer decisions ───────────────────────────────────────────────

    #[test]
    fn test_country_officer_positions_but_not_leads() {
        let eval = evaluator();
        let officer = user(Role::CountryOfficer);
        assert_eq!(
            eval.decide(Some(&officer), &Requirement::capability(Capability::ManagePositions)),
            AccessDecision::Allow
        );
        match eval.decide(Some(&officer), &Requirement::capability(Capability::ManageLeads)) {
            AccessDecision::Deny { reason } => assert!(reason.contains("manageLeads")),
            other => panic!("expected Deny, got {other:?}"),
        }
    }

    #[test]
    fn test_decide_checks_roles_and_capabilities() {
        let eval = evaluator();
        let requirement = Requirement {
            capabilities: vec![Capability::ViewMedicalScreenings],
            roles: vec![Role::Recruiter, Role::PlacementOfficer, Role::CountryOfficer],
        };
        assert!(eval.decide(Some(&user(Role::Recruiter)), &requirement).is_allowed());
        assert!(!eval.decide(Some(&user(Role::MedicalScreener)), &requirement).is_allowed());
        assert!(!eval.decide(None, &requirement).is_allowed());
    }

    /// Clones of one evaluator share one table.
    #[test]
    fn test_clones_share_the_table() {
        let eval = evaluator();
        let clone = eval.clone();
        assert!(std::ptr::eq(eval.table(), clone.table()));
    }

    #[test]
    fn test_role_permissions_serialize_with_wire_names() {
        let table = PermissionTable::standard();
        let json = serde_json::to_value(table.permissions(Role::MedicalScreener)).unwrap();
        assert_eq!(json["canViewMedicalDetails"], serde_json::json!(true));
        assert_eq!(json["canViewLeads"], serde_json::json!(false));
    }
}
