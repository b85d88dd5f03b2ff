//! # volunteerflow-contracts
//!
//! Shared types, records, and error contracts for the VolunteerFlow
//! access-control core.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod access;
pub mod capability;
pub mod error;
pub mod records;
pub mod role;
pub mod section;
pub mod user;
pub mod verify;

#[cfg(test)]
mod tests {
    use super::*;
    use access::Requirement;
    use capability::{Capability, CapabilitySet};
    use error::FlowError;
    use role::Role;
    use section::Section;
    use user::{RequestId, User};

    // ── Role parsing ─────────────────────────────────────────────────────────

    #[test]
    fn role_parses_every_known_identifier() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_rejects_unknown_and_legacy_identifiers() {
        // The legacy store default is not a role.
        assert!("recruitment_manager".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("Recruiter".parse::<Role>().is_err(), "parsing is case-sensitive");
    }

    #[test]
    fn role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::PlacementOfficer).unwrap();
        assert_eq!(json, "\"placement_officer\"");
    }

    #[test]
    fn role_display_names() {
        assert_eq!(Role::MedicalScreener.display_name(), "Medical Screener");
        assert_eq!(Role::CountryOfficer.display_name(), "Country Officer");
    }

    // ── User ─────────────────────────────────────────────────────────────────

    #[test]
    fn user_parsed_role_is_none_for_missing_or_unknown_role() {
        assert_eq!(User::without_role("u").parsed_role(), None);

        let mut legacy = User::without_role("u");
        legacy.role = Some("recruitment_manager".to_string());
        assert_eq!(legacy.parsed_role(), None);

        assert_eq!(
            User::with_role("u", Role::Recruiter).parsed_role(),
            Some(Role::Recruiter)
        );
    }

    #[test]
    fn user_display_name_falls_back() {
        let mut user = User::without_role("u");
        assert_eq!(user.display_name(), "User");
        user.email = Some("a@b.org".to_string());
        assert_eq!(user.display_name(), "a@b.org");
        user.first_name = Some("Ada".to_string());
        user.last_name = Some("Obi".to_string());
        assert_eq!(user.display_name(), "Ada Obi");
    }

    #[test]
    fn request_id_new_produces_unique_values() {
        let unique: std::collections::HashSet<String> =
            (0..100).map(|_| RequestId::new().to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── Capability / CapabilitySet ───────────────────────────────────────────

    #[test]
    fn capability_names_round_trip_through_from_str() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
        assert!("canManageUsers".parse::<Capability>().is_err());
    }

    #[test]
    fn capability_set_grant_and_has() {
        let mut caps = CapabilitySet::default();
        assert!(!caps.has(Capability::ViewLeads));

        caps.grant(Capability::ViewLeads);
        caps.grant(Capability::ViewLeads);
        assert!(caps.has(Capability::ViewLeads));
        assert!(!caps.has(Capability::ManageLeads));
        assert_eq!(caps.all().count(), 1);
    }

    #[test]
    fn capability_set_iterates_in_table_order() {
        let caps: CapabilitySet =
            [Capability::ViewReports, Capability::ViewLeads].into_iter().collect();
        let order: Vec<Capability> = caps.all().collect();
        assert_eq!(order, vec![Capability::ViewLeads, Capability::ViewReports]);
    }

    // ── Section ──────────────────────────────────────────────────────────────

    #[test]
    fn section_paths_and_lookup() {
        assert_eq!(Section::MedicalScreening.path(), "/medical-screening");
        assert_eq!(Section::from_path("/placements"), Some(Section::Placements));
        assert_eq!(Section::from_path("/placements/"), Some(Section::Placements));
        assert_eq!(Section::from_path("/"), None);
    }

    #[test]
    fn every_manage_capability_belongs_to_a_view_pair() {
        for section in Section::CANONICAL {
            if let Some(manage) = section.manage_capability() {
                assert!(Capability::VIEW_MANAGE_PAIRS
                    .contains(&(section.view_capability(), manage)));
            }
        }
    }

    // ── Requirement display ──────────────────────────────────────────────────

    #[test]
    fn requirement_display() {
        assert_eq!(Requirement::none().to_string(), "unrestricted");
        assert_eq!(
            Requirement::capability(Capability::ManageLeads).to_string(),
            "all of [manageLeads]"
        );
        assert_eq!(
            Requirement::any_role(&[Role::Recruiter, Role::CountryOfficer]).to_string(),
            "any role of [recruiter, country_officer]"
        );
    }

    // ── FlowError ────────────────────────────────────────────────────────────

    #[test]
    fn access_denial_family() {
        assert!(FlowError::Unauthenticated.is_access_denial());
        assert!(FlowError::NoRole { subject: "u".into() }.is_access_denial());
        assert!(FlowError::Forbidden { requirement: "x".into() }.is_access_denial());
        assert!(!FlowError::not_found("lead", "1").is_access_denial());
        assert!(!FlowError::Collaborator { reason: "db down".into() }.is_access_denial());
    }

    #[test]
    fn error_display_messages() {
        let msg = FlowError::Forbidden { requirement: "all of [viewMedicalDetails]".into() }
            .to_string();
        assert!(msg.contains("access restricted"));
        assert!(msg.contains("viewMedicalDetails"));

        let msg = FlowError::not_found("position", "p-9").to_string();
        assert_eq!(msg, "position 'p-9' not found");

        let msg = FlowError::NoRole { subject: "user_9".into() }.to_string();
        assert!(msg.contains("user_9"));
    }
}
