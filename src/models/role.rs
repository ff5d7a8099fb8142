//! Closed role type and the capability flags derived from it.
//!
//! The backend is inconsistent about role casing ("admin" vs "ADMIN"), so
//! normalization happens exactly once, at the serde boundary. Everything past
//! this point compares enum variants, never strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// User role in the scheduling system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    Receptionist,
    CustomerCare,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::Receptionist => "receptionist",
            Role::CustomerCare => "customer_care",
        }
    }

    /// Parse a role, accepting any casing the backend emits.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "doctor" => Some(Role::Doctor),
            "patient" => Some(Role::Patient),
            "receptionist" => Some(Role::Receptionist),
            "customer_care" | "customer-care" => Some(Role::CustomerCare),
            _ => None,
        }
    }

    /// Derive the full capability set for this role.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Role::Admin => Capabilities {
                is_admin: true,
                is_doctor: false,
                is_patient: false,
                is_receptionist: false,
                is_customer_care: false,
                is_staff: true,
                has_full_access: true,
                has_branch_access: true,
                can_manage_appointments: true,
            },
            Role::Doctor => Capabilities {
                is_admin: false,
                is_doctor: true,
                is_patient: false,
                is_receptionist: false,
                is_customer_care: false,
                is_staff: true,
                has_full_access: false,
                has_branch_access: true,
                can_manage_appointments: false,
            },
            Role::Patient => Capabilities {
                is_admin: false,
                is_doctor: false,
                is_patient: true,
                is_receptionist: false,
                is_customer_care: false,
                is_staff: false,
                has_full_access: false,
                has_branch_access: false,
                can_manage_appointments: false,
            },
            Role::Receptionist => Capabilities {
                is_admin: false,
                is_doctor: false,
                is_patient: false,
                is_receptionist: true,
                is_customer_care: false,
                is_staff: true,
                has_full_access: false,
                has_branch_access: true,
                can_manage_appointments: true,
            },
            Role::CustomerCare => Capabilities {
                is_admin: false,
                is_doctor: false,
                is_patient: false,
                is_receptionist: false,
                is_customer_care: true,
                is_staff: true,
                has_full_access: true,
                has_branch_access: true,
                can_manage_appointments: true,
            },
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {}", raw)))
    }
}

/// Capability flags derived from a role.
///
/// Computed once per session; views read flags instead of re-checking roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub is_admin: bool,
    pub is_doctor: bool,
    pub is_patient: bool,
    pub is_receptionist: bool,
    pub is_customer_care: bool,
    /// Everyone except patients
    pub is_staff: bool,
    /// Not scoped to a single doctor, patient, or branch
    pub has_full_access: bool,
    pub has_branch_access: bool,
    pub can_manage_appointments: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("CUSTOMER_CARE"), Some(Role::CustomerCare));
        assert_eq!(Role::parse("Receptionist"), Some(Role::Receptionist));
        assert_eq!(Role::parse("nurse"), None);
    }

    #[test]
    fn test_full_access_tier() {
        assert!(Role::Admin.capabilities().has_full_access);
        assert!(Role::CustomerCare.capabilities().has_full_access);
        assert!(!Role::Doctor.capabilities().has_full_access);
        assert!(!Role::Receptionist.capabilities().has_full_access);
        assert!(!Role::Patient.capabilities().has_full_access);
    }

    #[test]
    fn test_appointment_management_tier() {
        assert!(Role::Admin.capabilities().can_manage_appointments);
        assert!(Role::CustomerCare.capabilities().can_manage_appointments);
        assert!(Role::Receptionist.capabilities().can_manage_appointments);
        assert!(!Role::Doctor.capabilities().can_manage_appointments);
        assert!(!Role::Patient.capabilities().can_manage_appointments);
    }

    #[test]
    fn test_staff_excludes_patients_only() {
        assert!(!Role::Patient.capabilities().is_staff);
        for role in [Role::Admin, Role::Doctor, Role::Receptionist, Role::CustomerCare] {
            assert!(role.capabilities().is_staff, "{} should be staff", role);
        }
    }

    #[test]
    fn test_serde_round_trip_normalizes_casing() {
        let role: Role = serde_json::from_str("\"DOCTOR\"").unwrap();
        assert_eq!(role, Role::Doctor);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"doctor\"");
    }
}
