//! Staff roles and badge-code allocation.
//!
//! Badge codes are human-readable, role-scoped identifiers of the form
//! `PREFIX-N` (`ST-TR-4`) or a bare `PREFIX` for roles that never take a
//! numeric suffix. The authoritative state is the set of `badge_code` values
//! on profiles; `badge_counters` is derived and rebuilt by the reconciler.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Staff role. Wire names match the values the frontends and invite links
/// have always used, so the mix of kebab- and snake-case is deliberate.
/// Deserialization goes through `From<String>` so unrecognized names land on
/// `Unknown` instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum StaffRole {
    #[serde(rename = "owner")]
    Owner,
    #[serde(rename = "trainer")]
    Trainer,
    #[serde(rename = "va")]
    Va,
    #[serde(rename = "va-training")]
    VaTraining,
    #[serde(rename = "coach")]
    Coach,
    #[serde(rename = "client")]
    Client,
    #[serde(rename = "ptsi-intern")]
    PtsiIntern,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "closer")]
    Closer,
    #[serde(rename = "front_desk")]
    FrontDesk,
    /// Anything we don't recognize. Tolerated rather than rejected so stale
    /// rows and old invite links keep working.
    #[serde(rename = "unknown")]
    Unknown,
}

impl StaffRole {
    /// Badge-code prefix for this role. Fixed table; do not reorder existing
    /// mappings, the prefixes are baked into issued badge codes.
    pub fn prefix(&self) -> &'static str {
        match self {
            StaffRole::Owner => "MG",
            StaffRole::Trainer => "ST-TR",
            StaffRole::Va => "VA",
            StaffRole::VaTraining => "VA-T",
            StaffRole::Coach => "CS",
            StaffRole::Client => "CL",
            StaffRole::PtsiIntern => "PTSI-INT",
            StaffRole::Admin => "PTSI",
            StaffRole::Closer => "ST-CL",
            StaffRole::FrontDesk => "ST-FD",
            StaffRole::Unknown => "XX",
        }
    }

    /// Roles that need no gym location and use a fixed, non-incrementing
    /// badge code (the bare prefix).
    pub fn is_location_exempt(&self) -> bool {
        matches!(self, StaffRole::Admin | StaffRole::PtsiIntern)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Owner => "owner",
            StaffRole::Trainer => "trainer",
            StaffRole::Va => "va",
            StaffRole::VaTraining => "va-training",
            StaffRole::Coach => "coach",
            StaffRole::Client => "client",
            StaffRole::PtsiIntern => "ptsi-intern",
            StaffRole::Admin => "admin",
            StaffRole::Closer => "closer",
            StaffRole::FrontDesk => "front_desk",
            StaffRole::Unknown => "unknown",
        }
    }

    /// All roles whose badge codes carry a numeric suffix (everything except
    /// the location-exempt roles). Used by the reconciler to know which
    /// prefixes to rebuild.
    pub fn counter_prefixes() -> impl Iterator<Item = &'static str> {
        [
            StaffRole::Owner,
            StaffRole::Trainer,
            StaffRole::Va,
            StaffRole::VaTraining,
            StaffRole::Coach,
            StaffRole::Client,
            StaffRole::Closer,
            StaffRole::FrontDesk,
            StaffRole::Unknown,
        ]
        .into_iter()
        .map(|r| r.prefix())
    }
}

impl From<&str> for StaffRole {
    /// Unrecognized strings map to [`StaffRole::Unknown`].
    fn from(s: &str) -> Self {
        match s {
            "owner" => StaffRole::Owner,
            "trainer" => StaffRole::Trainer,
            "va" => StaffRole::Va,
            "va-training" => StaffRole::VaTraining,
            "coach" => StaffRole::Coach,
            "client" => StaffRole::Client,
            "ptsi-intern" => StaffRole::PtsiIntern,
            "admin" => StaffRole::Admin,
            "closer" => StaffRole::Closer,
            "front_desk" => StaffRole::FrontDesk,
            _ => StaffRole::Unknown,
        }
    }
}

impl From<String> for StaffRole {
    fn from(s: String) -> Self {
        StaffRole::from(s.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

/// Parse the numeric suffix of `code` under `prefix`, treating anything
/// malformed as 0. Shared tolerance policy of the allocator and the
/// reconciler: bad data contributes nothing to the maximum but never errors.
pub fn suffix_or_zero(code: &str, prefix: &str) -> u64 {
    code.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Compute the next badge code for `role` given a snapshot of the codes
/// currently in use under that role's prefix.
///
/// Location-exempt roles always get the bare prefix; everyone else gets
/// `prefix-(max + 1)` where the max is taken over parseable suffixes.
///
/// This is read-then-compute over a snapshot: two concurrent callers that
/// both read before either writes back can compute the same code. The
/// periodic reconciler detects the resulting drift; it does not prevent it.
pub fn next_code(role: StaffRole, existing: &[String]) -> String {
    let prefix = role.prefix();

    if role.is_location_exempt() {
        return prefix.to_string();
    }

    let max = existing
        .iter()
        .filter(|code| code.starts_with(&format!("{}-", prefix)))
        .map(|code| suffix_or_zero(code, prefix))
        .max()
        .unwrap_or(0);

    format!("{}-{}", prefix, max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_table() {
        assert_eq!(StaffRole::Owner.prefix(), "MG");
        assert_eq!(StaffRole::Trainer.prefix(), "ST-TR");
        assert_eq!(StaffRole::Va.prefix(), "VA");
        assert_eq!(StaffRole::VaTraining.prefix(), "VA-T");
        assert_eq!(StaffRole::Coach.prefix(), "CS");
        assert_eq!(StaffRole::Client.prefix(), "CL");
        assert_eq!(StaffRole::PtsiIntern.prefix(), "PTSI-INT");
        assert_eq!(StaffRole::Admin.prefix(), "PTSI");
        assert_eq!(StaffRole::Closer.prefix(), "ST-CL");
        assert_eq!(StaffRole::FrontDesk.prefix(), "ST-FD");
        assert_eq!(StaffRole::Unknown.prefix(), "XX");
    }

    #[test]
    fn test_first_code_is_one() {
        assert_eq!(next_code(StaffRole::Trainer, &[]), "ST-TR-1");
        assert_eq!(next_code(StaffRole::Coach, &[]), "CS-1");
    }

    #[test]
    fn test_exempt_roles_get_bare_prefix() {
        assert_eq!(next_code(StaffRole::Admin, &[]), "PTSI");
        assert_eq!(
            next_code(StaffRole::Admin, &codes(&["PTSI", "PTSI"])),
            "PTSI"
        );
        assert_eq!(
            next_code(StaffRole::PtsiIntern, &codes(&["PTSI-INT"])),
            "PTSI-INT"
        );
    }

    #[test]
    fn test_max_plus_one() {
        let existing = codes(&["CS-1", "CS-2"]);
        assert_eq!(next_code(StaffRole::Coach, &existing), "CS-3");
    }

    #[test]
    fn test_malformed_suffix_counts_as_zero() {
        let existing = codes(&["CS-2", "CS-5", "CS-x"]);
        assert_eq!(next_code(StaffRole::Coach, &existing), "CS-6");

        // All malformed: max is 0, next is 1
        let existing = codes(&["CS-x", "CS-"]);
        assert_eq!(next_code(StaffRole::Coach, &existing), "CS-1");
    }

    #[test]
    fn test_codes_from_other_prefixes_ignored() {
        let existing = codes(&["ST-TR-7", "CL-9", "CS-2"]);
        assert_eq!(next_code(StaffRole::Coach, &existing), "CS-3");
    }

    #[test]
    fn test_suffix_or_zero() {
        assert_eq!(suffix_or_zero("CS-12", "CS"), 12);
        assert_eq!(suffix_or_zero("CS-x", "CS"), 0);
        assert_eq!(suffix_or_zero("CS", "CS"), 0);
        assert_eq!(suffix_or_zero("VA-T-3", "VA"), 0);
        assert_eq!(suffix_or_zero("VA-T-3", "VA-T"), 3);
    }

    #[test]
    fn test_role_from_str_is_tolerant() {
        assert_eq!("trainer".parse::<StaffRole>().unwrap(), StaffRole::Trainer);
        assert_eq!(
            "front_desk".parse::<StaffRole>().unwrap(),
            StaffRole::FrontDesk
        );
        assert_eq!("janitor".parse::<StaffRole>().unwrap(), StaffRole::Unknown);
    }

    #[test]
    fn test_role_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&StaffRole::VaTraining).unwrap(),
            "\"va-training\""
        );
        let role: StaffRole = serde_json::from_str("\"ptsi-intern\"").unwrap();
        assert_eq!(role, StaffRole::PtsiIntern);
        let role: StaffRole = serde_json::from_str("\"janitor\"").unwrap();
        assert_eq!(role, StaffRole::Unknown);
    }
}
