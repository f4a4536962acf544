use serde::Deserialize;

// ── Compliance literals ─────────────────────────────────────────
// Status strings the reporting agents emit. Matching is exact and
// case-sensitive, as the backend stores them verbatim.

pub const DISK_ENCRYPTION_BAD: &str = "False";
pub const OS_UPDATE_BAD: &str = "Might be outdated";
pub const ANTIVIRUS_BAD: &str = "Antivirus not active";
pub const SLEEP_SETTINGS_OK: &str = "Enabled (≤10min)";

/// OS-update statuses offered by the filter dropdown, matching what the
/// agents actually report.
pub const OS_UPDATE_CHOICES: &[&str] =
    &["Up to date", "Updates in progress", "Might be outdated"];

// ── Report ──────────────────────────────────────────────────────

/// One compliance snapshot for a device, exactly as transmitted.
///
/// All fields are plain strings; the backend also sends a numeric row `id`
/// which we ignore. Fields the server omits come back as empty strings
/// rather than failing the whole collection.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Report {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub disk_encryption: String,
    #[serde(default)]
    pub os_update: String,
    #[serde(default)]
    pub antivirus: String,
    #[serde(default)]
    pub sleep_settings: String,
}

impl Report {
    /// True iff any of the four status fields is non-compliant.
    pub fn has_issue(&self) -> bool {
        self.disk_encryption == DISK_ENCRYPTION_BAD
            || self.os_update == OS_UPDATE_BAD
            || self.antivirus == ANTIVIRUS_BAD
            || self.sleep_settings != SLEEP_SETTINGS_OK
    }

    /// Filter predicate for the OS-update dropdown. An empty criterion
    /// means "all".
    pub fn matches_os_filter(&self, criterion: &str) -> bool {
        criterion.is_empty() || self.os_update == criterion
    }
}

// ── Single-device lookup ────────────────────────────────────────

/// Body of `GET /latest/{device_id}`.
///
/// The backend answers with either a report object or `{"error": "..."}`
/// (also on 404), so the error field decides the shape — the status code
/// does not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    NotFound { error: String },
    Found(Report),
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn compliant() -> Report {
        Report {
            device_id: "D1".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            disk_encryption: "True".into(),
            os_update: "Up to date".into(),
            antivirus: "Active".into(),
            sleep_settings: SLEEP_SETTINGS_OK.into(),
        }
    }

    #[test]
    fn fully_compliant_report_has_no_issue() {
        assert!(!compliant().has_issue());
    }

    #[test]
    fn each_bad_field_raises_the_issue_flag() {
        let mut r = compliant();
        r.disk_encryption = DISK_ENCRYPTION_BAD.into();
        assert!(r.has_issue());

        let mut r = compliant();
        r.os_update = OS_UPDATE_BAD.into();
        assert!(r.has_issue());

        let mut r = compliant();
        r.antivirus = ANTIVIRUS_BAD.into();
        assert!(r.has_issue());

        // Anything but the exact enabled literal counts as an issue
        let mut r = compliant();
        r.sleep_settings = "Disabled".into();
        assert!(r.has_issue());
    }

    #[test]
    fn sleep_literal_is_exact() {
        let mut r = compliant();
        r.sleep_settings = "Enabled (<=10min)".into();
        assert!(r.has_issue());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let r = compliant();
        assert!(r.matches_os_filter(""));
        assert!(r.matches_os_filter("Up to date"));
        assert!(!r.matches_os_filter("Might be outdated"));
        // Case-sensitive, exact
        assert!(!r.matches_os_filter("up to date"));
    }

    #[test]
    fn filter_count_matches_criterion() {
        let mut outdated = compliant();
        outdated.os_update = OS_UPDATE_BAD.into();
        let reports = vec![compliant(), outdated.clone(), compliant(), outdated];

        let count =
            |f: &str| reports.iter().filter(|r| r.matches_os_filter(f)).count();
        assert_eq!(count(""), 4);
        assert_eq!(count("Up to date"), 2);
        assert_eq!(count(OS_UPDATE_BAD), 2);
        assert_eq!(count("Updates in progress"), 0);
    }

    #[test]
    fn report_tolerates_missing_and_extra_fields() {
        let r: Report =
            serde_json::from_str(r#"{"id": 7, "device_id": "D2", "timestamp": "t"}"#).unwrap();
        assert_eq!(r.device_id, "D2");
        assert_eq!(r.disk_encryption, "");
    }

    #[test]
    fn lookup_error_body_takes_the_not_found_shape() {
        let out: LookupOutcome =
            serde_json::from_str(r#"{"error": "No report found for device"}"#).unwrap();
        match out {
            LookupOutcome::NotFound { error } => {
                assert_eq!(error, "No report found for device")
            }
            LookupOutcome::Found(_) => panic!("error body parsed as a report"),
        }
    }

    #[test]
    fn lookup_report_body_parses_as_found() {
        let out: LookupOutcome = serde_json::from_str(
            r#"{"id": 1, "device_id": "D1", "timestamp": "t", "disk_encryption": "True",
                "os_update": "Up to date", "antivirus": "Active",
                "sleep_settings": "Enabled (≤10min)"}"#,
        )
        .unwrap();
        match out {
            LookupOutcome::Found(r) => assert_eq!(r.device_id, "D1"),
            LookupOutcome::NotFound { .. } => panic!("report body parsed as an error"),
        }
    }
}
