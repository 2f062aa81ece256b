use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogInput {
    pub email: String,
    pub status: LoginStatus,
    pub timestamp: Option<DateTime<Utc>>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// One login attempt in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogEntry {
    pub email: String,
    pub timestamp: DateTime<Utc>,
    pub status: LoginStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl LoginLogInput {
    /// Fills the timestamp with `now` and the client details from the request
    /// headers when the body leaves them out.
    pub fn into_entry(
        self,
        now: DateTime<Utc>,
        header_user_agent: Option<String>,
        header_ip: Option<String>,
    ) -> LoginLogEntry {
        LoginLogEntry {
            email: self.email.trim().to_string(),
            timestamp: self.timestamp.unwrap_or(now),
            status: self.status,
            user_agent: self.user_agent.or(header_user_agent),
            ip: self.ip.or(header_ip),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogAck {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_timestamp_defaults_to_now() {
        let input: LoginLogInput =
            serde_json::from_str(r#"{"email": "admin@solar.ma", "status": "failed"}"#).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let entry = input.into_entry(now, Some("curl/8.0".into()), Some("10.0.0.2".into()));

        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.status, LoginStatus::Failed);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.ip.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_body_values_win_over_headers() {
        let input: LoginLogInput = serde_json::from_str(
            r#"{"email": "a@b.c", "status": "success", "timestamp": "2025-01-01T12:00:00Z",
                "userAgent": "Mozilla", "ip": "1.2.3.4"}"#,
        )
        .unwrap();
        let entry = input.into_entry(Utc::now(), Some("curl".into()), Some("9.9.9.9".into()));

        assert_eq!(entry.timestamp.to_rfc3339(), "2025-01-01T12:00:00+00:00");
        assert_eq!(entry.user_agent.as_deref(), Some("Mozilla"));
        assert_eq!(entry.ip.as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let parsed =
            serde_json::from_str::<LoginLogInput>(r#"{"email": "a@b.c", "status": "maybe"}"#);
        assert!(parsed.is_err());
    }
}
