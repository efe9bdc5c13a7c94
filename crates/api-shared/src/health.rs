use crate::types::HealthRes;

/// Simple health service for the HTTP API.
///
/// Reports liveness plus whether the inference client has credentials. The process stays up
/// without an API key, so this is the place operators look to see why answers are failing.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Build a health report.
    ///
    /// # Arguments
    /// * `inference_configured` - whether an API key was resolved at startup
    ///
    /// # Returns
    /// A `HealthRes` that is always `ok`; the message calls out missing credentials.
    pub fn check_health(inference_configured: bool) -> HealthRes {
        let message = if inference_configured {
            "Hospital AI is alive"
        } else {
            "Hospital AI is alive (inference API key not configured)"
        };

        HealthRes {
            ok: true,
            message: message.into(),
            inference_configured,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_configuration() {
        let configured = HealthService::check_health(true);
        assert!(configured.ok);
        assert!(configured.inference_configured);
        assert_eq!(configured.message, "Hospital AI is alive");

        let missing = HealthService::check_health(false);
        assert!(missing.ok);
        assert!(missing.message.contains("not configured"));
        assert!(chrono::DateTime::parse_from_rfc3339(&missing.checked_at).is_ok());
    }
}
