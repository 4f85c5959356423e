//! Turns a server error envelope into log-ready pieces

use fhir_core::extract_messages;

use crate::error::ServerResponseError;

/// Field-by-field view of a failed FHIR exchange.
///
/// Anything the server did not send stays `None`, so a missing status is
/// never shown as `0` and a missing body never as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub status: Option<u16>,
    pub mime_type: Option<String>,
    pub body: Option<String>,
    pub additional_messages: Option<Vec<String>>,
    /// One message per OperationOutcome issue, if an OperationOutcome came back
    pub issue_messages: Option<Vec<String>>,
}

pub fn describe_failure(error: &ServerResponseError) -> FailureReport {
    FailureReport {
        status: error.status,
        mime_type: error.mime_type.clone(),
        body: error.body.clone(),
        additional_messages: Some(error.additional_messages.clone()).filter(|m| !m.is_empty()),
        issue_messages: error.outcome.as_ref().map(extract_messages),
    }
}

impl FailureReport {
    /// Log every field at error level, then one line per issue
    pub fn log(&self) {
        tracing::error!(
            status = ?self.status,
            mime_type = ?self.mime_type,
            body = ?self.body,
            "FHIR error response"
        );
        if let Some(messages) = &self.additional_messages {
            for message in messages {
                tracing::error!("Additional error message: {}", message);
            }
        }
        if let Some(messages) = self.issue_messages.as_ref().filter(|m| !m.is_empty()) {
            tracing::error!("Here are the error messages from each of the operation outcome issues:");
            for message in messages {
                tracing::error!("{}", message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogBuffer;
    use fhir_core::{
        GENERIC_ERROR_MESSAGE, IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue,
    };

    #[test]
    fn test_absent_fields_stay_absent() {
        let report = describe_failure(&ServerResponseError::default());

        assert_eq!(
            report,
            FailureReport {
                status: None,
                mime_type: None,
                body: None,
                additional_messages: None,
                issue_messages: None,
            }
        );
    }

    #[test]
    fn test_full_envelope() {
        let outcome = OperationOutcome::new(vec![
            OperationOutcomeIssue::new(IssueSeverity::Error, IssueType::Invalid)
                .with_details("Unknown search parameter \"famly\""),
            OperationOutcomeIssue::new(IssueSeverity::Error, IssueType::Processing)
                .with_diagnostics("HAPI-0524: invalid"),
            OperationOutcomeIssue::new(IssueSeverity::Fatal, IssueType::Exception),
        ]);
        let error = ServerResponseError {
            status: Some(400),
            mime_type: Some("application/fhir+json".to_string()),
            body: Some("{...}".to_string()),
            additional_messages: vec!["HTTP 400 Bad Request".to_string()],
            outcome: Some(outcome),
        };

        let report = describe_failure(&error);

        assert_eq!(report.status, Some(400));
        assert_eq!(report.mime_type.as_deref(), Some("application/fhir+json"));
        assert_eq!(report.body.as_deref(), Some("{...}"));
        assert_eq!(
            report.additional_messages,
            Some(vec!["HTTP 400 Bad Request".to_string()])
        );
        assert_eq!(
            report.issue_messages,
            Some(vec![
                "Unknown search parameter \"famly\"".to_string(),
                "HAPI-0524: invalid".to_string(),
                GENERIC_ERROR_MESSAGE.to_string(),
            ])
        );
        report.log();
    }

    #[test]
    fn test_outcome_without_issues_is_present_but_empty() {
        let error = ServerResponseError {
            status: Some(500),
            outcome: Some(OperationOutcome::new(vec![])),
            ..Default::default()
        };

        let report = describe_failure(&error);

        assert_eq!(report.issue_messages, Some(vec![]));
        assert_eq!(report.body, None);
    }

    #[test]
    fn test_log_lists_fields_and_issue_messages() {
        let error = ServerResponseError {
            additional_messages: vec!["Response body is not an OperationOutcome".to_string()],
            outcome: Some(OperationOutcome::invalid("HAPI-0302: bad param")),
            ..Default::default()
        };
        let (logs, _guard) = LogBuffer::capture();

        describe_failure(&error).log();

        let logs = logs.contents();
        assert!(logs.contains("status=None mime_type=None body=None"), "{}", logs);
        assert!(
            logs.contains("Additional error message: Response body is not an OperationOutcome"),
            "{}",
            logs
        );
        assert!(logs.contains("operation outcome issues:"), "{}", logs);
        assert!(logs.contains("HAPI-0302: bad param"), "{}", logs);
    }

    #[test]
    fn test_log_skips_issue_header_without_issues() {
        let (logs, _guard) = LogBuffer::capture();

        describe_failure(&ServerResponseError::default()).log();

        let logs = logs.contents();
        assert!(logs.contains("FHIR error response"), "{}", logs);
        assert!(!logs.contains("operation outcome issues"), "{}", logs);
    }
}
