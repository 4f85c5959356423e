use serde::{Deserialize, Serialize};

/// Message used for an issue that carries neither details text nor diagnostics
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Severity of the issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
    /// Any severity this client does not know
    #[serde(other)]
    Unknown,
}

/// Type of issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Invalid,
    Structure,
    Required,
    Value,
    Invariant,
    Security,
    Login,
    Expired,
    Forbidden,
    Suppressed,
    Processing,
    NotSupported,
    Duplicate,
    MultipleMatches,
    NotFound,
    Deleted,
    TooLong,
    CodeInvalid,
    Extension,
    TooCostly,
    BusinessRule,
    Conflict,
    Transient,
    LockError,
    NoStore,
    Exception,
    Timeout,
    Incomplete,
    Throttled,
    Informational,
    /// Also catches codes this client does not know
    #[serde(other)]
    Unknown,
}

/// Coded text attached to an issue; only the human-readable part is modelled
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// FHIR OperationOutcome resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    #[serde(default)]
    pub issue: Vec<OperationOutcomeIssue>,
}

/// Single issue in an OperationOutcome
///
/// `severity` and `code` are required by FHIR but servers do omit them; an
/// issue missing either still carries a usable message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationOutcomeIssue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<IssueSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<IssueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl OperationOutcomeIssue {
    pub fn new(severity: IssueSeverity, code: IssueType) -> Self {
        Self {
            severity: Some(severity),
            code: Some(code),
            details: None,
            diagnostics: None,
        }
    }

    pub fn with_details(mut self, text: &str) -> Self {
        self.details = Some(CodeableConcept {
            text: Some(text.to_string()),
        });
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: &str) -> Self {
        self.diagnostics = Some(diagnostics.to_string());
        self
    }

    /// The message to show for this issue.
    ///
    /// Curated `details.text` is preferred, then the raw `diagnostics`, then
    /// [`GENERIC_ERROR_MESSAGE`]. An empty details text counts as absent.
    pub fn display_message(&self) -> &str {
        if let Some(text) = self
            .details
            .as_ref()
            .and_then(|d| d.text.as_deref())
            .filter(|t| !t.is_empty())
        {
            return text;
        }
        if let Some(diagnostics) = self.diagnostics.as_deref() {
            return diagnostics;
        }
        GENERIC_ERROR_MESSAGE
    }
}

impl OperationOutcome {
    pub fn new(issue: Vec<OperationOutcomeIssue>) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            issue,
        }
    }

    /// Create an error outcome with a single issue
    pub fn error(code: IssueType, diagnostics: &str) -> Self {
        Self::new(vec![
            OperationOutcomeIssue::new(IssueSeverity::Error, code).with_diagnostics(diagnostics),
        ])
    }

    /// Create a not found outcome
    pub fn not_found(diagnostics: &str) -> Self {
        Self::error(IssueType::NotFound, diagnostics)
    }

    /// Create an invalid resource outcome
    pub fn invalid(diagnostics: &str) -> Self {
        Self::error(IssueType::Invalid, diagnostics)
    }
}

/// One display message per issue, in issue order.
pub fn extract_messages(outcome: &OperationOutcome) -> Vec<String> {
    outcome
        .issue
        .iter()
        .map(|issue| issue.display_message().to_string())
        .collect()
}
