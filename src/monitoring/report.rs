use serde::{Deserialize, Serialize};

/// The `csp-report` object a browser posts to the `report-uri` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CspViolationReport {
    pub document_uri: String,
    pub referrer: String,
    pub blocked_uri: String,
    pub violated_directive: String,
    pub effective_directive: String,
    pub original_policy: String,
    pub disposition: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_sample: Option<String>,
}

impl CspViolationReport {
    /// Extracts the report from a request body of the form `{"csp-report": {...}}`.
    /// Returns `Ok(None)` when the wrapper key is missing.
    pub fn from_body(bytes: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let mut json: serde_json::Value = serde_json::from_slice(bytes)?;
        match json.get_mut("csp-report").map(serde_json::Value::take) {
            Some(report) => serde_json::from_value(report).map(Some),
            None => Ok(None),
        }
    }

    #[inline]
    pub fn is_enforce(&self) -> bool {
        self.disposition == "enforce"
    }

    #[inline]
    pub fn is_report(&self) -> bool {
        self.disposition == "report"
    }
}
