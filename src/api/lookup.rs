use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::mac::{Candidate, DisplayRow, LookupError, MacLookup};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckMacRequest {
    mac_address: Vec<String>,
    is_client_format_required: bool,
}

/// One element of the service's response array. `mac_address` carries the
/// lookup verdict text for the address at the same position in the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupEntry {
    mac_address: String,
    #[serde(default)]
    tables: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RejectionBody {
    message: String,
}

/// Zip submitted candidates with response entries by position. Callers
/// must have checked that the lengths match.
fn join_rows(candidates: &[Candidate], entries: Vec<LookupEntry>) -> Vec<DisplayRow> {
    candidates
        .iter()
        .zip(entries)
        .map(|(candidate, entry)| DisplayRow {
            address: candidate.text.clone(),
            status: entry.mac_address,
            tables: entry.tables,
        })
        .collect()
}

#[async_trait]
impl MacLookup for ApiClient {
    async fn check(&self, candidates: &[Candidate]) -> Result<Vec<DisplayRow>, LookupError> {
        let body = CheckMacRequest {
            mac_address: candidates.iter().map(|c| c.text.clone()).collect(),
            is_client_format_required: true,
        };

        let response = self
            .http
            .post(self.url("/api/check-mac"))
            .json(&body)
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            // The service explains batch rejections in `message`; show that
            // text as-is. Fall back to the status line when the body is not
            // the expected shape.
            let message = response
                .json::<RejectionBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(LookupError::Rejected(message));
        }
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "lookup service returned {status}"
            )));
        }

        let entries: Vec<LookupEntry> = response
            .json()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        // Rows are matched to addresses purely by position, so a short or
        // long response would misattribute verdicts. Refuse it instead.
        if entries.len() != candidates.len() {
            return Err(LookupError::ShapeMismatch {
                sent: candidates.len(),
                got: entries.len(),
            });
        }

        Ok(join_rows(candidates, entries))
    }
}
