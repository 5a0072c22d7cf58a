use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::LunchError;
use crate::http::{check_response, tuned_client};
use crate::store::Table;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "sheets";

/// Worksheets served by a JSON "values" endpoint (e.g. a spreadsheet web-app proxy).
///
/// `GET {url}?sheet={name}` returns `{"values": [[header...], [cell...], ...]}`;
/// `POST {url}` with `{"sheet": name, "values": [...]}` replaces the sheet.
pub struct HttpSheets {
    client: Client,
    url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl HttpSheets {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            client: tuned_client(),
            url,
            token,
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn read(&self, sheet: &str) -> Result<Table, LunchError> {
        let request = self
            .client
            .get(&self.url)
            .query(&[("sheet", sheet)])
            .timeout(REQUEST_TIMEOUT);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;

        let bytes = check_response(response, PROVIDER).await?;
        let parsed: ValuesResponse = serde_json::from_slice(&bytes)
            .map_err(|e| LunchError::SchemaParse(format!("failed to parse sheet values: {e}")))?;

        let values = parsed
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect();
        Ok(Table::from_values(values))
    }

    pub async fn write(&self, sheet: &str, table: Table) -> Result<(), LunchError> {
        let body = serde_json::json!({
            "sheet": sheet,
            "values": table.into_values(),
        });
        let request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&body);
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(transport_error)?;
        check_response(response, PROVIDER).await?;
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> LunchError {
    if e.is_timeout() {
        return LunchError::Timeout(REQUEST_TIMEOUT.as_millis() as u64);
    }
    LunchError::Transport {
        backend: PROVIDER.to_string(),
        message: e.to_string(),
    }
}

/// Sheets hand back numbers and blanks as JSON scalars; store everything as text.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
