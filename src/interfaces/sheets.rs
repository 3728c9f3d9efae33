//! Spreadsheet API client: appends rows to a sheet range
use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use ureq::Agent;
use url::Url;

use super::google_auth::{AuthError, TokenSource};
use crate::constants::defaults;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid spreadsheet URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("append request failed: {0}")]
    Request(#[from] ureq::Error),
}

/// Entry point to the spreadsheet service; yields a session per authorization
pub trait SpreadsheetApi: Send + Sync {
    fn authorize(&self) -> Result<Arc<dyn SheetAppender>, SheetsError>;
}

pub trait SheetAppender: Send + Sync {
    fn append_row(&self, spreadsheet_id: &str, row: &[Value]) -> Result<(), SheetsError>;
}

pub struct GoogleSheets {
    base_url: String,
    tokens: TokenSource,
    agent: Agent,
}

impl GoogleSheets {
    pub fn new(base_url: &str, tokens: TokenSource, agent: Agent) -> Self {
        GoogleSheets {
            base_url: base_url.to_string(),
            tokens,
            agent,
        }
    }
}

impl SpreadsheetApi for GoogleSheets {
    fn authorize(&self) -> Result<Arc<dyn SheetAppender>, SheetsError> {
        let token = self.tokens.fetch()?;
        Ok(Arc::new(SheetsSession {
            base_url: self.base_url.clone(),
            bearer: format!("Bearer {}", token.secret),
            agent: self.agent.clone(),
        }))
    }
}

struct SheetsSession {
    base_url: String,
    bearer: String,
    agent: Agent,
}

impl SheetsSession {
    fn append_url(&self, spreadsheet_id: &str) -> Result<Url, SheetsError> {
        let range = format!("{}:append", defaults::SHEET_RANGE);
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                range.as_str(),
            ]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", defaults::VALUE_INPUT_OPTION);
        Ok(url)
    }
}

impl SheetAppender for SheetsSession {
    fn append_row(&self, spreadsheet_id: &str, row: &[Value]) -> Result<(), SheetsError> {
        let url = self.append_url(spreadsheet_id)?;
        log::debug!("Appending row to {}: {:?}", spreadsheet_id, row);

        let resp = self
            .agent
            .post(url.as_str())
            .header("Authorization", &self.bearer)
            .send_json(json!({ "values": [row] }))?;
        log::trace!("Append to {} returned {}", spreadsheet_id, resp.status());
        Ok(())
    }
}
