use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::{Result, SplitError};
use crate::models::{
    BudgetSummary, BudgetSummaryResponse, Envelope, PatchTransactions, SaveTransactionsResponse,
    Transaction, TransactionsResponse, UpdateRequest,
};
use crate::reconciler::TransactionStore;

/// YNAB answers a bulk update with 209 when it saved everything but has notices to report.
const SAVED_WITH_NOTICES: u16 = 209;

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    /// `YYYY-MM-DD`
    pub since_date: Option<String>,
    pub only_unapproved: bool,
}

pub struct YnabClient {
    client: Client,
    base_url: String,
    token: String,
}

impl YnabClient {
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    pub fn budgets(&self) -> Result<BudgetSummaryResponse> {
        info!("Fetching budgets");
        let url = format!("{}/budgets", self.base_url);
        let response = expect_status(self.authed(self.client.get(&url)).send()?, is_ok)?;
        let envelope: Envelope<BudgetSummaryResponse> = response.json()?;
        Ok(envelope.data)
    }

    /// The budget YNAB marks as default, otherwise the first one listed.
    pub fn default_budget(&self) -> Result<BudgetSummary> {
        let BudgetSummaryResponse {
            budgets,
            default_budget,
        } = self.budgets()?;
        default_budget
            .or_else(|| budgets.into_iter().next())
            .ok_or(SplitError::NoBudgets)
    }

    pub fn transactions(
        &self,
        budget_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        info!(budget_id, "Fetching transactions");
        let url = match &filter.account_id {
            Some(account_id) => format!(
                "{}/budgets/{budget_id}/accounts/{account_id}/transactions",
                self.base_url
            ),
            None => format!("{}/budgets/{budget_id}/transactions", self.base_url),
        };

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(since) = &filter.since_date {
            query.push(("since_date", since.as_str()));
        }
        if filter.only_unapproved {
            query.push(("type", "unapproved"));
        }

        let request = self.authed(self.client.get(&url)).query(&query);
        let response = expect_status(request.send()?, is_ok)?;
        let envelope: Envelope<TransactionsResponse> = response.json()?;
        Ok(envelope
            .data
            .transactions
            .into_iter()
            .filter(|t| !t.deleted)
            .collect())
    }
}

impl TransactionStore for YnabClient {
    fn update_transactions(&self, budget_id: &str, batch: &[UpdateRequest]) -> Result<usize> {
        debug!(budget_id, size = batch.len(), "Bulk updating transactions");
        let url = format!("{}/budgets/{budget_id}/transactions", self.base_url);
        let body = PatchTransactions { transactions: batch };
        let request = self.authed(self.client.patch(&url)).json(&body);
        let response = expect_status(request.send()?, is_update_success)?;
        let envelope: Envelope<SaveTransactionsResponse> = response.json()?;
        Ok(envelope.data.transactions.len())
    }
}

fn is_ok(status: StatusCode) -> bool {
    status == StatusCode::OK
}

fn is_update_success(status: StatusCode) -> bool {
    status == StatusCode::OK || status.as_u16() == SAVED_WITH_NOTICES
}

fn expect_status(response: Response, accept: fn(StatusCode) -> bool) -> Result<Response> {
    let status = response.status();
    if accept(status) {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(SplitError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;
    use crate::models::Cleared;

    /// Answers exactly one HTTP request with `status` and `body`, handing back the raw request.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8_lossy(&body));
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            request
        });
        (base_url, handle)
    }

    fn client_for(base_url: &str) -> YnabClient {
        YnabClient::new("tok", base_url, Duration::from_secs(5)).unwrap()
    }

    fn request() -> UpdateRequest {
        UpdateRequest {
            id: "t1".to_string(),
            account_id: "acc".to_string(),
            date: "2026-01-01".to_string(),
            amount: -10000,
            payee_id: None,
            payee_name: "John Doe".to_string(),
            category_id: None,
            memo: Some("rent".to_string()),
            cleared: Cleared::Cleared,
            approved: true,
            flag_color: None,
        }
    }

    #[test]
    fn test_rejected_update_carries_status_and_body() {
        let (base_url, server) = serve_once("400 Bad Request", r#"{"error":{"id":"400"}}"#);
        let err = client_for(&base_url)
            .update_transactions("b1", &[request()])
            .unwrap_err();
        server.join().unwrap();
        match err {
            SplitError::Api { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"error":{"id":"400"}}"#);
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_with_notices_counts_saved_transactions() {
        let (base_url, server) =
            serve_once("209 Saved With Notices", r#"{"data":{"transactions":[]}}"#);
        let updated = client_for(&base_url)
            .update_transactions("b1", &[request()])
            .unwrap();
        let raw = server.join().unwrap();
        assert_eq!(updated, 0);
        assert!(raw.starts_with("PATCH /budgets/b1/transactions"));
        assert!(raw.contains("\"payee_id\":null"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok"));
    }

    #[test]
    fn test_failed_fetch_is_an_api_error() {
        let (base_url, server) = serve_once("401 Unauthorized", "unauthorized");
        let err = client_for(&base_url).budgets().unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, SplitError::Api { status: 401, .. }));
    }

    #[test]
    fn test_update_accepts_ok_and_notices() {
        assert!(is_update_success(StatusCode::OK));
        assert!(is_update_success(StatusCode::from_u16(209).unwrap()));
        assert!(!is_update_success(StatusCode::CREATED));
        assert!(!is_update_success(StatusCode::BAD_REQUEST));
        assert!(!is_update_success(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn test_reads_only_accept_ok() {
        assert!(is_ok(StatusCode::OK));
        assert!(!is_ok(StatusCode::from_u16(209).unwrap()));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client_for("https://api.ynab.com/v1/");
        assert_eq!(client.base_url, "https://api.ynab.com/v1");
    }
}
