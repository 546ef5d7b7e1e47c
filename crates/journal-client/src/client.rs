//! Journal HTTP client.

use async_trait::async_trait;
use chrono::NaiveDate;
use homework_core::{ChildProfile, JournalApi, JournalError, Lesson};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::JournalConfig;
use crate::types::{ListPage, RelatedChild, ResponseEnvelope};

/// Header carrying the user's journal credential.
const TOKEN_HEADER: &str = "x-jwt-token";

/// Client for the school journal REST API.
#[derive(Clone)]
pub struct JournalClient {
    http: Client,
    config: JournalConfig,
}

impl JournalClient {
    /// Create a client for the given configuration.
    pub fn new(config: JournalConfig) -> Result<Self, JournalError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(http_error)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// Fetch every page of a listing for one education and day range.
    ///
    /// Pages are requested while the server reports `current < next`, up to
    /// `max_pages` requests. A listing that still has pages after the cap is
    /// an error rather than a silently truncated result.
    async fn list_by_education(
        &self,
        url: &str,
        endpoint: &str,
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        let datetime_from = format!("{} 00:00:00", date_from.format("%d.%m.%Y"));
        let datetime_to = format!("{} 23:59:59", date_to.format("%d.%m.%Y"));
        let education = education_id.to_string();

        let mut items = Vec::new();
        let mut page = 1u32;

        for _ in 0..self.config.max_pages {
            debug!(endpoint, education_id, page, "Fetching journal page");

            let page_param = page.to_string();
            let request = self
                .http
                .get(url)
                .header(TOKEN_HEADER, token)
                .query(&[
                    ("p_datetime_from", datetime_from.as_str()),
                    ("p_datetime_to", datetime_to.as_str()),
                    ("p_page", page_param.as_str()),
                    ("p_educations[]", education.as_str()),
                ]);

            let body: ResponseEnvelope<ListPage<Lesson>> = self.get_json(request, endpoint).await?;
            let next = body.data.next_page();
            items.extend(body.data.items);

            match next {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }

        warn!(
            endpoint,
            education_id,
            max_pages = self.config.max_pages,
            "Journal listing exceeded the page cap"
        );
        Err(JournalError::PaginationExhausted {
            endpoint: endpoint.to_string(),
            pages: self.config.max_pages,
        })
    }

    /// Send a request and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, JournalError> {
        let response = request.send().await.map_err(http_error)?;
        check_status(response.status(), endpoint)?;

        let body = response.text().await.map_err(http_error)?;
        serde_json::from_str(&body).map_err(|e| JournalError::Malformed {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl JournalApi for JournalClient {
    async fn fetch_lessons(
        &self,
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        self.list_by_education(
            &self.config.lessons_url(),
            "journal/lesson/list-by-education",
            education_id,
            date_from,
            date_to,
            token,
        )
        .await
    }

    async fn fetch_schedule(
        &self,
        education_id: i64,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        self.list_by_education(
            &self.config.schedule_url(),
            "journal/schedule/list-by-education",
            education_id,
            date,
            date,
            token,
        )
        .await
    }

    async fn fetch_file(&self, uuid: &str) -> Result<Vec<u8>, JournalError> {
        let endpoint = "filekit/file/download";
        debug!(uuid, "Downloading journal file");

        let response = self
            .http
            .get(self.config.file_url())
            .query(&[("p_uuid", uuid)])
            .send()
            .await
            .map_err(http_error)?;
        check_status(response.status(), endpoint)?;

        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(bytes.to_vec())
    }

    async fn related_children(&self, token: &str) -> Result<Vec<ChildProfile>, JournalError> {
        let request = self
            .http
            .get(self.config.related_children_url())
            .header(TOKEN_HEADER, token);

        let body: ResponseEnvelope<ListPage<RelatedChild>> = self
            .get_json(request, "journal/person/related-child-list")
            .await?;

        Ok(body.data.items.into_iter().map(ChildProfile::from).collect())
    }

    fn name(&self) -> &str {
        "JournalClient"
    }
}

impl std::fmt::Debug for JournalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalClient")
            .field("config", &self.config)
            .finish()
    }
}

fn http_error(err: reqwest::Error) -> JournalError {
    JournalError::Http(err.to_string())
}

fn check_status(status: StatusCode, endpoint: &str) -> Result<(), JournalError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(JournalError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        })
    }
}
