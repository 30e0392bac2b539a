//! Table query builder for the platform's REST dialect.
//!
//! Filters render as `column=op.value` query parameters, embedded
//! resources ride in `select`, and exact totals come back in the
//! `Content-Range` header when requested.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

use crate::client::PlateshareClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody, RestRequest, RestResponse};

/// One page of rows, with the exact total when the query asked for one.
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
}

/// A query against one table. Filter dimensions AND-combine; a filter
/// method that is never called imposes no restriction.
pub struct QueryBuilder<'a> {
    client: &'a PlateshareClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
    count_exact: bool,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a PlateshareClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            select: None,
            filters: Vec::new(),
            order: None,
            offset: None,
            limit: None,
            count_exact: false,
        }
    }

    /// Column projection, including embedded resources, e.g.
    /// `"id,title,users!inner(username,avatar_url),ratings(rating)"`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    /// `column = value`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    /// Case-insensitive pattern match; `%` is the wildcard.
    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.{}", pattern)));
        self
    }

    /// `column <= value`.
    pub fn lte(mut self, column: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("lte.{}", value)));
        self
    }

    /// Value-in-list. Members are double-quoted so values containing
    /// commas or spaces survive the trip.
    pub fn in_list<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let members = values
            .iter()
            .map(|v| format!("\"{}\"", v.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.filters
            .push((column.to_string(), format!("in.({})", members)));
        self
    }

    /// Array-overlap: matches rows whose array column shares at least
    /// one element with `values`.
    pub fn overlaps<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let members = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters
            .push((column.to_string(), format!("ov.{{{}}}", members)));
        self
    }

    /// `column IS NULL`.
    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_string(), "is.null".to_string()));
        self
    }

    /// Raw disjunction, e.g.
    /// `"title.ilike.%q%,description.ilike.%q%"`.
    pub fn or(mut self, disjunction: &str) -> Self {
        self.filters
            .push(("or".to_string(), format!("({})", disjunction)));
        self
    }

    /// Sort ascending by a column.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.asc", column));
        self
    }

    /// Sort descending by a column.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.desc", column));
        self
    }

    /// Offset/limit pagination window.
    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ask the platform for the exact total match count alongside the
    /// page of rows.
    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    fn path(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }

    pub(crate) fn into_request(self, method: Method) -> RestRequest {
        let mut request = RestRequest::new(method, self.path());
        if let Some(select) = self.select {
            request.query.push(("select".to_string(), select));
        }
        request.query.extend(self.filters);
        if let Some(order) = self.order {
            request.query.push(("order".to_string(), order));
        }
        if let Some(offset) = self.offset {
            request.query.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            request.query.push(("limit".to_string(), limit.to_string()));
        }
        if self.count_exact {
            request
                .headers
                .push(("Prefer".to_string(), "count=exact".to_string()));
        }
        request
    }

    /// Fetch the matching page of rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Page<T>, ApiError> {
        let client = self.client;
        let request = self.into_request(Method::Get);
        let response = client.execute(request).await?;
        let total = total_from(&response);
        let rows = decode_rows(&response.body)?;
        Ok(Page { rows, total })
    }

    /// Fetch exactly one row; [`ApiError::NotFound`] when nothing
    /// matches.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        self.fetch_optional().await?.ok_or(ApiError::NotFound)
    }

    /// Fetch at most one row.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        let page = self.limit(1).fetch::<T>().await?;
        Ok(page.rows.into_iter().next())
    }

    /// Count matching rows without fetching them (HEAD request).
    pub async fn count(self) -> Result<u64, ApiError> {
        let client = self.client;
        let request = self.count_exact().into_request(Method::Head);
        let response = client.execute(request).await?;
        total_from(&response)
            .ok_or_else(|| ApiError::Decode("count response missing Content-Range".to_string()))
    }

    /// Insert a row and return the created representation.
    pub async fn insert<T: DeserializeOwned>(self, row: &impl Serialize) -> Result<T, ApiError> {
        let client = self.client;
        let mut request = self.into_request(Method::Post);
        request
            .headers
            .push(("Prefer".to_string(), "return=representation".to_string()));
        request.body = RequestBody::Json(to_json(row)?);
        let response = client.execute(request).await?;
        let rows: Vec<T> = decode_rows(&response.body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("insert returned no representation".to_string()))
    }

    /// Insert a row, discarding the created representation.
    pub async fn insert_only(self, row: &impl Serialize) -> Result<(), ApiError> {
        let client = self.client;
        let mut request = self.into_request(Method::Post);
        request.body = RequestBody::Json(to_json(row)?);
        client.execute(request).await?;
        Ok(())
    }

    /// Patch the rows matched by the filters.
    pub async fn update(self, patch: &impl Serialize) -> Result<(), ApiError> {
        let client = self.client;
        let mut request = self.into_request(Method::Patch);
        request.body = RequestBody::Json(to_json(patch)?);
        client.execute(request).await?;
        Ok(())
    }

    /// Delete the rows matched by the filters.
    pub async fn delete(self) -> Result<(), ApiError> {
        let client = self.client;
        let request = self.into_request(Method::Delete);
        client.execute(request).await?;
        Ok(())
    }
}

fn to_json(value: &impl Serialize) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Parse the exact total out of a Content-Range header
/// ("0-11/123" or "*/123"; "*" in the total position means unknown).
pub(crate) fn parse_content_range(value: &str) -> Option<u64> {
    let total = value.rsplit('/').next()?;
    total.parse().ok()
}

fn total_from(response: &RestResponse) -> Option<u64> {
    response
        .content_range
        .as_deref()
        .and_then(parse_content_range)
}
