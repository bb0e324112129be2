//! Yandex Disk REST client (blocking).
//!
//! | Operation | Endpoint |
//! |---|---|
//! | list | `GET /resources?path=&limit=&offset=` → `_embedded.items` |
//! | download | `GET /resources/download?path=` → `{href}`, then `GET href` |
//! | upload | `GET /resources/upload?path=&overwrite=` → `{href}`, then `PUT href` |
//!
//! Only the API calls carry the `Authorization: OAuth <token>` header. The
//! transfer `href`s are pre-signed and may live on another host.

use super::{RemoteEntry, RemoteStorage, TransferError};
use reqwest::StatusCode;
use reqwest::blocking::{Body, Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://cloud-api.yandex.net/v1/disk";

#[derive(Debug, Deserialize)]
struct ResourceListing {
    #[serde(rename = "_embedded")]
    embedded: Option<ListingPage>,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    items: Vec<RemoteEntry>,
    total: Option<u64>,
}

/// Transfer link returned by the download/upload endpoints.
#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    error: String,
}

impl ApiErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        [self.message, self.description, self.error]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
    }
}

/// Whether a listing is complete after receiving a page of `received` items.
fn is_last_page(received: usize, page_size: u32, collected: usize, total: Option<u64>) -> bool {
    received == 0
        || received < page_size as usize
        || total.is_some_and(|t| collected as u64 >= t)
}

/// Client for the Yandex Disk REST API.
pub struct YandexDisk {
    client: Client,
    api_url: String,
    auth: HeaderValue,
    page_size: u32,
}

impl YandexDisk {
    pub fn new(
        token: &str,
        api_url: &str,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, TransferError> {
        let mut auth = HeaderValue::from_str(&format!("OAuth {token}"))
            .map_err(|_| TransferError::InvalidToken)?;
        auth.set_sensitive(true);

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth,
            page_size: page_size.max(1),
        })
    }

    fn api(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .get(format!("{}/{}", self.api_url, endpoint))
            .header(AUTHORIZATION, self.auth.clone())
    }

    /// Resolve a transfer link for `path`.
    fn link(&self, endpoint: &str, query: &[(&str, &str)], path: &str) -> Result<Link, TransferError> {
        let response = self.api(endpoint).query(query).send()?;
        Ok(check(response, path)?.json()?)
    }
}

/// Turn a non-2xx response into a [`TransferError`].
fn check(response: Response, path: &str) -> Result<Response, TransferError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(TransferError::NotFound(path.to_string()));
    }
    let body: ApiErrorBody = response.json().unwrap_or_default();
    Err(TransferError::Api {
        status: status.as_u16(),
        path: path.to_string(),
        message: body.into_message(status),
    })
}

impl RemoteStorage for YandexDisk {
    fn list(&self, dir: &str) -> Result<Vec<RemoteEntry>, TransferError> {
        let limit = self.page_size.to_string();
        let mut entries = Vec::new();

        loop {
            let offset = entries.len().to_string();
            let response = self
                .api("resources")
                .query(&[("path", dir), ("limit", limit.as_str()), ("offset", offset.as_str())])
                .send()?;
            let listing: ResourceListing = check(response, dir)?.json()?;
            let page = listing
                .embedded
                .ok_or_else(|| TransferError::NotADirectory(dir.to_string()))?;

            let received = page.items.len();
            entries.extend(page.items);
            if is_last_page(received, self.page_size, entries.len(), page.total) {
                break;
            }
        }

        tracing::debug!(dir, count = entries.len(), "listed remote directory");
        Ok(entries)
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> Result<(), TransferError> {
        let link = self.link("resources/download", &[("path", remote_path)], remote_path)?;
        let mut response = check(self.client.get(&link.href).send()?, remote_path)?;

        let io_error = |source| TransferError::Io {
            path: local_path.to_path_buf(),
            source,
        };
        let mut file = File::create(local_path).map_err(io_error)?;
        response.copy_to(&mut file)?;
        Ok(())
    }

    fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        overwrite: bool,
    ) -> Result<(), TransferError> {
        let overwrite = if overwrite { "true" } else { "false" };
        let link = self.link(
            "resources/upload",
            &[("path", remote_path), ("overwrite", overwrite)],
            remote_path,
        )?;

        let file = File::open(local_path).map_err(|source| TransferError::Io {
            path: local_path.to_path_buf(),
            source,
        })?;
        let response = self.client.put(&link.href).body(Body::from(file)).send()?;
        check(response, remote_path)?;
        Ok(())
    }
}
