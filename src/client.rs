//! HTTP client for the Up Banking API.
//!
//! Provides both async and blocking client variants behind feature
//! flags. Every fetch is a plain authenticated GET; given the same
//! inputs and remote state it yields the same result, and nothing is
//! retried automatically.

use crate::error::UpBankError;
use crate::models::ErrorEnvelope;

/// Base URL for the Up Banking API.
const DEFAULT_BASE_URL: &str = "https://api.up.com.au/api/v1";

/// Accounts endpoint path.
const ACCOUNTS_PATH: &str = "/accounts";

/// Transactions endpoint path.
const TRANSACTIONS_PATH: &str = "/transactions";

/// Categories endpoint path.
const CATEGORIES_PATH: &str = "/categories";

/// Tags endpoint path.
const TAGS_PATH: &str = "/tags";

/// Webhooks endpoint path.
const WEBHOOKS_PATH: &str = "/webhooks";

/// Ping (token verification) endpoint path.
const PING_PATH: &str = "/util/ping";

/// Maps a non-success response to an API error.
///
/// The JSON:API error envelope is parsed when present; an unparseable
/// body degrades to an error with the status code alone.
fn error_from_response(status: u16, body: &str) -> UpBankError {
    let errors = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.errors)
        .unwrap_or_default();
    UpBankError::Api { status, errors }
}

/// Generates an Up client (async or blocking) with builder, methods, and
/// tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Personal access token for API authentication.
            token: Option<String>,
            /// Base URL override (for testing).
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets the personal access token for API authentication.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(token.into());
                self
            }

            /// Overrides the base URL (useful for testing with a mock
            /// server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`UpBankError::MissingToken`] if no token was
            /// provided. Returns [`UpBankError::Transport`] if the HTTP
            /// client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let token = self.token.ok_or(UpBankError::MissingToken)?;
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer access token.
            token: String,
            /// API base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                }
            }

            /// Verifies the access token against the ping endpoint.
            ///
            /// # Errors
            ///
            /// Returns [`UpBankError::Api`] with status 401 when the
            /// token is invalid, or other variants for transport and
            /// decoding failures.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn ping(&self) -> Result<()> {
                self.send_command(Method::GET, PING_PATH, None) $( .$await_ext )?
            }

            /// Lists accounts.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn accounts(&self, query: &ListQuery) -> Result<Page<Account>> {
                let envelope: CollectionEnvelope<Account> = self
                    .get_json(ACCOUNTS_PATH, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Retrieves a single account.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(account = %id))]
            pub $($async_kw)? fn account(&self, id: &AccountId) -> Result<Account> {
                let path = format!("{ACCOUNTS_PATH}/{id}");
                let envelope: SingleEnvelope<Account> =
                    self.get_json(&path, &[]) $( .$await_ext )? ?;
                Ok(envelope.data)
            }

            /// Resolves a transaction's account for display.
            ///
            /// Enrichment is tolerant of partial failure: a missing
            /// relationship or a failed lookup yields `None` (with a
            /// warning logged) so one unresolvable field never fails a
            /// whole screen.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %transaction.id))]
            pub $($async_kw)? fn related_account(
                &self,
                transaction: &Transaction,
            ) -> Option<Account> {
                let id = transaction.account_id()?;
                match self.account(id) $( .$await_ext )? {
                    Ok(account) => Some(account),
                    Err(err) => {
                        tracing::warn!(error = %err, account = %id, "failed to resolve related account");
                        None
                    }
                }
            }

            /// Lists transactions across all accounts.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn transactions(
                &self,
                query: &TransactionQuery,
            ) -> Result<Page<Transaction>> {
                let envelope: CollectionEnvelope<Transaction> = self
                    .get_json(TRANSACTIONS_PATH, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Lists transactions belonging to one account.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(account = %account))]
            pub $($async_kw)? fn account_transactions(
                &self,
                account: &AccountId,
                query: &TransactionQuery,
            ) -> Result<Page<Transaction>> {
                let path = format!("{ACCOUNTS_PATH}/{account}/transactions");
                let envelope: CollectionEnvelope<Transaction> =
                    self.get_json(&path, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Retrieves a single transaction.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %id))]
            pub $($async_kw)? fn transaction(&self, id: &TransactionId) -> Result<Transaction> {
                let path = format!("{TRANSACTIONS_PATH}/{id}");
                let envelope: SingleEnvelope<Transaction> =
                    self.get_json(&path, &[]) $( .$await_ext )? ?;
                Ok(envelope.data)
            }

            /// Lists categories. The endpoint is not paginated; the
            /// full (optionally parent-filtered) tree is returned.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn categories(&self, query: &CategoryQuery) -> Result<Vec<Category>> {
                let envelope: CollectionEnvelope<Category> = self
                    .get_json(CATEGORIES_PATH, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(envelope.data)
            }

            /// Retrieves a single category.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(category = %id))]
            pub $($async_kw)? fn category(&self, id: &CategoryId) -> Result<Category> {
                let path = format!("{CATEGORIES_PATH}/{id}");
                let envelope: SingleEnvelope<Category> =
                    self.get_json(&path, &[]) $( .$await_ext )? ?;
                Ok(envelope.data)
            }

            /// Lists tags.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn tags(&self, query: &ListQuery) -> Result<Page<Tag>> {
                let envelope: CollectionEnvelope<Tag> =
                    self.get_json(TAGS_PATH, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Lists registered webhooks.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn webhooks(&self, query: &ListQuery) -> Result<Page<Webhook>> {
                let envelope: CollectionEnvelope<Webhook> =
                    self.get_json(WEBHOOKS_PATH, &query.to_pairs()) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Registers a new webhook.
            ///
            /// The response carries the signing secret; it is returned
            /// only here and never again.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_webhook(&self, input: &WebhookInput) -> Result<Webhook> {
                let body = serde_json::json!({ "data": { "attributes": input } });
                let envelope: SingleEnvelope<Webhook> = self
                    .send_json(Method::POST, WEBHOOKS_PATH, &body) $( .$await_ext )? ?;
                Ok(envelope.data)
            }

            /// Deletes a webhook.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(webhook = %id))]
            pub $($async_kw)? fn delete_webhook(&self, id: &WebhookId) -> Result<()> {
                let path = format!("{WEBHOOKS_PATH}/{id}");
                self.send_command(Method::DELETE, &path, None) $( .$await_ext )?
            }

            /// Sends a `PING` event to a webhook's delivery URL.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(webhook = %id))]
            pub $($async_kw)? fn ping_webhook(&self, id: &WebhookId) -> Result<()> {
                let path = format!("{WEBHOOKS_PATH}/{id}/ping");
                self.send_command(Method::POST, &path, None) $( .$await_ext )?
            }

            /// Assigns a category to a transaction, or clears the
            /// assignment when `category` is `None`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %transaction))]
            pub $($async_kw)? fn categorize(
                &self,
                transaction: &TransactionId,
                category: Option<&CategoryId>,
            ) -> Result<()> {
                let path = format!("{TRANSACTIONS_PATH}/{transaction}/relationships/category");
                let body = serde_json::to_value(ToOne {
                    data: category
                        .map(|id| RelationshipData::new("categories", id.clone())),
                })?;
                self.send_command(Method::PATCH, &path, Some(&body)) $( .$await_ext )?
            }

            /// Applies tags to a transaction.
            ///
            /// The server ignores tags already applied and rejects the
            /// request once the per-transaction tag ceiling is exceeded.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %transaction))]
            pub $($async_kw)? fn add_tags(
                &self,
                transaction: &TransactionId,
                tags: &[TagId],
            ) -> Result<()> {
                let path = format!("{TRANSACTIONS_PATH}/{transaction}/relationships/tags");
                let body = serde_json::to_value(tag_refs(tags))?;
                self.send_command(Method::POST, &path, Some(&body)) $( .$await_ext )?
            }

            /// Removes tags from a transaction.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails or the server
            /// returns a non-success status.
            #[inline]
            #[tracing::instrument(skip_all, fields(transaction = %transaction))]
            pub $($async_kw)? fn remove_tags(
                &self,
                transaction: &TransactionId,
                tags: &[TagId],
            ) -> Result<()> {
                let path = format!("{TRANSACTIONS_PATH}/{transaction}/relationships/tags");
                let body = serde_json::to_value(tag_refs(tags))?;
                self.send_command(Method::DELETE, &path, Some(&body)) $( .$await_ext )?
            }

            /// Follows a pagination cursor verbatim.
            ///
            /// The cursor's URL already carries every query parameter of
            /// the originating request.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server
            /// returns a non-success status, or the response cannot be
            /// deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn next_page<T: serde::de::DeserializeOwned>(
                &self,
                cursor: &PageCursor,
            ) -> Result<Page<T>> {
                tracing::trace!(url = %cursor.as_url(), "following pagination cursor");
                let request = self.http.get(cursor.as_url());
                let envelope: CollectionEnvelope<T> =
                    self.execute(request) $( .$await_ext )? ?;
                Ok(Page::from(envelope))
            }

            /// Sends an authenticated GET and deserializes the response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn get_json<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
                query: &[(String, String)],
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                let request = self.http.get(&url).query(query);
                self.execute(request) $( .$await_ext )?
            }

            /// Sends an authenticated request with a JSON body and
            /// deserializes the response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn send_json<Resp: serde::de::DeserializeOwned>(
                &self,
                method: Method,
                path: &str,
                body: &serde_json::Value,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                let request = self.http.request(method, &url).json(body);
                self.execute(request) $( .$await_ext )?
            }

            /// Sends an authenticated request whose success response
            /// carries no payload of interest (204, or a body the
            /// caller discards).
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn send_command(
                &self,
                method: Method,
                path: &str,
                body: Option<&serde_json::Value>,
            ) -> Result<()> {
                let url = format!("{}{path}", self.base_url);
                let mut request = self.http.request(method, &url);
                if let Some(body) = body {
                    request = request.json(body);
                }
                let response = request
                    .header(AUTHORIZATION, format!("Bearer {}", self.token))
                    .send()
                    $( .$await_ext )?
                    ?;
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    Ok(())
                } else {
                    let text = response.text() $( .$await_ext )? .unwrap_or_default();
                    Err(error_from_response(status.as_u16(), &text))
                }
            }

            /// Dispatches a prepared request, mapping status and body to
            /// the crate's result type.
            $($async_kw)? fn execute<Resp: serde::de::DeserializeOwned>(
                &self,
                request: RequestBuilder,
            ) -> Result<Resp> {
                let response = request
                    .header(AUTHORIZATION, format!("Bearer {}", self.token))
                    .header(ACCEPT, "application/json")
                    .send()
                    $( .$await_ext )?
                    ?;
                let status = response.status();
                tracing::debug!(status = %status, "received response");
                let body = response.text() $( .$await_ext )? ?;
                if status.is_success() {
                    tracing::trace!(body_len = body.len(), "parsing response body");
                    serde_json::from_str(&body).map_err(UpBankError::from)
                } else {
                    Err(error_from_response(status.as_u16(), &body))
                }
            }
        }

    };
}

/// Builds the `{"data": [{"type": "tags", "id": ..}]}` relationship
/// body shared by tag addition and removal.
fn tag_refs(tags: &[crate::models::TagId]) -> crate::models::ToMany<crate::models::TagId> {
    crate::models::ToMany {
        data: tags
            .iter()
            .map(|tag| crate::models::RelationshipData::new("tags", tag.clone()))
            .collect(),
    }
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the Up Banking API.

    use reqwest::header::{ACCEPT, AUTHORIZATION};
    use reqwest::{Method, RequestBuilder};

    use super::{
        ACCOUNTS_PATH, CATEGORIES_PATH, DEFAULT_BASE_URL, PING_PATH, TAGS_PATH, TRANSACTIONS_PATH,
        WEBHOOKS_PATH, error_from_response, tag_refs,
    };
    use crate::error::{Result, UpBankError};
    use crate::models::{
        Account, AccountId, Category, CategoryId, CategoryQuery, CollectionEnvelope, ListQuery,
        Page, PageCursor, RelationshipData, SingleEnvelope, Tag, TagId, ToOne, Transaction,
        TransactionId, TransactionQuery, Webhook, WebhookId, WebhookInput,
    };

    define_client! {
        client_name: UpBankClient,
        builder_name: UpBankClientBuilder,
        http_type: reqwest::Client,
        client_doc: "Async client for the Up Banking API.\n\nUse [`UpBankClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`UpBankClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the Up Banking API.

    use reqwest::Method;
    use reqwest::blocking::RequestBuilder;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    use super::{
        ACCOUNTS_PATH, CATEGORIES_PATH, DEFAULT_BASE_URL, PING_PATH, TAGS_PATH, TRANSACTIONS_PATH,
        WEBHOOKS_PATH, error_from_response, tag_refs,
    };
    use crate::error::{Result, UpBankError};
    use crate::models::{
        Account, AccountId, Category, CategoryId, CategoryQuery, CollectionEnvelope, ListQuery,
        Page, PageCursor, RelationshipData, SingleEnvelope, Tag, TagId, ToOne, Transaction,
        TransactionId, TransactionQuery, Webhook, WebhookId, WebhookInput,
    };

    define_client! {
        client_name: UpBankBlockingClient,
        builder_name: UpBankBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        client_doc: "Blocking (synchronous) client for the Up Banking API.\n\nUse [`UpBankBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`UpBankBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{UpBankClient, UpBankClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{UpBankBlockingClient, UpBankBlockingClientBuilder};
