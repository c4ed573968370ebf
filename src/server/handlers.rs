//! HTTP handlers for the bulk export/delete actions
//!
//! Every mutating or exporting action runs the same gate before touching the
//! engine: authenticate, check the access policy, verify the nonce bound to
//! the principal and action. Validation failures and outcomes are reported by
//! redirecting back to the admin page with a `message` query parameter;
//! successful exports respond with the CSV file itself.

use super::forms::{AdminAction, DeleteForm, ExportForm};
use crate::config::AdminConfig;
use crate::core::auth::{AuthContext, AuthPolicy, AuthProvider};
use crate::core::entity::{EntityKind, Record};
use crate::core::error::{BulkError, RequestError, ValidationError};
use crate::core::nonce::NonceStore;
use crate::core::store::RecordStore;
use crate::engine::export::CSV_CONTENT_TYPE;
use crate::engine::{
    BulkDeleter, CsvExporter, CsvFile, CsvRecord, ExportOutcome, ProtectList, RecordFetcher,
    export_file_name,
};
use crate::entities::{Account, ContentItem};
use axum::Json;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;

/// Fetcher and deleter sharing one store
pub struct RecordServices<R: Record> {
    pub fetcher: RecordFetcher<R>,
    pub deleter: BulkDeleter<R>,
}

impl<R: Record> Clone for RecordServices<R> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            deleter: self.deleter.clone(),
        }
    }
}

impl<R: Record> RecordServices<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        Self {
            fetcher: RecordFetcher::new(store.clone()),
            deleter: BulkDeleter::new(store),
        }
    }
}

/// Shared state for the admin handlers
#[derive(Clone)]
pub struct AdminState {
    pub content: RecordServices<ContentItem>,
    pub accounts: RecordServices<Account>,
    pub exporter: CsvExporter,
    pub auth_provider: Arc<dyn AuthProvider>,
    pub nonces: Arc<dyn NonceStore>,
    pub policy: AuthPolicy,
    pub config: Arc<AdminConfig>,
}

impl AdminState {
    /// Admin page that outcomes for `kind` redirect back to
    pub fn page_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::ContentItem => &self.config.pages.posts,
            EntityKind::Account => &self.config.pages.users,
        }
    }

    /// Authenticate the caller and check the access policy
    async fn authorize(&self, headers: &HeaderMap) -> Result<AuthContext, BulkError> {
        let context = self.auth_provider.extract_context(headers).await?;

        if matches!(context, AuthContext::Anonymous) {
            return Err(RequestError::Unauthorized {
                message: "Authentication required".to_string(),
            }
            .into());
        }

        if !self.policy.check(&context) {
            tracing::warn!(principal = ?context.principal_id(), "access policy denied request");
            return Err(RequestError::Forbidden {
                message: "You do not have permission to perform this action.".to_string(),
            }
            .into());
        }

        Ok(context)
    }

    /// Authorize, then verify the nonce submitted for `action`
    async fn guard(
        &self,
        headers: &HeaderMap,
        action: AdminAction,
        nonce: &str,
    ) -> Result<AuthContext, BulkError> {
        let context = self.authorize(headers).await?;
        let principal_id = context.principal_id().ok_or_else(|| RequestError::Unauthorized {
            message: "Authentication required".to_string(),
        })?;

        if !self.nonces.verify(principal_id, action.as_str(), nonce.trim())? {
            tracing::warn!(principal_id, action = %action, "nonce verification failed");
            return Err(RequestError::InvalidNonce {
                action: action.to_string(),
            }
            .into());
        }

        Ok(context)
    }
}

/// GET /admin/nonce/{action}
pub async fn issue_nonce(
    State(state): State<AdminState>,
    Path(action): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, BulkError> {
    let action = AdminAction::parse(&action).ok_or_else(|| ValidationError::UnknownOption {
        field: "action".to_string(),
        value: action.clone(),
    })?;

    let context = state.authorize(&headers).await?;
    let principal_id = context.principal_id().ok_or_else(|| RequestError::Unauthorized {
        message: "Authentication required".to_string(),
    })?;
    let nonce = state.nonces.issue(principal_id, action.as_str())?;

    Ok(Json(json!({
        "action": action.as_str(),
        "nonce": nonce,
    })))
}

/// POST /admin/posts/export
pub async fn export_posts(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(form): Form<ExportForm>,
) -> Result<Response, BulkError> {
    run_export(&state, &state.content, AdminAction::ExportPosts, &headers, form).await
}

/// POST /admin/users/export
pub async fn export_users(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(form): Form<ExportForm>,
) -> Result<Response, BulkError> {
    run_export(&state, &state.accounts, AdminAction::ExportUsers, &headers, form).await
}

/// POST /admin/posts/delete
pub async fn delete_posts(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(form): Form<DeleteForm>,
) -> Result<Response, BulkError> {
    run_delete(&state, &state.content, AdminAction::DeletePosts, &headers, form).await
}

/// POST /admin/users/delete
pub async fn delete_users(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(form): Form<DeleteForm>,
) -> Result<Response, BulkError> {
    run_delete(&state, &state.accounts, AdminAction::DeleteUsers, &headers, form).await
}

async fn run_export<R: CsvRecord>(
    state: &AdminState,
    services: &RecordServices<R>,
    action: AdminAction,
    headers: &HeaderMap,
    form: ExportForm,
) -> Result<Response, BulkError> {
    state.guard(headers, action, &form.nonce).await?;

    let kind = R::kind();
    let page = state.page_for(kind);
    let request = match form.into_request(kind) {
        Ok(request) => request,
        Err(e) => return redirect_with_message(page, &e.to_string()),
    };

    let records = services.fetcher.fetch(&request.subtype, &request.filter).await?;
    match state.exporter.export_records(&records)? {
        ExportOutcome::NoRecords => redirect_with_message(page, &no_records_message(kind)),
        ExportOutcome::File(file) => {
            let file_name = export_file_name(&request.subtype, kind, Utc::now().date_naive());
            tracing::info!(
                kind = %kind,
                subtype = %request.subtype,
                rows = file.rows,
                file = %file_name,
                "export generated"
            );
            Ok(csv_download(file, &file_name, &state.config.export.charset))
        }
    }
}

async fn run_delete<R: Record>(
    state: &AdminState,
    services: &RecordServices<R>,
    action: AdminAction,
    headers: &HeaderMap,
    form: DeleteForm,
) -> Result<Response, BulkError> {
    let context = state.guard(headers, action, &form.nonce).await?;

    let kind = R::kind();
    let page = state.page_for(kind);
    let request = match form.into_request(kind) {
        Ok(request) => request,
        Err(e) => return redirect_with_message(page, &e.to_string()),
    };

    // Only accounts share an id space with principals
    let protect = match kind {
        EntityKind::Account => ProtectList::for_principal(context.principal_id()),
        EntityKind::ContentItem => ProtectList::new(),
    };
    let message = match services
        .deleter
        .run(&request.subtype, &request.scope, &protect)
        .await
    {
        Ok(tally) => deleted_message(kind, tally.succeeded),
        Err(e) => {
            tracing::error!(kind = %kind, subtype = %request.subtype, error = %e, "bulk delete failed");
            format!("Error deleting {}.", kind.label())
        }
    };

    redirect_with_message(page, &message)
}

/// "1 post deleted successfully." / "3 users deleted successfully."
pub fn deleted_message(kind: EntityKind, count: usize) -> String {
    let noun = if count == 1 { kind.singular() } else { kind.label() };
    format!("{count} {noun} deleted successfully.")
}

pub fn no_records_message(kind: EntityKind) -> String {
    format!(
        "No {} found for the selected {} and date filters to export.",
        kind.label(),
        kind.subtype_label()
    )
}

/// 303 back to `page` carrying `message` as a query parameter
pub fn redirect_with_message(page: &str, message: &str) -> Result<Response, BulkError> {
    let query = serde_urlencoded::to_string([("message", message)])
        .map_err(|e| BulkError::Internal(format!("cannot encode redirect message: {e}")))?;
    let separator = if page.contains('?') { '&' } else { '?' };

    Ok(Redirect::to(&format!("{page}{separator}{query}")).into_response())
}

fn csv_download(file: CsvFile, file_name: &str, charset: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format!("{CSV_CONTENT_TYPE}; charset={charset}")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
            (header::PRAGMA, "no-cache".to_string()),
            (header::EXPIRES, "0".to_string()),
        ],
        file.bytes,
    )
        .into_response()
}
