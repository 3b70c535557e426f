use std::collections::BTreeSet;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bindery_core::application::{
    CreateReadListCommand, ListReadListsOptions, UpdateReadListCommand,
};
use bindery_core::domain::Principal;
use bindery_model::{LibraryId, Page, ReadList, ReadListId, ReadListMember};

use super::pagination::{PageParams, parse_bool, parse_u32};
use crate::api::{ApiResponse, CreateReadListRequest, UpdateReadListRequest};
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Listing query. `library_id` may repeat, which the derive-based query
/// extractor cannot express, so the raw pairs are folded here.
#[derive(Debug, Default)]
struct ListReadListsQuery {
    search: Option<String>,
    library_ids: BTreeSet<LibraryId>,
    page: PageParams,
}

impl ListReadListsQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> AppResult<Self> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "search" => query.search = Some(value),
                "library_id" => {
                    let id = value
                        .parse::<LibraryId>()
                        .map_err(|err| AppError::bad_request(err.to_string()))?;
                    query.library_ids.insert(id);
                }
                "page" => query.page.page = Some(parse_u32("page", &value)?),
                "size" => query.page.size = Some(parse_u32("size", &value)?),
                "unpaged" => query.page.unpaged = Some(parse_bool("unpaged", &value)?),
                "sort" => query.page.sort = Some(value),
                _ => {}
            }
        }
        Ok(query)
    }
}

pub async fn list_read_lists_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<ApiResponse<Page<ReadList>>>> {
    let query = ListReadListsQuery::from_pairs(pairs)?;
    let options = ListReadListsOptions {
        search: query.search,
        library_ids: Some(query.library_ids).filter(|ids| !ids.is_empty()),
        page: query.page.into_page_request(state.default_page_size())?,
    };

    let page = state.read_lists.list_read_lists(&principal, options).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_read_list_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReadListId>,
) -> AppResult<Json<ApiResponse<ReadList>>> {
    let read_list = state.read_lists.get_read_list(&principal, id).await?;
    Ok(Json(ApiResponse::success(read_list)))
}

pub async fn list_read_list_books_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReadListId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<ApiResponse<Page<ReadListMember>>>> {
    let page = params.into_page_request(state.default_page_size())?;
    let members = state.read_lists.list_members(&principal, id, page).await?;
    Ok(Json(ApiResponse::success(members)))
}

pub async fn create_read_list_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateReadListRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReadList>>)> {
    let command = CreateReadListCommand {
        name: request.name,
        summary: request.summary,
        book_ids: request.book_ids,
    };

    let read_list = state.read_lists.create_read_list(&principal, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(read_list))))
}

pub async fn update_read_list_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReadListId>,
    Json(request): Json<UpdateReadListRequest>,
) -> AppResult<StatusCode> {
    let command = UpdateReadListCommand {
        name: request.name,
        summary: request.summary,
        book_ids: request.book_ids,
    };

    state
        .read_lists
        .update_read_list(&principal, id, command)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_read_list_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<ReadListId>,
) -> AppResult<StatusCode> {
    state.read_lists.delete_read_list(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
