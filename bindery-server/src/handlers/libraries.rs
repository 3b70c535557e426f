use axum::{
    Extension, Json,
    extract::{Path, State},
};
use bindery_core::domain::Principal;
use bindery_model::{Library, LibraryId};

use crate::api::ApiResponse;
use crate::infra::{app_state::AppState, errors::AppResult};

pub async fn list_libraries_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ApiResponse<Vec<Library>>>> {
    let libraries = state.libraries.list_libraries(&principal).await?;
    Ok(Json(ApiResponse::success(libraries)))
}

pub async fn get_library_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<LibraryId>,
) -> AppResult<Json<ApiResponse<Library>>> {
    let library = state.libraries.get_library(&principal, id).await?;
    Ok(Json(ApiResponse::success(library)))
}
