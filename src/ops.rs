//! Write-then-refresh jobs.
//!
//! Every mutation is followed by a full re-fetch of the affected lists; the
//! in-memory data is never patched incrementally. Results flow back to the
//! UI as [`AppEvent`]s over an mpsc channel.
//!
//! A failed write stops the job: nothing is refreshed and prior state stays.
//! A failed refresh after a successful write only reports the error; the
//! write is not rolled back.

use crate::api::{ApiClient, ApiError, CategoryPayload, PostPayload};
use crate::app::AppEvent;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A unit of background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    SaveCategory {
        id: Option<i64>,
        payload: CategoryPayload,
    },
    DeleteCategory {
        id: i64,
        name: String,
    },
    SavePost {
        id: Option<i64>,
        payload: PostPayload,
    },
    DeletePost {
        id: i64,
        title: String,
    },
    RefreshCategories,
    RefreshPosts,
}

impl Job {
    /// Short name for logs and panic reports.
    pub fn name(&self) -> &'static str {
        match self {
            Job::SaveCategory { .. } => "save_category",
            Job::DeleteCategory { .. } => "delete_category",
            Job::SavePost { .. } => "save_post",
            Job::DeletePost { .. } => "delete_post",
            Job::RefreshCategories => "refresh_categories",
            Job::RefreshPosts => "refresh_posts",
        }
    }
}

/// Run `job` to completion, reporting every step on `tx`.
pub async fn run_job(api: &ApiClient, job: Job, tx: &mpsc::Sender<AppEvent>) {
    tracing::debug!(job = job.name(), "Running job");

    match job {
        Job::SaveCategory { id, payload } => {
            let result = match id {
                Some(id) => api.update_category(id, &payload).await,
                None => api.create_category(&payload).await,
            };
            match result {
                Ok(saved) => {
                    tracing::info!(id = saved.id, name = %saved.name, created = id.is_none(), "Category saved");
                    emit(
                        tx,
                        AppEvent::CategorySaved {
                            id: saved.id,
                            name: saved.name,
                            created: id.is_none(),
                        },
                    )
                    .await;
                    refresh_categories(api, tx).await;
                    refresh_posts(api, tx).await;
                }
                Err(e) => {
                    emit(
                        tx,
                        AppEvent::CategorySaveFailed {
                            error: write_failure("save_category", &e),
                        },
                    )
                    .await;
                }
            }
        }
        Job::DeleteCategory { id, name } => match api.delete_category(id).await {
            Ok(response) => {
                tracing::info!(id, name = %name, "Category deleted");
                emit(
                    tx,
                    AppEvent::CategoryDeleted {
                        id,
                        name,
                        message: response.message,
                    },
                )
                .await;
                refresh_categories(api, tx).await;
                refresh_posts(api, tx).await;
            }
            Err(e) => {
                emit(
                    tx,
                    AppEvent::CategoryDeleteFailed {
                        id,
                        error: write_failure("delete_category", &e),
                    },
                )
                .await;
            }
        },
        Job::SavePost { id, payload } => {
            let result = match id {
                Some(id) => api.update_post(id, &payload).await,
                None => api.create_post(&payload).await,
            };
            match result {
                Ok(saved) => {
                    tracing::info!(id = saved.id, title = %saved.title, created = id.is_none(), "Post saved");
                    emit(
                        tx,
                        AppEvent::PostSaved {
                            id: saved.id,
                            title: saved.title,
                            created: id.is_none(),
                        },
                    )
                    .await;
                    refresh_posts(api, tx).await;
                }
                Err(e) => {
                    emit(
                        tx,
                        AppEvent::PostSaveFailed {
                            error: write_failure("save_post", &e),
                        },
                    )
                    .await;
                }
            }
        }
        Job::DeletePost { id, title } => match api.delete_post(id).await {
            Ok(response) => {
                tracing::info!(id, title = %title, "Post deleted");
                emit(
                    tx,
                    AppEvent::PostDeleted {
                        id,
                        title,
                        message: response.message,
                    },
                )
                .await;
                refresh_posts(api, tx).await;
            }
            Err(e) => {
                emit(
                    tx,
                    AppEvent::PostDeleteFailed {
                        id,
                        error: write_failure("delete_post", &e),
                    },
                )
                .await;
            }
        },
        Job::RefreshCategories => refresh_categories(api, tx).await,
        Job::RefreshPosts => refresh_posts(api, tx).await,
    }
}

/// Re-fetch the full category forest.
pub async fn refresh_categories(api: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    emit(tx, AppEvent::CategoriesLoading).await;
    let result = api
        .list_categories(None)
        .await
        .map(|list| list.data)
        .map_err(|e| e.to_string());
    if let Err(ref e) = result {
        tracing::warn!(error = %e, "Category refresh failed");
    }
    emit(tx, AppEvent::CategoriesLoaded(result)).await;
}

/// Re-fetch the full post list.
pub async fn refresh_posts(api: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    emit(tx, AppEvent::PostsLoading).await;
    let result = api
        .list_posts()
        .await
        .map(|list| list.data)
        .map_err(|e| e.to_string());
    if let Err(ref e) = result {
        tracing::warn!(error = %e, "Post refresh failed");
    }
    emit(tx, AppEvent::PostsLoaded(result)).await;
}

/// Run `job` on its own task.
///
/// Jobs are never cancelled or sequenced: overlapping submissions all run
/// and whichever response lands last wins.
pub fn spawn_job(api: ApiClient, job: Job, tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let task = job.name();
        if let Err(error) = catch_task_panic(run_job(&api, job, &tx)).await {
            tracing::error!(task, error = %error, "Job panicked");
            emit(&tx, AppEvent::TaskPanicked { task, error }).await;
        }
    })
}

/// Message shown for a failed write. The HTTP status, if any, only goes to the log.
fn write_failure(job: &'static str, error: &ApiError) -> String {
    tracing::warn!(job, status = ?error.status(), error = %error, "Write failed");
    error.to_string()
}

async fn emit(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Failed to send job event (receiver dropped)");
    }
}

/// Convert a panic inside `future` into `Err(message)`.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}
