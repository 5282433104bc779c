//! Query controller: sequences the profile and repository fetches of a search, tracks the
//! page cursor across "load more" actions and keeps the rendered view.
//!
//! Every action records the session generation it was issued under. A completion whose
//! generation no longer matches belongs to a superseded search and is dropped.

use std::sync::Arc;

use shared::{
    domain::{PageCursor, Profile, PAGE_SIZE},
    error::LookupError,
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    heatmap::{HeatmapSource, HeatmapView},
    render::{self, RepositoryArea, RepositoryRender},
    GitHubApi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    /// A newer search started while this action was waiting on the network.
    Discarded,
    /// Nothing to do: no current user, no further pages, or a page already in flight.
    Skipped,
}

/// Everything currently visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupView {
    pub loading: bool,
    pub error: Option<String>,
    pub profile_card: Option<String>,
    pub repositories: RepositoryArea,
    pub show_more: bool,
    pub heatmap: HeatmapView,
}

impl LookupView {
    fn fail(&mut self, err: &LookupError) {
        self.error = Some(err.to_string());
        self.loading = false;
        self.show_more = false;
    }
}

#[derive(Debug, Default)]
struct Session {
    generation: u64,
    username: Option<String>,
    profile: Option<Profile>,
    cursor: Option<PageCursor>,
    page_in_flight: bool,
}

#[derive(Debug, Default)]
struct ControllerState {
    session: Session,
    view: LookupView,
}

pub struct LookupController {
    api: Arc<dyn GitHubApi>,
    heatmap: Option<HeatmapSource>,
    inner: Mutex<ControllerState>,
    heatmap_task: Mutex<Option<JoinHandle<()>>>,
}

impl LookupController {
    pub fn new(api: Arc<dyn GitHubApi>, heatmap: Option<HeatmapSource>) -> Arc<Self> {
        Arc::new(Self {
            api,
            heatmap,
            inner: Mutex::new(ControllerState::default()),
            heatmap_task: Mutex::new(None),
        })
    }

    pub async fn view(&self) -> LookupView {
        self.inner.lock().await.view.clone()
    }

    /// Profile of the last successful search, if any.
    pub async fn current_profile(&self) -> Option<Profile> {
        self.inner.lock().await.session.profile.clone()
    }

    /// Looks up `input` and paints its profile and first page of repositories.
    pub async fn search(self: &Arc<Self>, input: &str) -> Result<ActionStatus, LookupError> {
        let username = input.trim().to_string();
        let generation = {
            let mut guard = self.inner.lock().await;
            let generation = guard.session.generation + 1;
            guard.session = Session {
                generation,
                ..Session::default()
            };
            guard.view = LookupView::default();

            if username.is_empty() {
                let err = LookupError::Validation;
                guard.view.error = Some(err.to_string());
                debug!(generation, "lookup: rejected empty username");
                return Err(err);
            }

            guard.view.loading = true;
            generation
        };
        if let Some(task) = self.heatmap_task.lock().await.take() {
            task.abort();
        }

        info!(%username, generation, "lookup: searching");
        let profile = self.api.fetch_profile(&username).await;

        let heatmap = {
            let mut guard = self.inner.lock().await;
            if guard.session.generation != generation {
                debug!(%username, generation, "lookup: dropping superseded profile");
                return Ok(ActionStatus::Discarded);
            }

            let profile = match profile {
                Ok(profile) => profile,
                Err(err) => {
                    warn!(%username, error = ?err, "lookup: profile lookup failed");
                    guard.view.fail(&err);
                    return Err(err);
                }
            };

            guard.view.profile_card = Some(render::render_profile(&profile));
            let heatmap = self.heatmap.clone().map(|source| {
                let url = source.url_for(&profile.login);
                guard.view.heatmap = HeatmapView::Pending(url.to_string());
                (source, url)
            });

            let session = &mut guard.session;
            session.username = Some(username.clone());
            session.cursor = Some(PageCursor::new(profile.public_repos));
            session.profile = Some(profile);
            session.page_in_flight = true;
            heatmap
        };

        if let Some((source, url)) = heatmap {
            let controller = Arc::clone(self);
            let task = tokio::spawn(async move {
                let outcome = source.loader().load(&url).await;
                let mut guard = controller.inner.lock().await;
                if guard.session.generation == generation {
                    debug!(%url, ?outcome, "lookup: heatmap settled");
                    guard.view.heatmap.resolve(outcome);
                }
            });
            *self.heatmap_task.lock().await = Some(task);
        }

        let repos = self.api.fetch_repositories(&username, 1, PAGE_SIZE).await;

        let mut guard = self.inner.lock().await;
        if guard.session.generation != generation {
            debug!(%username, generation, "lookup: dropping superseded first page");
            return Ok(ActionStatus::Discarded);
        }
        let state = &mut *guard;
        state.session.page_in_flight = false;

        let repos = match repos {
            Ok(repos) => repos,
            Err(err) => {
                warn!(%username, error = ?err, "lookup: first page failed");
                if let Some(cursor) = state.session.cursor.as_mut() {
                    cursor.exhaust();
                }
                state.view.fail(&err);
                return Err(err);
            }
        };

        let rendered = render::render_repositories(&mut state.view.repositories, &repos, false);
        state.view.loading = false;
        state.view.show_more = match state.session.cursor.as_mut() {
            Some(cursor) => {
                match rendered {
                    RepositoryRender::NoRepositories => cursor.exhaust(),
                    RepositoryRender::Entries(count) => cursor.record_page(count),
                }
                cursor.more_available()
            }
            None => false,
        };

        info!(
            %username,
            generation,
            shown = repos.len(),
            more = state.view.show_more,
            "lookup: search complete"
        );
        Ok(ActionStatus::Completed)
    }

    /// Fetches the next page for the current user and appends it to the list.
    pub async fn load_more(&self) -> Result<ActionStatus, LookupError> {
        let (generation, username, page) = {
            let mut guard = self.inner.lock().await;
            let session = &mut guard.session;
            let Some(username) = session.username.clone() else {
                return Ok(ActionStatus::Skipped);
            };
            if session.page_in_flight {
                debug!(%username, "lookup: page already in flight");
                return Ok(ActionStatus::Skipped);
            }
            let Some(cursor) = session.cursor.as_mut() else {
                return Ok(ActionStatus::Skipped);
            };
            if !cursor.more_available() {
                return Ok(ActionStatus::Skipped);
            }

            let page = cursor.advance();
            session.page_in_flight = true;
            let generation = session.generation;
            guard.view.loading = true;
            (generation, username, page)
        };

        info!(%username, page, generation, "lookup: loading more repositories");
        let repos = self
            .api
            .fetch_repositories(&username, page, PAGE_SIZE)
            .await;

        let mut guard = self.inner.lock().await;
        if guard.session.generation != generation {
            debug!(%username, page, generation, "lookup: dropping superseded page");
            return Ok(ActionStatus::Discarded);
        }
        let state = &mut *guard;
        state.session.page_in_flight = false;

        let Some(cursor) = state.session.cursor.as_mut() else {
            state.view.loading = false;
            return Ok(ActionStatus::Skipped);
        };

        match repos {
            Ok(repos) => {
                render::render_repositories(&mut state.view.repositories, &repos, true);
                cursor.record_page(repos.len());
                state.view.loading = false;
                state.view.show_more = cursor.more_available();
                info!(
                    %username,
                    page,
                    appended = repos.len(),
                    more = state.view.show_more,
                    "lookup: page appended"
                );
                Ok(ActionStatus::Completed)
            }
            Err(err) => {
                warn!(%username, page, error = ?err, "lookup: page fetch failed");
                cursor.exhaust();
                state.view.fail(&err);
                Err(err)
            }
        }
    }

    /// Waits for the outstanding heatmap probe, if one was started.
    pub async fn wait_for_heatmap(&self) {
        let task = self.heatmap_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
