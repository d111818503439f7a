use common::models::{AppUpdate, CollectedNft, LeaderboardUser, Profile, UserStats};
use common::supabase::{Backend, BackendError};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::feed;
use crate::limiter::{RefreshGate, REFRESH_COOLDOWN};

pub const RECENT_LIMIT: u32 = 5;
pub const LEADERBOARD_LIMIT: u32 = 5;

// Everything the home screen renders. Each field is owned by exactly one of
// the concurrent fetches; `loading` flips false only once all of them have
// settled.
#[derive(Debug, Default)]
pub struct HomeState {
    pub stats: Option<UserStats>,
    pub recent: Vec<CollectedNft>,
    pub profile: Option<Profile>,
    pub leaderboard: Vec<LeaderboardUser>,
    pub updates: Vec<AppUpdate>,
    pub loading: bool,
}

pub struct HomeScreen {
    pub backend: Backend,
    pub user_id: Uuid,
    pub state: HomeState,
    gate: RefreshGate,
}

impl HomeScreen {
    pub fn new(backend: Backend, user_id: Uuid) -> Self {
        HomeScreen {
            backend,
            user_id,
            state: HomeState::default(),
            gate: RefreshGate::new(REFRESH_COOLDOWN),
        }
    }

    // Mount-time load: always runs, counts as an accepted refresh
    pub async fn load(&mut self) {
        self.gate.begin();
        self.run_fetch().await;
    }

    // Pull-to-refresh: silently dropped inside the cooldown window
    pub async fn refresh(&mut self) {
        if !self.gate.try_begin() {
            self.state.loading = false;
            return;
        }
        self.run_fetch().await;
    }

    async fn run_fetch(&mut self) {
        self.state = HomeState {
            loading: true,
            ..Default::default()
        };

        // Five independent reads; none blocks the others, and a failure in
        // one leaves only its own slice empty.
        let (stats, recent, profile, leaderboard, updates) = tokio::join!(
            fetch_or_create_stats(&self.backend, self.user_id),
            fetch_recent_collections(&self.backend, self.user_id),
            fetch_profile(&self.backend),
            fetch_leaderboard(&self.backend),
            fetch_active_updates(&self.backend),
        );

        self.state.stats = stats;
        self.state.recent = recent;
        self.state.profile = profile;
        self.state.leaderboard = leaderboard;
        self.state.updates = updates;
        self.state.loading = false;
    }
}

pub async fn fetch_or_create_stats(backend: &Backend, user_id: Uuid) -> Option<UserStats> {
    match load_stats(backend, user_id).await {
        Ok(stats) => Some(stats),
        Err(err) => {
            warn!("Failed to fetch user stats: {}", err);
            None
        }
    }
}

async fn load_stats(backend: &Backend, user_id: Uuid) -> Result<UserStats, BackendError> {
    let user_filter = format!("eq.{}", user_id);
    match backend
        .select_single("user_stats", &[("select", "*"), ("user_id", &user_filter)])
        .await
    {
        Ok(stats) => Ok(stats),
        // First open for a brand-new user: provision the zeroed row and
        // adopt whatever the backend handed back. The unique constraint on
        // user_id is the only duplicate guard.
        Err(BackendError::RowNotFound) => {
            info!("No stats row for {}, creating defaults", user_id);
            backend.insert("user_stats", &UserStats::fresh(user_id)).await
        }
        Err(err) => Err(err),
    }
}

pub async fn fetch_recent_collections(backend: &Backend, user_id: Uuid) -> Vec<CollectedNft> {
    let user_filter = format!("eq.{}", user_id);
    let limit = RECENT_LIMIT.to_string();
    let result: Result<Vec<CollectedNft>, _> = backend
        .select(
            "user_nfts",
            &[
                ("select", "*,nfts(*)"),
                ("user_id", &user_filter),
                ("order", "collected_at.desc"),
                ("limit", &limit),
            ],
        )
        .await;

    match result {
        Ok(rows) => rows.into_iter().map(CollectedNft::normalize).collect(),
        Err(err) => {
            warn!("Failed to fetch recent collections: {}", err);
            Vec::new()
        }
    }
}

pub async fn fetch_profile(backend: &Backend) -> Option<Profile> {
    match backend.profile().await {
        Ok(profile) => Some(profile),
        Err(err) => {
            warn!("Failed to refresh profile: {}", err);
            None
        }
    }
}

pub async fn fetch_leaderboard(backend: &Backend) -> Vec<LeaderboardUser> {
    let result: Result<Vec<LeaderboardUser>, _> = backend
        .rpc("get_leaderboard", &json!({ "limit_count": LEADERBOARD_LIMIT }))
        .await;

    match result {
        Ok(rows) => rows,
        Err(err) => {
            warn!("Failed to fetch leaderboard: {}", err);
            Vec::new()
        }
    }
}

pub async fn fetch_active_updates(backend: &Backend) -> Vec<AppUpdate> {
    let result: Result<Vec<AppUpdate>, _> = backend
        .select(
            "app_updates",
            &[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "priority.desc,created_at.desc"),
            ],
        )
        .await;

    match result {
        Ok(rows) => feed::shape(rows),
        Err(err) => {
            warn!("Failed to fetch app updates: {}", err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_starts_empty_and_not_loading() {
        let state = HomeState::default();
        assert!(state.stats.is_none());
        assert!(state.recent.is_empty());
        assert!(state.profile.is_none());
        assert!(state.leaderboard.is_empty());
        assert!(state.updates.is_empty());
        assert!(!state.loading);
    }
}
