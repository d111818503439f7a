use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::impl_enum_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl_enum_text!(
    Rarity,
    Common => "common",
    Rare => "rare",
    Epic => "epic",
    Legendary => "legendary",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Announcement,
    Event,
    Update,
    #[serde(other)]
    Other,
}

impl_enum_text!(
    UpdateKind,
    Announcement => "announcement",
    Event => "event",
    Update => "update",
    Other => "other",
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: Uuid,
    pub total_nfts: i32,
    pub common_nfts: i32,
    pub rare_nfts: i32,
    pub epic_nfts: i32,
    pub legendary_nfts: i32,
    pub level: i32,
    pub experience: i32,
    pub daily_streak: i32,
    pub total_distance_km: f64,
    pub nfts_today: i32,
    pub nfts_this_week: i32,
    pub coins: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    // The row inserted the first time a brand-new user opens the home screen.
    pub fn fresh(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_nfts: 0,
            common_nfts: 0,
            rare_nfts: 0,
            epic_nfts: 0,
            legendary_nfts: 0,
            level: 1,
            experience: 0,
            daily_streak: 0,
            total_distance_km: 0.0,
            nfts_today: 0,
            nfts_this_week: 0,
            coins: 0,
            rank: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nft {
    pub id: Uuid,
    pub name: String,
    pub rarity: Rarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    // Artwork image or 3D model file, depending on the item
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectedNft {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nft_id: Uuid,
    pub collected_at: DateTime<Utc>,
    // The joined item comes back under either name depending on whether the
    // query aliased the relationship. Both schemas are still live in
    // production, so both are accepted and folded into `nft`.
    #[serde(default)]
    pub nft: Option<Nft>,
    #[serde(default)]
    pub nfts: Option<Nft>,
}

impl CollectedNft {
    pub fn normalize(mut self) -> Self {
        if self.nft.is_none() {
            self.nft = self.nfts.take();
        } else {
            self.nfts = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardUser {
    pub rank: i64,
    pub user_id: Uuid,
    pub username: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUpdate {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    // Carried on every row; the row that sorts first decides for the whole
    // feed. See app::feed.
    pub section_enabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
