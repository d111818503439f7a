use anyhow::Context;
use common::models::Nft;
use common::supabase::{Backend, BackendError, MODELS_BUCKET, THUMBNAILS_BUCKET};
use serde_json::json;
use tracing::{error, info};

use crate::gltf;
use crate::thumbs;

pub struct BatchOutcome {
    job: &'static str,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchOutcome {
    fn new(job: &'static str) -> Self {
        BatchOutcome {
            job,
            processed: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn log_summary(&self) {
        info!(
            "{}: {} processed, {} skipped, {} failed",
            self.job, self.processed, self.skipped, self.failed
        );
    }
}

// Only glTF-family assets get the 3D treatment; everything else on the row
// is flat artwork
pub fn is_model_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".glb") || lower.ends_with(".gltf")
}

// Storage keys are the URL-decoded basename of the object path
pub fn object_key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let basename = path.rsplit('/').next()?;
    if basename.is_empty() {
        return None;
    }
    urlencoding::decode(basename)
        .ok()
        .map(|decoded| decoded.into_owned())
}

pub fn thumbnail_key_for(model_key: &str) -> String {
    let stem = model_key
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(model_key);
    format!("{}.png", stem)
}

async fn list_nfts(backend: &Backend) -> Result<Vec<Nft>, BackendError> {
    backend
        .select("nfts", &[("select", "*"), ("order", "created_at.asc")])
        .await
}

// Shared walk: rows without a glTF-family asset URL are skipped and logged,
// a failing row is logged and never stops the rest. Strictly sequential;
// these jobs run rarely and have no reason to race the storage API.
async fn for_each_model<F, Fut>(
    backend: &Backend,
    job: &'static str,
    mut handle: F,
) -> anyhow::Result<BatchOutcome>
where
    F: FnMut(Nft, String) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    let rows = list_nfts(backend).await?;
    info!("{}: {} rows to consider", job, rows.len());

    let mut outcome = BatchOutcome::new(job);
    for nft in rows {
        let Some(url) = nft.image_url.clone() else {
            info!("Skipping {} (no asset URL)", nft.name);
            outcome.skipped += 1;
            continue;
        };
        if !is_model_url(&url) {
            info!("Skipping {} (not a 3D model)", nft.name);
            outcome.skipped += 1;
            continue;
        }

        let name = nft.name.clone();
        match handle(nft, url).await {
            Ok(()) => outcome.processed += 1,
            Err(err) => {
                error!("{}: {} failed: {:#}", job, name, err);
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

pub async fn inspect_models(backend: &Backend) -> anyhow::Result<BatchOutcome> {
    for_each_model(backend, "inspect", |nft, url| async move {
        let key = object_key_from_url(&url)
            .with_context(|| format!("no object key in {}", url))?;
        let bytes = backend.download_object(MODELS_BUCKET, &key).await?;
        let summary = gltf::summarize(&bytes)
            .with_context(|| format!("unreadable model {}", key))?;
        info!("{}: {}", nft.name, summary);
        Ok(())
    })
    .await
}

pub async fn generate_thumbnails(backend: &Backend) -> anyhow::Result<BatchOutcome> {
    for_each_model(backend, "thumbnails", |nft, url| async move {
        let key = object_key_from_url(&url)
            .with_context(|| format!("no object key in {}", url))?;

        // Pull and parse the model first so rows with broken assets fail
        // here instead of getting a thumbnail that points at garbage
        let bytes = backend.download_object(MODELS_BUCKET, &key).await?;
        gltf::summarize(&bytes).with_context(|| format!("unreadable model {}", key))?;

        let png = thumbs::encode_png(&thumbs::render_placeholder(thumbs::THUMBNAIL_SIZE))?;
        let thumb_key = thumbnail_key_for(&key);
        backend
            .upload_object(THUMBNAILS_BUCKET, &thumb_key, png, "image/png")
            .await?;

        let thumb_url = backend.public_object_url(THUMBNAILS_BUCKET, &thumb_key);
        write_thumbnail_url(backend, &nft, &thumb_url).await?;
        info!("{}: thumbnail at {}", nft.name, thumb_url);
        Ok(())
    })
    .await
}

// Recovery path for rows that lost their URL after thumbnails were already
// uploaded: recompute the public URL without touching storage
pub async fn backfill_thumbnail_urls(backend: &Backend) -> anyhow::Result<BatchOutcome> {
    for_each_model(backend, "backfill", |nft, url| async move {
        let key = object_key_from_url(&url)
            .with_context(|| format!("no object key in {}", url))?;
        let thumb_url = backend.public_object_url(THUMBNAILS_BUCKET, &thumbnail_key_for(&key));
        write_thumbnail_url(backend, &nft, &thumb_url).await?;
        info!("{}: thumbnail_url -> {}", nft.name, thumb_url);
        Ok(())
    })
    .await
}

async fn write_thumbnail_url(
    backend: &Backend,
    nft: &Nft,
    thumb_url: &str,
) -> Result<(), BackendError> {
    let id_filter = format!("eq.{}", nft.id);
    backend
        .update(
            "nfts",
            &[("id", &id_filter)],
            &json!({ "thumbnail_url": thumb_url }),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_urls_are_matched_by_extension() {
        assert!(is_model_url("https://cdn.example.com/m/fox.glb"));
        assert!(is_model_url("https://cdn.example.com/m/fox.GLTF"));
        assert!(is_model_url("https://cdn.example.com/m/fox.glb?download=1"));
        assert!(!is_model_url("https://cdn.example.com/m/fox.png"));
        assert!(!is_model_url("https://cdn.example.com/m/fox.glb.png"));
    }

    #[test]
    fn object_keys_are_decoded_basenames() {
        assert_eq!(
            object_key_from_url("https://p.supabase.co/storage/v1/object/public/nft-models/harbor%20lion.glb"),
            Some("harbor lion.glb".to_string())
        );
        assert_eq!(
            object_key_from_url("https://cdn.example.com/m/fox.glb?download=1"),
            Some("fox.glb".to_string())
        );
        assert_eq!(object_key_from_url("https://cdn.example.com/m/"), None);
    }

    #[test]
    fn thumbnail_keys_swap_the_extension() {
        assert_eq!(thumbnail_key_for("fox.glb"), "fox.png");
        assert_eq!(thumbnail_key_for("harbor lion.gltf"), "harbor lion.png");
        assert_eq!(thumbnail_key_for("no-extension"), "no-extension.png");
    }

    #[test]
    fn exactly_the_model_rows_are_eligible() {
        let urls = [
            Some("https://cdn.example.com/a.glb"),
            Some("https://cdn.example.com/b.png"),
            None,
            Some("https://cdn.example.com/c.gltf"),
            Some("https://cdn.example.com/d.jpg"),
        ];
        let eligible = urls
            .iter()
            .filter(|url| url.map(is_model_url).unwrap_or(false))
            .count();
        assert_eq!(eligible, 2);
    }
}
