// Best-effort handoff to a public web viewer that renders glTF-family
// assets given a URL. No contract beyond that; if the viewer is down the
// link simply doesn't render.
const VIEWER_BASE_URL: &str = "https://3dviewer.net/#model=";

pub fn viewer_url(asset_url: &str) -> String {
    format!("{}{}", VIEWER_BASE_URL, urlencoding::encode(asset_url))
}
