//! Offline asset cache
//!
//! `sw.js` precaches the manifest below on install and answers every fetch
//! from the cache first. Changing any shipped asset needs a `CACHE_NAME`
//! bump; there is no other invalidation.

/// Cache bucket name used by the service worker
pub const CACHE_NAME: &str = "vector-rocks-v1";

/// Assets precached on install
pub const PRECACHE_MANIFEST: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "./vector-rocks.js",
    "./vector-rocks_bg.wasm",
];

/// Service worker script path, relative to the page
pub const SERVICE_WORKER_PATH: &str = "./sw.js";

/// Register the service worker. Failures only disable offline play.
#[cfg(target_arch = "wasm32")]
pub fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window
        .navigator()
        .service_worker()
        .register(SERVICE_WORKER_PATH);

    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => log::info!("Service worker registered ({})", CACHE_NAME),
            Err(err) => log::warn!("Service worker registration failed: {:?}", err),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const SW_JS: &str = include_str!("../../sw.js");

    #[test]
    fn test_worker_matches_manifest() {
        assert!(SW_JS.contains(CACHE_NAME));
        for asset in PRECACHE_MANIFEST {
            assert!(SW_JS.contains(&format!("'{}'", asset)), "sw.js missing {}", asset);
        }
    }

    #[test]
    fn test_manifest_has_page_and_script() {
        assert!(PRECACHE_MANIFEST.contains(&"./index.html"));
        assert!(PRECACHE_MANIFEST.iter().any(|a| a.ends_with(".wasm")));
        assert!(PRECACHE_MANIFEST.iter().any(|a| a.ends_with(".js")));
    }
}
