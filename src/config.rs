use std::env;

/// Which media platform backs the audio endpoint
#[derive(Clone, Debug, PartialEq)]
pub enum MediaPlatform {
    /// YouTube via the Innertube JSON API (default)
    YouTube,
    /// SoundCloud via api-v2 (requires a client id)
    SoundCloud,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub is_dev: bool,
    /// Platform backing /api/audio
    pub platform: MediaPlatform,
    /// Base URL for the YouTube Innertube API (overridable for tests)
    pub youtube_base_url: String,
    /// Base URL for the SoundCloud api-v2 API (overridable for tests)
    pub soundcloud_base_url: String,
    /// SoundCloud api-v2 client id (required when platform = SoundCloud)
    pub soundcloud_client_id: Option<String>,
    /// Maximum number of search results requested per query
    pub search_limit: u32,
    /// Directory holding the static timer frontend
    pub www_root: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT is required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        let soundcloud_client_id = env::var("SOUNDCLOUD_CLIENT_ID").ok();

        // Platform: explicit MEDIA_PLATFORM, or auto-detect from the presence
        // of a SoundCloud client id.
        let platform = match env::var("MEDIA_PLATFORM")
            .unwrap_or_else(|_| "auto".to_string())
            .to_lowercase()
            .as_str()
        {
            "youtube" => MediaPlatform::YouTube,
            "soundcloud" => MediaPlatform::SoundCloud,
            _ => {
                if soundcloud_client_id.is_some() {
                    MediaPlatform::SoundCloud
                } else {
                    MediaPlatform::YouTube
                }
            }
        };

        if platform == MediaPlatform::SoundCloud && soundcloud_client_id.is_none() {
            return Err("SOUNDCLOUD_CLIENT_ID is required when MEDIA_PLATFORM=soundcloud".into());
        }

        let youtube_base_url =
            env::var("YOUTUBE_API_URL").unwrap_or_else(|_| "https://www.youtube.com".to_string());

        let soundcloud_base_url = env::var("SOUNDCLOUD_API_URL")
            .unwrap_or_else(|_| "https://api-v2.soundcloud.com".to_string());

        for (name, value) in [
            ("YOUTUBE_API_URL", &youtube_base_url),
            ("SOUNDCLOUD_API_URL", &soundcloud_base_url),
        ] {
            url::Url::parse(value).map_err(|e| format!("{name} is not a valid URL: {e}"))?;
        }

        let search_limit: u32 = env::var("SEARCH_LIMIT")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .unwrap_or(20);

        let www_root = env::var("WWW_ROOT").unwrap_or_else(|_| "www".to_string());

        Ok(Config {
            port,
            is_dev,
            platform,
            youtube_base_url,
            soundcloud_base_url,
            soundcloud_client_id,
            search_limit,
            www_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all env-var tests to prevent races between parallel test threads.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Set env vars, run `f`, then restore original state.
    ///
    /// `set` — vars to set; `unset` — vars to remove before running `f`.
    fn with_env(set: &[(&str, &str)], unset: &[&str], f: impl FnOnce()) {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());

        let save_set: Vec<(&str, Option<String>)> = set
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();
        let save_unset: Vec<(&str, Option<String>)> =
            unset.iter().map(|k| (*k, std::env::var(k).ok())).collect();

        for (k, v) in set {
            // SAFETY: serialized by ENV_LOCK — no other thread modifies env vars concurrently.
            unsafe { std::env::set_var(k, v) };
        }
        for k in unset {
            unsafe { std::env::remove_var(k) };
        }

        f();

        for (k, old) in save_set.into_iter().chain(save_unset) {
            match old {
                Some(v) => unsafe { std::env::set_var(k, v) },
                None => unsafe { std::env::remove_var(k) },
            }
        }
    }

    const ALL_VARS: &[&str] = &[
        "DEV_MODE",
        "PORT",
        "MEDIA_PLATFORM",
        "YOUTUBE_API_URL",
        "SOUNDCLOUD_API_URL",
        "SOUNDCLOUD_CLIENT_ID",
        "SEARCH_LIMIT",
        "WWW_ROOT",
    ];

    #[test]
    fn dev_mode_uses_defaults() {
        with_env(&[("DEV_MODE", "true")], &ALL_VARS[1..], || {
            let config = Config::from_env().expect("should succeed in dev mode");
            assert!(config.is_dev);
            assert_eq!(config.port, 3000);
            assert_eq!(config.platform, MediaPlatform::YouTube);
            assert_eq!(config.youtube_base_url, "https://www.youtube.com");
            assert_eq!(config.soundcloud_base_url, "https://api-v2.soundcloud.com");
            assert_eq!(config.search_limit, 20);
            assert_eq!(config.www_root, "www");
        });
    }

    #[test]
    fn prod_mode_requires_port() {
        with_env(&[], ALL_VARS, || {
            let result = Config::from_env();
            assert!(result.is_err(), "Should fail without PORT in prod mode");
        });
    }

    #[test]
    fn explicit_youtube_platform() {
        with_env(
            &[("DEV_MODE", "true"), ("MEDIA_PLATFORM", "youtube")],
            &["SOUNDCLOUD_CLIENT_ID"],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.platform, MediaPlatform::YouTube);
            },
        );
    }

    #[test]
    fn soundcloud_auto_detect_from_client_id() {
        with_env(
            &[("DEV_MODE", "true"), ("SOUNDCLOUD_CLIENT_ID", "abc123")],
            &["MEDIA_PLATFORM"],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.platform, MediaPlatform::SoundCloud);
                assert_eq!(config.soundcloud_client_id, Some("abc123".to_string()));
            },
        );
    }

    #[test]
    fn explicit_youtube_overrides_client_id() {
        with_env(
            &[
                ("DEV_MODE", "true"),
                ("SOUNDCLOUD_CLIENT_ID", "abc123"),
                ("MEDIA_PLATFORM", "youtube"),
            ],
            &[],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.platform, MediaPlatform::YouTube);
            },
        );
    }

    #[test]
    fn explicit_soundcloud_without_client_id_fails() {
        with_env(
            &[("DEV_MODE", "true"), ("MEDIA_PLATFORM", "soundcloud")],
            &["SOUNDCLOUD_CLIENT_ID"],
            || {
                let result = Config::from_env();
                assert!(result.is_err(), "Should fail without SOUNDCLOUD_CLIENT_ID");
            },
        );
    }

    #[test]
    fn upstream_base_urls_overridable() {
        with_env(
            &[
                ("DEV_MODE", "true"),
                ("YOUTUBE_API_URL", "http://127.0.0.1:9999"),
                ("SOUNDCLOUD_API_URL", "http://127.0.0.1:9998"),
            ],
            &[],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.youtube_base_url, "http://127.0.0.1:9999");
                assert_eq!(config.soundcloud_base_url, "http://127.0.0.1:9998");
            },
        );
    }

    #[test]
    fn invalid_upstream_base_url_fails() {
        with_env(
            &[("DEV_MODE", "true"), ("YOUTUBE_API_URL", "not a url")],
            &[],
            || {
                let result = Config::from_env();
                assert!(result.is_err(), "Should reject an unparseable base URL");
            },
        );
    }

    #[test]
    fn search_limit_parsed() {
        with_env(&[("DEV_MODE", "true"), ("SEARCH_LIMIT", "50")], &[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.search_limit, 50);
        });
    }

    #[test]
    fn invalid_search_limit_falls_back_to_default() {
        with_env(
            &[("DEV_MODE", "true"), ("SEARCH_LIMIT", "plenty")],
            &[],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.search_limit, 20);
            },
        );
    }
}
