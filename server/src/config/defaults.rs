//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// (key, default, secret, required)
type DefTuple = (&'static str, &'static str, bool, bool);

const DEFS: &[DefTuple] = &[
    ("PORT", "8000", false, false),
    ("CACHE_BACKEND", "redis", false, false),
    ("REDIS_URL", "redis://127.0.0.1:6379", true, false),
    ("CLIENT_ID", "", true, true),
    ("CLIENT_SECRET", "", true, true),
    ("TOKEN_EXPIRES_TIME", "4320000", false, false),
    ("STREAMER_DATA_EXPIRES_TIME", "600", false, false),
    ("REQUEST_TIMEOUT_SECS", "5", false, false),
    (
        "DEFAULT_STREAMERS",
        "thaina_,blabalbee,Smorodinova,CekLena,JowyBear,pimpka74,icytoxictv,ustepuka,\
         AlenochkaBT,ViktoriiShka,irenchik,lola_grrr,Sensoria,aisumaisu,PANGCHOM,Danucd",
        false,
        false,
    ),
    ("HELIX_BASE_URL", "https://api.twitch.tv/helix", false, false),
    ("OAUTH_TOKEN_URL", "https://id.twitch.tv/oauth2/token", false, false),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub secret: bool,
    pub required: bool,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, secret, required)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    secret,
                    required,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Keys that must be set for the service to reach Twitch.
pub fn required_keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter()
        .filter(|(_, _, _, required)| *required)
        .map(|(key, ..)| *key)
}

/// Value safe to put in a log line; secret settings are masked.
pub fn loggable<'a>(key: &str, value: &'a str) -> &'a str {
    match DEFAULT_SETTINGS.get(key) {
        Some(def) if def.secret && !value.is_empty() => "********",
        _ => value,
    }
}
