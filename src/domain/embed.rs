// Embed options - Kiosk URL for showing a dashboard in an iframe
use serde::Deserialize;
use std::fmt;

/// A time-range bound: a relative expression such as `now-3h`, or epoch
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeBound {
    Millis(i64),
    Expr(String),
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBound::Millis(ms) => write!(f, "{}", ms),
            TimeBound::Expr(expr) => f.write_str(expr),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbedOptions {
    #[serde(default)]
    pub from: Option<TimeBound>,
    #[serde(default)]
    pub to: Option<TimeBound>,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// `{base}{path}?kiosk`, followed by whichever of from/to/refresh are set.
pub fn embed_url(base_url: &str, path: &str, options: &EmbedOptions) -> String {
    let mut url = format!("{}{}?kiosk", base_url.trim_end_matches('/'), path);

    let params = [
        ("from", options.from.as_ref().map(ToString::to_string)),
        ("to", options.to.as_ref().map(ToString::to_string)),
        ("refresh", options.refresh.clone()),
    ];
    for (key, value) in params {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(&value)));
        }
    }

    url
}
