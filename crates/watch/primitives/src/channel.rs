use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Scheme and host compare case-insensitively, the channel token keeps its case.
static CHANNEL_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:https?://(?:www\.)?twitch\.tv)/(?P<channel>[A-Za-z0-9_]+)/?(?:\?.*)?$")
        .expect("channel url pattern is valid")
});

static CHANNEL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("channel token pattern is valid"));

/// The broadcaster token taken from a Twitch channel URL, e.g. `pokimane` in
/// `https://www.twitch.tv/pokimane`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Display)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

/// A relayed token that is not a valid channel name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid channel name: {0:?}")]
pub struct InvalidChannel(pub String);

impl TryFrom<String> for ChannelName {
    type Error = InvalidChannel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if CHANNEL_TOKEN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidChannel(value))
        }
    }
}

impl TryFrom<&str> for ChannelName {
    type Error = InvalidChannel;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl From<ChannelName> for String {
    fn from(channel: ChannelName) -> Self {
        channel.0
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the channel from a URL of the form
/// `http(s)://[www.]twitch.tv/<channel>[/][?query]`.
///
/// Anything else, including extra path segments such as `/pokimane/videos`, yields `None`.
pub fn match_channel(url: &str) -> Option<ChannelName> {
    CHANNEL_URL
        .captures(url)
        .and_then(|captures| captures.name("channel"))
        .map(|channel| ChannelName(channel.as_str().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_compile() {
        assert!(Lazy::force(&CHANNEL_URL).is_match("https://twitch.tv/a"));
        assert!(Lazy::force(&CHANNEL_TOKEN).is_match("a_1"));
    }

    fn channel(url: &str) -> Option<String> {
        match_channel(url).map(String::from)
    }

    #[test]
    fn matches_bare_and_www_hosts() {
        assert_eq!(channel("https://twitch.tv/pokimane").as_deref(), Some("pokimane"));
        assert_eq!(channel("https://www.twitch.tv/pokimane").as_deref(), Some("pokimane"));
        assert_eq!(channel("http://www.twitch.tv/xqc").as_deref(), Some("xqc"));
    }

    #[test]
    fn allows_trailing_slash_and_query() {
        assert_eq!(channel("https://www.twitch.tv/forsen/").as_deref(), Some("forsen"));
        assert_eq!(
            channel("https://www.twitch.tv/forsen?referrer=raid").as_deref(),
            Some("forsen")
        );
        assert_eq!(channel("https://twitch.tv/forsen/?a=1&b=2").as_deref(), Some("forsen"));
    }

    #[test]
    fn keeps_token_case_and_word_characters() {
        assert_eq!(channel("https://www.twitch.tv/Some_User42").as_deref(), Some("Some_User42"));
    }

    #[test]
    fn host_is_case_insensitive() {
        assert_eq!(channel("HTTPS://WWW.Twitch.TV/pokimane").as_deref(), Some("pokimane"));
    }

    #[test]
    fn rejects_non_channel_urls() {
        for url in [
            "https://www.twitch.tv/",
            "https://www.twitch.tv",
            "https://www.twitch.tv/pokimane/videos",
            "https://www.twitch.tv/directory/category/just-chatting",
            "https://m.twitch.tv/pokimane",
            "https://www.youtube.com/pokimane",
            "https://twitch.tv.evil.com/pokimane",
            "ftp://twitch.tv/pokimane",
            "twitch.tv/pokimane",
            "https://www.twitch.tv/poki-mane",
            "https://www.twitch.tv/pokimane#chat",
            " https://www.twitch.tv/pokimane",
            "",
        ] {
            assert_eq!(channel(url), None, "{url} should not match");
        }
    }

    #[test]
    fn validates_relayed_tokens() {
        assert!(ChannelName::try_from("summit1g").is_ok());
        assert_eq!(
            ChannelName::try_from("not a channel"),
            Err(InvalidChannel("not a channel".to_owned()))
        );
        assert!(ChannelName::try_from("").is_err());
    }

    #[test]
    fn deserialization_checks_the_token() {
        let ok: Result<ChannelName, _> = serde_json::from_str("\"shroud\"");
        assert_eq!(ok.map(String::from).ok().as_deref(), Some("shroud"));

        let bad: Result<ChannelName, _> = serde_json::from_str("\"../etc\"");
        assert!(bad.is_err());
    }
}
