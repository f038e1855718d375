use url::Url;

use crate::model::UriScheme;

/// Parse a media URL, accepting only http, https and rtmp URLs with a host.
pub fn parse_media_url(value: &str) -> Option<(Url, UriScheme)> {
    let url = Url::parse(value).ok()?;
    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }
    let scheme = match url.scheme() {
        "http" | "https" => UriScheme::Http,
        "rtmp" => UriScheme::Rtmp,
        _ => return None,
    };
    Some((url, scheme))
}

pub fn is_rtmp_url(value: &str) -> bool {
    matches!(parse_media_url(value), Some((_, UriScheme::Rtmp)))
}

/// Split `rtmp://server/app/stream?query` into the server part
/// (`rtmp://server/app`) and the stream name with its query (`stream?query`).
pub fn split_rtmp_url(url: &Url) -> Option<(String, String)> {
    let mut segments: Vec<&str> = url.path_segments()?.collect();
    let stream = segments.pop().filter(|s| !s.is_empty())?;
    let mut stream = stream.to_owned();
    if let Some(query) = url.query() {
        stream.push('?');
        stream.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        stream.push('#');
        stream.push_str(fragment);
    }

    let mut server = url.clone();
    server.set_query(None);
    server.set_fragment(None);
    let path: String = segments.iter().map(|s| format!("/{s}")).collect();
    server.set_path(&path);
    Some((server.to_string(), stream))
}

#[cfg(test)]
mod test {
    use claims::{assert_none, assert_some};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn malformed_urls_are_rejected() {
        for value in [
            "http://exa mple.com/a b.mp4",
            "https://[::1",
            "http://:::/x",
            "rtmp:stream",
            "ftp://example.com/a.mp4",
            "not a url",
        ] {
            assert_none!(parse_media_url(value), "{value}");
        }
        let (_, scheme) = assert_some!(parse_media_url("HTTPS://cdn.example.com/a.mp4"));
        assert_eq!(scheme, UriScheme::Http);
        assert!(is_rtmp_url("rtmp://stream.example.com:1935/vod"));
        assert!(!is_rtmp_url("http://not-rtmp"));
        assert!(!is_rtmp_url("rtmp://exa mple/vod"));
    }

    #[test]
    fn rtmp_split_keeps_query_with_stream() {
        let url = Url::parse("rtmp://host/app/stream?token=a/b").unwrap();
        let (server, stream) = assert_some!(split_rtmp_url(&url));
        assert_eq!(server, "rtmp://host/app");
        assert_eq!(stream, "stream?token=a/b");

        let url = Url::parse("rtmp://host:1935/live/app/talk").unwrap();
        assert_eq!(
            split_rtmp_url(&url),
            Some(("rtmp://host:1935/live/app".to_owned(), "talk".to_owned()))
        );
    }

    #[test]
    fn rtmp_without_stream_is_not_split() {
        for value in ["rtmp://host/app/", "rtmp://host"] {
            let url = Url::parse(value).unwrap();
            assert_none!(split_rtmp_url(&url), "{value}");
        }
    }
}
