//! Parse HTTP response header lines into a [`ResponseHead`].

use super::ResponseHead;

/// Parse collected header lines. When redirects were followed the lines of
/// every hop are present; each status line starts a fresh response so only
/// the final hop's headers remain.
pub(crate) fn parse_headers<S: AsRef<str>>(lines: &[S]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(status) = parse_status_line(line) {
            head = ResponseHead {
                status: Some(status),
                ..ResponseHead::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    head.content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("accept-ranges") {
                head.accept_ranges = value.eq_ignore_ascii_case("bytes");
            }
            if name.eq_ignore_ascii_case("content-range") {
                head.content_range_start = parse_content_range_start(value);
            }
        }
    }

    head
}

/// `HTTP/1.1 206 Partial Content` → `Some(206)`.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// `bytes 100-199/200` → `Some(100)`. Unsatisfied ranges (`bytes */200`) yield `None`.
fn parse_content_range_start(value: &str) -> Option<u64> {
    let spec = value.strip_prefix("bytes")?.trim_start();
    let (start, _) = spec.split_once('-')?;
    start.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_headers_content_length_and_ranges() {
        let lines = [
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "Accept-Ranges: bytes",
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.status, Some(200));
        assert_eq!(r.content_length, Some(12345));
        assert!(r.accept_ranges);
        assert!(r.content_range_start.is_none());
    }

    #[test]
    fn parse_headers_no_ranges() {
        let lines = ["HTTP/1.1 200 OK", "Content-Length: 999", "Accept-Ranges: none"];
        let r = parse_headers(&lines);
        assert_eq!(r.content_length, Some(999));
        assert!(!r.accept_ranges);
    }

    #[test]
    fn parse_headers_partial_content() {
        let lines = [
            "HTTP/1.1 206 Partial Content",
            "Content-Length: 100",
            "Content-Range: bytes 100-199/200",
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.status, Some(206));
        assert_eq!(r.content_range_start, Some(100));
    }

    #[test]
    fn parse_headers_unsatisfied_range() {
        let lines = ["HTTP/1.1 416 Range Not Satisfiable", "Content-Range: bytes */200"];
        let r = parse_headers(&lines);
        assert_eq!(r.status, Some(416));
        assert!(r.content_range_start.is_none());
    }

    #[test]
    fn parse_headers_keeps_final_redirect_hop() {
        let lines = [
            "HTTP/1.1 302 Found",
            "Location: https://mirror.example.test/engine-5.3.0.7z",
            "Content-Length: 0",
            "",
            "HTTP/2 200",
            "content-length: 4096",
            "accept-ranges: bytes",
        ];
        let r = parse_headers(&lines);
        assert_eq!(r.status, Some(200));
        assert_eq!(r.content_length, Some(4096));
        assert!(r.accept_ranges);
    }

    #[test]
    fn status_line_parsing() {
        assert_eq!(parse_status_line("HTTP/1.1 404 Not Found"), Some(404));
        assert_eq!(parse_status_line("HTTP/2 200"), Some(200));
        assert_eq!(parse_status_line("Content-Length: 5"), None);
    }
}
