// Report module: turns the server reply into the links the user cares about.

use crate::api::Reply;
use crate::config::Endpoint;
use crate::error::{Result, TransferError};
use reqwest::StatusCode;
use serde::Serialize;

/// Header some servers set with a ready-made deletion URL.
pub const DELETE_HEADER: &str = "x-url-delete";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub status: u16,
    pub download_url: String,
    pub direct_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_command: Option<String>,
}

/// Validate the reply and extract the download links.
pub fn report(reply: &Reply, endpoint: &Endpoint) -> Result<UploadResult> {
    if reply.status != StatusCode::OK {
        return Err(TransferError::UploadFailed {
            status: reply.status,
            body: reply.body.clone(),
        });
    }

    let download_url = reply.body.trim().to_string();
    let direct_url = direct_link(&download_url, &endpoint.base_url);
    // HeaderMap lookups are case-insensitive.
    let delete_command = reply
        .headers
        .get(DELETE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|token| format!("curl -X DELETE \"{}\"", token));

    Ok(UploadResult {
        status: reply.status.as_u16(),
        download_url,
        direct_url,
        delete_command,
    })
}

/// Insert `/get/` after the base URL to skip the landing page. Only the
/// first occurrence is rewritten.
pub fn direct_link(url: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    url.replacen(&format!("{}/", base), &format!("{}/get/", base), 1)
}

/// Human readable size: whole B and KB, two decimals for MB and GB.
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match size {
        s if s < KB => format!("{} B", s),
        s if s < MB => format!("{} KB", s / KB),
        s if s < GB => format!("{:.2} MB", s as f64 / MB as f64),
        s => format!("{:.2} GB", s as f64 / GB as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    fn endpoint() -> Endpoint {
        Endpoint::new("https://x.example", "u", "p")
    }

    fn reply(status: u16, body: &str, headers: HeaderMap) -> Reply {
        Reply {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536 * 1024), "1.50 MB");
    }

    #[test]
    fn test_direct_link() {
        assert_eq!(
            direct_link("https://x.example/abcd1234/file.txt", "https://x.example"),
            "https://x.example/get/abcd1234/file.txt"
        );
        // unrelated URLs are left alone
        assert_eq!(
            direct_link("https://other.example/a", "https://x.example"),
            "https://other.example/a"
        );
    }

    #[test]
    fn test_report_ok_without_delete_header() {
        let r = reply(200, "https://x.example/xyz/a.txt\n", HeaderMap::new());
        let result = report(&r, &endpoint()).unwrap();
        assert_eq!(result.download_url, "https://x.example/xyz/a.txt");
        assert_eq!(result.direct_url, "https://x.example/get/xyz/a.txt");
        assert_eq!(result.delete_command, None);
    }

    #[test]
    fn test_report_delete_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"X-Url-Delete").unwrap(),
            HeaderValue::from_static("https://x.example/xyz/a.txt/tok"),
        );
        let result = report(&reply(200, "https://x.example/xyz/a.txt", headers), &endpoint()).unwrap();
        assert_eq!(
            result.delete_command.as_deref(),
            Some("curl -X DELETE \"https://x.example/xyz/a.txt/tok\"")
        );
    }

    #[test]
    fn test_report_non_200() {
        let err = report(&reply(401, "Unauthorized\n", HeaderMap::new()), &endpoint()).unwrap_err();
        match err {
            TransferError::UploadFailed { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "Unauthorized\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_2xx_is_failure() {
        assert!(report(&reply(201, "https://x.example/a", HeaderMap::new()), &endpoint()).is_err());
    }

    #[test]
    fn test_json_omits_missing_delete_command() {
        let result = report(&reply(200, "https://x.example/a", HeaderMap::new()), &endpoint()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["download_url"], "https://x.example/a");
        assert!(json.get("delete_command").is_none());
    }
}
