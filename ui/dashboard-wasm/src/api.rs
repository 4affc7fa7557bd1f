//! HTTP plumbing.
//!
//! Every wallet API call is a JSON `POST` carrying the auth frame's stamp
//! in the `X-Stamp` header. Errors are plain strings, wrapped by callers.

use gloo_net::http::{Request, Response};

pub const STAMP_HEADER: &str = "X-Stamp";

/// POST a JSON body with its stamp and return the raw response text.
pub async fn post_stamped(url: &str, body: String, stamp: &str) -> Result<String, String> {
    let resp = Request::post(url)
        .header("Content-Type", "application/json")
        .header(STAMP_HEADER, stamp)
        .body(body)
        .map_err(|e| format!("request build error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    read_ok(resp).await
}

/// Fetch a URL and return the body as a plain string.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    read_ok(resp).await
}

async fn read_ok(resp: Response) -> Result<String, String> {
    let text = resp
        .text()
        .await
        .map_err(|e| format!("text error: {e}"))?;
    if !resp.ok() {
        return Err(format!("{} {}: {}", resp.status(), resp.status_text(), text));
    }
    Ok(text)
}
