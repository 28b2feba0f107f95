//! REST client for the logistics backend
//!
//! Uses shared types from agrolink-types for API responses; bodies are read as
//! text and decoded + validated there.
//! Uses web-sys fetch for WASM, reqwest for native.

use agrolink_types::{decode_shelves, decode_world, ShelfDto, ShelfType, TypesError, WorldSpec};
use thiserror::Error;

/// Failure fetching or decoding a backend resource.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Decode(#[from] TypesError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let url = format!("{}{}", self.base_url, path);

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ApiError::Transport(format!("request error: {:?}", e)))?;
        request
            .headers()
            .set("Accept", "application/json")
            .map_err(|e| ApiError::Transport(format!("header error: {:?}", e)))?;

        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Transport(format!("fetch error: {:?}", e)))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Transport("response is not a Response".into()))?;

        match resp.status() {
            404 => return Err(ApiError::NotFound(url)),
            status if !resp.ok() => return Err(ApiError::Status { status, url }),
            _ => {}
        }

        let text = JsFuture::from(
            resp.text()
                .map_err(|e| ApiError::Transport(format!("text promise error: {:?}", e)))?,
        )
        .await
        .map_err(|e| ApiError::Transport(format!("body error: {:?}", e)))?;

        text.as_string()
            .ok_or_else(|| ApiError::Transport("body is not text".into()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = reqwest::Client::new()
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// Fetch the stored world of a logistics center.
    pub async fn get_world(&self, center_id: &str) -> Result<WorldSpec, ApiError> {
        let body = self.get_text(&world_path(center_id)).await?;
        Ok(decode_world(&body)?)
    }

    /// Fetch shelves of a logistics center, optionally of one type.
    pub async fn get_shelves(
        &self,
        center_id: &str,
        shelf_type: Option<ShelfType>,
    ) -> Result<Vec<ShelfDto>, ApiError> {
        let body = self.get_text(&shelves_path(center_id, shelf_type)).await?;
        Ok(decode_shelves(&body)?)
    }
}

fn world_path(center_id: &str) -> String {
    format!("/api/logistics-centers/{}/world", center_id)
}

fn shelves_path(center_id: &str, shelf_type: Option<ShelfType>) -> String {
    match shelf_type {
        Some(t) => format!(
            "/api/logistics-centers/{}/shelves?type={}",
            center_id,
            t.as_str()
        ),
        None => format!("/api/logistics-centers/{}/shelves", center_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_paths() {
        assert_eq!(world_path("main"), "/api/logistics-centers/main/world");
        assert_eq!(
            shelves_path("main", Some(ShelfType::Picker)),
            "/api/logistics-centers/main/shelves?type=picker"
        );
        assert_eq!(shelves_path("c1", None), "/api/logistics-centers/c1/shelves");
    }

    #[test]
    fn trims_trailing_slash() {
        assert_eq!(ApiClient::new("http://localhost:8080/").base_url(), "http://localhost:8080");
    }

    #[test]
    fn decode_errors_convert() {
        let err: ApiError = decode_world("{").unwrap_err().into();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(!err.is_not_found());
    }
}
