// Client for the WeChat mini-program server-side API.
// https://developers.weixin.qq.com/miniprogram/dev/OpenApiDoc/user-login/code2Session.html

pub mod models;

use reqwest::Client;
use thiserror::Error;

pub use crate::models::{Code2SessionResponse, WeappSession};

const CODE2SESSION_URL: &str = "https://api.weixin.qq.com/sns/jscode2session";

#[derive(Debug, Error)]
pub enum WeappError {
    /// WeChat answered with an in-band error code (e.g. 40029 invalid js_code).
    #[error("wechat error {errcode}: {errmsg}")]
    Api { errcode: i64, errmsg: String },

    /// HTTP 200 but neither `openid` nor `errcode` present.
    #[error("malformed code2session response")]
    MalformedResponse,

    #[error("request to wechat failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct WeappOptions {
    pub app_id: String,
    pub app_secret: String,
}

/// Thin client over the mini-program login exchange.
#[derive(Debug, Clone)]
pub struct WeappClient {
    options: WeappOptions,
    client: Client,
}

impl WeappClient {
    pub fn new(options: WeappOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Exchange a one-time login code (`wx.login` js_code) for the user's
    /// stable openid and the session key.
    pub async fn code_to_session(&self, js_code: &str) -> Result<WeappSession, WeappError> {
        let response = self
            .client
            .get(CODE2SESSION_URL)
            .query(&[
                ("appid", self.options.app_id.as_str()),
                ("secret", self.options.app_secret.as_str()),
                ("js_code", js_code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Code2SessionResponse>().await?;

        // errcode 0 means success; WeChat omits the field entirely on most
        // successful responses, so treat both the same.
        if let Some(errcode) = body.errcode.filter(|&c| c != 0) {
            return Err(WeappError::Api {
                errcode,
                errmsg: body.errmsg.unwrap_or_default(),
            });
        }

        match (body.openid, body.session_key) {
            (Some(openid), Some(session_key)) => Ok(WeappSession {
                openid,
                session_key,
                unionid: body.unionid,
            }),
            _ => Err(WeappError::MalformedResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_parses() {
        let body: Code2SessionResponse =
            serde_json::from_str(r#"{"errcode":40029,"errmsg":"invalid code"}"#).unwrap();
        assert_eq!(body.errcode, Some(40029));
        assert!(body.openid.is_none());
    }

    #[test]
    fn success_response_parses() {
        let body: Code2SessionResponse =
            serde_json::from_str(r#"{"openid":"oid1","session_key":"sk1"}"#).unwrap();
        assert_eq!(body.openid.as_deref(), Some("oid1"));
        assert_eq!(body.session_key.as_deref(), Some("sk1"));
        assert!(body.errcode.is_none());
    }
}
