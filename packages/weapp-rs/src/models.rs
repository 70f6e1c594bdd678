use serde::Deserialize;

/// Raw response body of the `jscode2session` endpoint.
///
/// WeChat reports failures in-band: a successful response carries
/// `openid` + `session_key`, a failed one carries `errcode` + `errmsg`
/// (both shapes come back with HTTP 200).
#[derive(Debug, Clone, Deserialize)]
pub struct Code2SessionResponse {
    pub openid: Option<String>,
    pub session_key: Option<String>,
    pub unionid: Option<String>,
    pub errcode: Option<i64>,
    pub errmsg: Option<String>,
}

/// A resolved mini-program session.
#[derive(Debug, Clone)]
pub struct WeappSession {
    pub openid: String,
    pub session_key: String,
    pub unionid: Option<String>,
}
