use reqwest::Url;

use crate::error::CoreError;

/// Path the node serves JSON-RPC on when the caller gives only host and port.
const DEFAULT_RPC_PATH: &str = "rpc";

pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
) -> Result<Option<(String, String)>, CoreError> {
    match (user, pass) {
        (Some(u), Some(p)) => Ok(Some((u.to_owned(), p.to_owned()))),
        (Some(_), None) | (None, Some(_)) => Err(CoreError::InvalidConfig(
            "both rpc user and rpc pass must be set together".to_owned(),
        )),
        (None, None) => Ok(None),
    }
}

pub(super) fn parse_connection(connection: &str) -> Result<Url, CoreError> {
    let mut parsed = Url::parse(connection).map_err(|e| {
        CoreError::InvalidConfig(format!(
            "invalid connection `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::InvalidConfig(format!(
                "unsupported connection scheme `{other}`; expected http or https"
            )));
        }
    }
    if parsed.path() == "/" {
        parsed.set_path(DEFAULT_RPC_PATH);
    }
    Ok(parsed)
}
