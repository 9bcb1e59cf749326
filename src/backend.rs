// Backend URL helpers shared by the metadata source and the forwarder
use url::{ParseError, Url};

/// Header carrying the privileged backend credential.
pub const TOKEN_HEADER: &str = "xc-token";

/// Appends path segments to `base`, percent-encoding each one.
pub fn endpoint<'a, I>(base: &Url, segments: I) -> Result<Url, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn meta_tables_url(base: &Url, base_id: &str) -> Result<Url, ParseError> {
    endpoint(base, ["api", "v2", "meta", "bases", base_id, "tables"])
}

pub fn table_url(base: &Url, table_id: &str, rest: &str) -> Result<Url, ParseError> {
    let tail = rest.split('/').filter(|s| !s.is_empty());
    endpoint(base, ["api", "v2", "tables", table_id].into_iter().chain(tail))
}
