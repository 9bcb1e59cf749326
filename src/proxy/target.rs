use url::{form_urlencoded, Url};

use crate::backend;
use crate::error::ProxyError;
use crate::filter::{check_nesting, FilterDirective};

/// Where a proxied request goes and what row filter it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget {
    pub table_id: String,
    pub url: Url,
    pub filtered: bool,
}

/// Builds `{base}/api/v2/tables/{table_id}/{rest}?{query}`.
///
/// Without a directive the caller's query string is passed through verbatim.
/// With one, every caller `where` is folded into a single merged `where` so the
/// ownership clause is always present and always ANDed. A caller `where` with
/// unbalanced parentheses is rejected rather than forwarded.
pub fn compose_target(
    base: &Url,
    table_id: &str,
    rest: &str,
    query: Option<&str>,
    filter: Option<&FilterDirective>,
) -> Result<ProxyTarget, ProxyError> {
    let mut url = backend::table_url(base, table_id, rest)?;

    match filter {
        None => url.set_query(query.filter(|q| !q.is_empty())),
        Some(directive) => {
            let mut caller_where = Vec::new();
            let mut pairs = Vec::new();
            for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
                if key == "where" {
                    if !value.trim().is_empty() {
                        check_nesting(&value)?;
                        caller_where.push(value.into_owned());
                    }
                } else {
                    pairs.push((key.into_owned(), value.into_owned()));
                }
            }

            let existing = (!caller_where.is_empty()).then(|| caller_where.join("~and"));
            pairs.push(("where".to_string(), directive.merge_where(existing.as_deref())?));

            url.set_query(None);
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }

    Ok(ProxyTarget {
        table_id: table_id.to_string(),
        url,
        filtered: filter.is_some(),
    })
}
