//! Turns URLs found in scraped HTML into absolute URLs.

/// Resolves `candidate` against the page it was found on.
///
/// The rules are plain string concatenation, applied in order:
/// absolute `http(s)://` passes through, `//host/...` borrows the base
/// scheme, `/path` borrows scheme and host, and anything else is appended to
/// the directory of the base path. Nothing is normalized or percent-encoded.
/// A base without `://` contributes scheme `http` and an empty host, so
/// malformed input yields malformed output rather than an error.
#[must_use]
pub fn resolve(candidate: &str, base_url: &str) -> String {
    if is_absolute(candidate) {
        return candidate.to_string();
    }

    let base = BaseParts::split(base_url);

    if candidate.starts_with("//") {
        return format!("{}:{candidate}", base.scheme);
    }

    if candidate.starts_with('/') {
        return format!("{}://{}{candidate}", base.scheme, base.host);
    }

    format!(
        "{}://{}{}/{candidate}",
        base.scheme,
        base.host,
        parent_dir(base.path)
    )
}

fn is_absolute(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// Scheme, host and path of the base URL, sliced out of the raw string.
#[derive(Debug, PartialEq, Eq)]
struct BaseParts<'a> {
    scheme: &'a str,
    host: &'a str,
    path: &'a str,
}

impl<'a> BaseParts<'a> {
    fn split(base_url: &'a str) -> Self {
        let Some((scheme, rest)) = base_url.split_once("://") else {
            return Self {
                scheme: "http",
                host: "",
                path: "",
            };
        };
        let scheme = if scheme.is_empty() { "http" } else { scheme };

        // Query and fragment never contribute to host or path.
        let rest = rest
            .find(['?', '#'])
            .map_or(rest, |end| &rest[..end]);
        let (authority, path) = rest
            .find('/')
            .map_or((rest, ""), |start| rest.split_at(start));

        // Credentials are not part of the host; the port is.
        let host = authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host);

        Self { scheme, host, path }
    }
}

/// Directory part of `path` without a trailing slash.
///
/// `/dir/page` gives `/dir`, `/page` and `/` give the empty string.
fn parent_dir(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    match path.rfind('/') {
        Some(idx) => path[..idx].trim_end_matches('/'),
        None => "",
    }
}
