//! Host address bar: the URL fragment is the only durable session storage.

/// Access to the page location of the host.
pub trait AddressBar: Send + Sync {
    /// The current fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;

    /// Rewrites the fragment in place, replacing the current history entry
    /// instead of pushing a new one.
    fn replace_fragment(&self, fragment: &str);

    /// The full current URL including the fragment.
    fn href(&self) -> String;

    /// Value of a query parameter of the current URL.
    fn query_param(&self, name: &str) -> Option<String> {
        let href = self.href();
        let query = href.split('#').next()?.split_once('?')?.1;
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| value.to_string())
        })
    }
}

/// Splits a URL or bare token into (URL without fragment, fragment).
pub fn split_fragment(input: &str) -> (&str, Option<&str>) {
    match input.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment).filter(|f| !f.is_empty())),
        None => (input, None),
    }
}

/// Composes a shareable link from a page URL and a session token.
pub fn share_url(page_url: &str, token: &str) -> String {
    let (base, _) = split_fragment(page_url);
    format!("{}#{}", base, token)
}
