use std::collections::BTreeMap;

/// Request parameters parsed from a query string.
///
/// Keys are kept in a sorted map so [`QueryParams::canonical`] does not depend on the order the
/// client sent them in. Values of a repeated key keep their request order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `application/x-www-form-urlencoded` query text.
    ///
    /// A leading `?` is ignored. `+` decodes to a space and malformed percent escapes are kept
    /// literally, so parsing never fails.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut out = Self::new();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            out.append(key.into_owned(), value.into_owned());
        }
        out
    }

    /// Add one value for `key` after any existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.entry(key.into()).or_default().push(value.into());
    }

    /// First value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value of `key` when present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Whether no parameters were given.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Canonical encoding: keys sorted byte-wise, values in request order, form-urlencoded.
    ///
    /// Case is preserved, so `First=a` and `first=a` encode differently.
    pub fn canonical(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.pairs {
            for value in values {
                ser.append_pair(key, value);
            }
        }
        ser.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/identity/query.rs"]
mod tests;
