/// Filters for the public session list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQuery {
    /// Include sessions tagged not-suitable-for-minors.
    pub nsfm: bool,
    /// Comma separated protocol versions.
    pub protocol: Option<String>,
    /// Title substring.
    pub title: Option<String>,
}

impl SessionQuery {
    /// Query string pairs in the order the server documents them.
    ///
    /// Unset filters are sent as empty values, which the server treats as
    /// "no filter".
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("protocol", self.protocol.clone().unwrap_or_default()),
            ("title", self.title.clone().unwrap_or_default()),
            (
                "nsfm",
                if self.nsfm { "true" } else { "false" }.to_string(),
            ),
        ]
    }
}
