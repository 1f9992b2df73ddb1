/// Case-insensitive substring patterns that exclude share entries by name.
///
/// Used for the conversion skip list and the rename exclusions alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    patterns: Vec<String>,
}
impl Exclusions {
    pub fn new<S: AsRef<str>>(patterns: impl IntoIterator<Item = S>) -> Self {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().to_lowercase())
            // An empty pattern would exclude everything.
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// The first pattern contained in the lowercased `name`, if any.
    pub fn matches(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.patterns.iter().find(|p| name.contains(p.as_str())).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
