/// Per-session state owned by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    last_city: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call after every successful dashboard load.
    pub fn record_success(&mut self, city: &str) {
        self.last_city = Some(city.to_string());
    }

    pub fn last_searched(&self) -> Option<&str> {
        self.last_city.as_deref()
    }
}
