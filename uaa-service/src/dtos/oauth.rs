use serde::Deserialize;

/// Parameters of a token request; accepted from the query string or a form
/// body. All optional here so the handler can report which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenParams {
    pub grant_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}
