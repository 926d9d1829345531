use serde::Deserialize;

// Missing fields deserialize as empty strings so a half-filled form still
// reaches the handler and can be re-rendered with an error.

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

impl PostForm {
    pub fn is_complete(&self) -> bool {
        !self.subject.is_empty() && !self.content.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub content: String,
}

/// Legacy front-page form: jumps to a post by id.
#[derive(Debug, Default, Deserialize)]
pub struct BlogFrontForm {
    #[serde(default)]
    pub id: String,
}
