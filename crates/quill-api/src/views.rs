//! Page view-models. Each page is a plain struct built by its handler and
//! turned into HTML by `render()`; nothing is looked up while rendering.
//! All interpolated text is escaped by maud.

use axum::response::Html;
use maud::{DOCTYPE, Markup, html};

use quill_types::models::{Comment, Post};

use crate::validation::SignupErrors;

/// Body text with its line breaks kept as `<br>`.
fn text_with_breaks(text: &str) -> Markup {
    html! {
        @for (i, line) in text.lines().enumerate() {
            @if i > 0 { br; }
            (line)
        }
    }
}

fn layout(user: Option<&str>, title: &str, body: Markup) -> Html<String> {
    let page = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                header {
                    a.main-title href="/blog" { "CS 253 Blog" }
                    div.login-area {
                        @if let Some(name) = user {
                            span.user { (name) }
                            " (" a href="/logout" { "logout" } ")"
                        } @else {
                            a href="/login" { "login" }
                            " | "
                            a href="/signup" { "signup" }
                        }
                    }
                }
                main { (body) }
            }
        }
    };
    Html(page.into_string())
}

fn error_line(error: Option<&str>) -> Markup {
    html! {
        @if let Some(e) = error {
            div.error { (e) }
        }
    }
}

fn post_article(post: &Post) -> Markup {
    html! {
        article.post {
            div.post-heading {
                div.post-title { a href={ "/blog/" (post.id) } { (post.subject) } }
                div.post-date { (post.created.format("%b %d, %Y").to_string()) }
            }
            div.post-author { "by " (post.author) }
            div.post-content { (text_with_breaks(&post.content)) }
            div.post-likes { (post.likes.len()) " like(s)" }
        }
    }
}

pub struct FrontPage<'a> {
    pub user: Option<&'a str>,
    pub posts: &'a [Post],
}

impl FrontPage<'_> {
    pub fn render(&self) -> Html<String> {
        let body = html! {
            @if self.user.is_some() {
                a.new-post href="/blog/newpost" { "new post" }
            }
            @for post in self.posts {
                (post_article(post))
            }
        };
        layout(self.user, "CS 253 Blog", body)
    }
}

pub struct PermalinkPage<'a> {
    pub user: Option<&'a str>,
    pub post: &'a Post,
    pub comments: &'a [Comment],
    pub error: Option<&'a str>,
}

impl PermalinkPage<'_> {
    pub fn render(&self) -> Html<String> {
        let post = self.post;
        let body = html! {
            (post_article(post))
            @match self.user {
                Some(name) if post.is_authored_by(name) => {
                    div.post-actions {
                        a href={ "/blog/edit/" (post.id) } { "edit" }
                        " "
                        a href={ "/blog/delete/" (post.id) } { "delete" }
                    }
                }
                Some(name) => {
                    div.post-actions {
                        a href={ "/blog/likes/" (post.id) } {
                            @if post.is_liked_by(name) { "unlike" } @else { "like" }
                        }
                    }
                }
                None => {}
            }
            (error_line(self.error))
            section.comments {
                @for comment in self.comments {
                    div.comment {
                        div.comment-author { (comment.author) }
                        div.comment-content { (text_with_breaks(&comment.content)) }
                        @if self.user.is_some_and(|name| comment.is_authored_by(name)) {
                            a href={ "/blog/editcomment/" (comment.id) } { "edit" }
                            " "
                            a href={ "/blog/deletecomment/" (comment.id) } { "delete" }
                        }
                    }
                }
                @if self.user.is_some() {
                    a.new-comment href={ "/blog/newcomment/" (post.id) } { "add a comment" }
                }
            }
        };
        layout(self.user, &post.subject, body)
    }
}

/// Used for both new and edit post; `action` decides where the form posts.
pub struct PostFormPage<'a> {
    pub user: Option<&'a str>,
    pub heading: &'a str,
    pub action: String,
    pub subject: &'a str,
    pub content: &'a str,
    pub error: Option<&'a str>,
}

impl PostFormPage<'_> {
    pub fn render(&self) -> Html<String> {
        let body = html! {
            h2 { (self.heading) }
            form method="post" action=(self.action) {
                label { "subject" br; input type="text" name="subject" value=(self.subject); }
                label { "content" br; textarea name="content" { (self.content) } }
                (error_line(self.error))
                input type="submit";
            }
        };
        layout(self.user, self.heading, body)
    }
}

pub struct CommentFormPage<'a> {
    pub user: Option<&'a str>,
    pub post: &'a Post,
    pub action: String,
    pub content: &'a str,
    pub error: Option<&'a str>,
}

impl CommentFormPage<'_> {
    pub fn render(&self) -> Html<String> {
        let body = html! {
            (post_article(self.post))
            h3 { "comment" }
            form method="post" action=(self.action) {
                textarea name="content" { (self.content) }
                (error_line(self.error))
                input type="submit";
            }
        };
        layout(self.user, &self.post.subject, body)
    }
}

#[derive(Default)]
pub struct SignupPage<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub errors: SignupErrors,
}

fn field_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(e) = error {
            span.error { (e) }
        }
    }
}

impl SignupPage<'_> {
    pub fn render(&self) -> Html<String> {
        let body = html! {
            h2 { "Signup" }
            form method="post" action="/signup" {
                label { "Username " input type="text" name="username" value=(self.username); }
                (field_error(self.errors.username)) br;
                label { "Password " input type="password" name="password"; }
                (field_error(self.errors.password)) br;
                label { "Verify Password " input type="password" name="verify"; }
                (field_error(self.errors.verify)) br;
                label { "Email (optional) " input type="text" name="email" value=(self.email); }
                (field_error(self.errors.email)) br;
                input type="submit";
            }
        };
        layout(None, "Signup", body)
    }
}

#[derive(Default)]
pub struct LoginPage<'a> {
    pub error: Option<&'a str>,
}

impl LoginPage<'_> {
    pub fn render(&self) -> Html<String> {
        let body = html! {
            h2 { "Login" }
            form method="post" action="/login" {
                label { "Username " input type="text" name="username"; } br;
                label { "Password " input type="password" name="password"; } br;
                (error_line(self.error))
                input type="submit";
            }
        };
        layout(None, "Login", body)
    }
}
