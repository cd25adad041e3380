use crate::models::UserIdentity;

pub(super) const LOGIN_PAGE: &str =
    r#"<h1>Google Login Demo</h1><a href="/login">Login with Google</a>"#;

pub(super) fn welcome_page(user: &UserIdentity) -> String {
    let data = serde_json::to_string_pretty(user).unwrap_or_default();
    format!(
        r#"<h1>Welcome {}</h1><img src="{}" style="height:80px;border-radius:50%;"><pre>{}</pre><a href="/logout">Logout</a>"#,
        escape_html(&user.display_name),
        escape_html(&user.picture_url),
        escape_html(&data),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_page_escapes_profile_fields() {
        let user = UserIdentity {
            email: "a@x.com".into(),
            display_name: "<script>".into(),
            picture_url: "\" onerror=\"x".into(),
        };
        let page = welcome_page(&user);
        assert!(page.contains("Welcome &lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&quot; onerror=&quot;x"));
    }
}
