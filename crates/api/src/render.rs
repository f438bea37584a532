//! HTML pages served for notes.
//!
//! Markdown is not rendered server-side: pages embed the escaped source for
//! the browser bundle to pick up.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::notes::{PageUser, PublishData};

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// The collaborative editor shell.
pub fn render_editor_page(title: &str, opengraph: &BTreeMap<String, String>) -> String {
    let mut og_tags = String::new();
    for (property, content) in opengraph {
        let _ = writeln!(
            og_tags,
            r#"    <meta property="og:{}" content="{}">"#,
            escape_html(property),
            escape_html(content)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
{og_tags}</head>
<body>
    <div id="editor" data-realtime="/realtime"></div>
    <script src="/build/editor.js" defer></script>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// The read-only published view.
pub fn render_publish_page(data: &PublishData) -> String {
    render_page(data, "publish", "pretty.js")
}

/// The slide-deck view.
pub fn render_slide_page(data: &PublishData) -> String {
    render_page(data, "slide", "slide.js")
}

fn render_page(data: &PublishData, kind: &str, script: &str) -> String {
    let mut head = String::new();
    if !data.description.is_empty() {
        let _ = writeln!(
            head,
            r#"    <meta name="description" content="{}">"#,
            escape_html(&data.description)
        );
    }
    if let Some(robots) = &data.robots {
        let _ = writeln!(head, r#"    <meta name="robots" content="{}">"#, escape_html(robots));
    }
    if !data.tags.is_empty() {
        let _ = writeln!(
            head,
            r#"    <meta name="keywords" content="{}">"#,
            escape_html(&data.tags.join(", "))
        );
    }

    let lang = data.lang.as_deref().unwrap_or("en");
    let dir = data.dir.as_deref().unwrap_or("ltr");

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
{head}</head>
<body>
    <div class="{kind}-info">
        {owner}{last_change}<span class="viewcount">{view_count} views</span>
        <time class="createtime" datetime="{created}">{created}</time>
        <time class="updatetime" datetime="{updated}">{updated}</time>
    </div>
    <pre id="doc" class="markdown-body {kind}">{body}</pre>
    <script src="/build/{script}" defer></script>
</body>
</html>
"#,
        lang = escape_html(lang),
        dir = escape_html(dir),
        title = escape_html(&data.title),
        owner = user_badge("owner", data.owner.as_ref()),
        last_change = user_badge("lastchange", data.last_change_user.as_ref()),
        view_count = data.view_count,
        created = data.created_at.to_rfc3339(),
        updated = data.updated_at.to_rfc3339(),
        body = escape_html(&data.body),
    )
}

fn user_badge(class: &str, user: Option<&PageUser>) -> String {
    match user {
        Some(user) => format!(
            r#"<span class="{class}"><img class="avatar" src="{photo}" alt=""> {name}</span> "#,
            photo = escape_html(&user.photo),
            name = escape_html(&user.name),
        ),
        None => String::new(),
    }
}
