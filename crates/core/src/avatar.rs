//! Letter avatars and Libravatar URLs for users without an uploaded photo.

use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;

/// Characters left untouched by JavaScript's `encodeURIComponent`.
pub const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const LIBRAVATAR_BASE: &str = "https://cdn.libravatar.org/avatar/";

/// Edge length of the generated SVG in pixels.
const AVATAR_SIZE: u32 = 96;

/// Server-side settings consulted when building avatar URLs.
#[derive(Debug, Clone, Copy)]
pub struct AvatarSettings<'a> {
    /// Public base URL of this server, without a trailing slash.
    pub server_url: &'a str,
    /// Whether hashed-email Libravatar URLs may be handed out.
    pub allow_gravatar: bool,
}

/// Percent-encode a string the way `encodeURIComponent` does.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Render a square SVG avatar showing the first letter of `name`.
///
/// The background colour is derived from the name, so the output is stable
/// across calls and restarts.
pub fn generate_avatar(name: &str) -> String {
    let color = avatar_color(name);
    let letter: String = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    let letter = escape_xml(&letter);
    let size = AVATAR_SIZE;
    let center = size / 2;

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#,
            r#"<svg xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://www.w3.org/2000/svg" height="{size}" width="{size}" version="1.1" viewBox="0 0 {size} {size}">"#,
            r#"<g>"#,
            r#"<rect width="{size}" height="{size}" fill="{color}" />"#,
            r##"<text font-size="64px" font-family="sans-serif" text-anchor="middle" fill="#ffffff">"##,
            r##"<tspan x="{center}" y="72" stroke-width=".26458px" fill="#ffffff">{letter}</tspan>"##,
            r#"</text>"#,
            r#"</g>"#,
            r#"</svg>"#,
        ),
        size = size,
        center = center,
        color = color,
        letter = letter,
    )
}

/// Build the avatar URL for a user.
///
/// With an email and Gravatar allowed, the Libravatar CDN is used (400px when
/// `big`, 96px otherwise). Otherwise the locally served SVG is referenced,
/// keyed by the name, the email local part, or the email hash, in that order.
pub fn avatar_url(name: &str, email: &str, big: bool, settings: AvatarSettings<'_>) -> String {
    let digest = format!("{:x}", Md5::digest(email.to_lowercase().as_bytes()));

    if !email.is_empty() && settings.allow_gravatar {
        let size = if big { 400 } else { 96 };
        return format!("{LIBRAVATAR_BASE}{digest}?s={size}");
    }

    let encoded_name = encode_uri_component(name);
    let local_part = email.rfind('@').map(|at| &email[..at]).unwrap_or("");
    let segment = [encoded_name.as_str(), local_part]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(digest.as_str());

    format!("{}/user/{segment}/avatar.svg", settings.server_url)
}

/// Pick a dark colour deterministically from `seed`.
///
/// Hue spans the full wheel; saturation and value are confined to a band
/// that keeps white text readable.
pub fn avatar_color(seed: &str) -> String {
    let hash = Sha256::digest(seed.as_bytes());
    let hue = f64::from(u16::from_be_bytes([hash[0], hash[1]]) % 360);
    let saturation = f64::from(55 + hash[2] % 46) / 100.0;
    let value = f64::from(25 + hash[3] % 21) / 100.0;

    let (r, g, b) = hsv_to_rgb(hue, saturation, value);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    let scale = |c: f64| ((c + m) * 255.0).round() as u8;
    (scale(r), scale(g), scale(b))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
