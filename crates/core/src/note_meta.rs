//! Front-matter extraction and the titles and Open Graph data derived from it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value as YamlValue;

/// Site name appended to page titles.
pub const SITE_NAME: &str = "Notewell";

/// Title shown for notes that have none.
pub const UNTITLED: &str = "Untitled";

/// Maximum length of a derived description.
const MAX_DESCRIPTION_LENGTH: usize = 200;

static FRONT_MATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?(?:---|\.\.\.)[ \t]*(?:\r?\n|\z)")
        .expect("valid regex")
});

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(.+?)\s*#*\s*$").expect("valid regex"));

/// Note content split into its YAML front matter and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMeta {
    /// Parsed front matter; an empty mapping when absent or malformed.
    pub meta: serde_yaml::Mapping,
    /// Content following the front matter.
    pub body: String,
}

/// Typed view of the front-matter keys the server acts on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub robots: Option<String>,
    pub lang: Option<String>,
    pub dir: Option<String>,
    pub breaks: Option<bool>,
    pub opengraph: BTreeMap<String, String>,
}

/// Split `content` into front matter and body.
///
/// Malformed YAML is treated as if there were no front matter, leaving the
/// whole content as body.
pub fn extract_meta(content: &str) -> ExtractedMeta {
    let Some(caps) = FRONT_MATTER_RE.captures(content) else {
        return ExtractedMeta {
            meta: serde_yaml::Mapping::new(),
            body: content.to_string(),
        };
    };

    let yaml = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(0).map_or(0, |m| m.end());

    let meta = if yaml.trim().is_empty() {
        Some(serde_yaml::Mapping::new())
    } else {
        match serde_yaml::from_str::<YamlValue>(yaml) {
            Ok(YamlValue::Mapping(map)) => Some(map),
            Ok(YamlValue::Null) => Some(serde_yaml::Mapping::new()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed front matter");
                None
            }
        }
    };

    match meta {
        Some(meta) => ExtractedMeta {
            meta,
            body: content[end..].to_string(),
        },
        None => ExtractedMeta {
            meta: serde_yaml::Mapping::new(),
            body: content.to_string(),
        },
    }
}

/// Pick the recognised keys out of a front-matter mapping.
///
/// Values of the wrong type are ignored rather than rejected.
pub fn parse_meta(meta: &serde_yaml::Mapping) -> NoteMeta {
    let string = |key: &str| meta.get(key).and_then(scalar_to_string);

    let tags = match meta.get("tags") {
        Some(YamlValue::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(YamlValue::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let opengraph = match meta.get("opengraph") {
        Some(YamlValue::Mapping(map)) => map
            .iter()
            .filter_map(|(k, v)| Some((k.as_str()?.to_string(), scalar_to_string(v)?)))
            .collect(),
        _ => BTreeMap::new(),
    };

    NoteMeta {
        title: string("title"),
        description: string("description"),
        tags,
        robots: string("robots"),
        lang: string("lang"),
        dir: string("dir").filter(|d| d == "ltr" || d == "rtl"),
        breaks: meta.get("breaks").and_then(YamlValue::as_bool),
        opengraph,
    }
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Title for display: the stored title, or [`UNTITLED`] when empty.
pub fn decode_title(title: &str) -> String {
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Title for the HTML `<title>` element.
pub fn generate_web_title(title: &str) -> String {
    if title.is_empty() {
        format!("{SITE_NAME} - Collaborative markdown notes")
    } else {
        format!("{title} - {SITE_NAME}")
    }
}

/// Derive the stored title from note content.
///
/// Front-matter `title` wins, then the first level-one heading.
pub fn generate_title(content: &str) -> String {
    let extracted = extract_meta(content);
    if let Some(title) = parse_meta(&extracted.meta).title.filter(|t| !t.is_empty()) {
        return title;
    }
    extracted
        .body
        .lines()
        .find_map(|line| HEADING_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Derive a short description: front-matter `description`, else the first
/// line of prose, truncated.
pub fn generate_description(content: &str) -> String {
    let extracted = extract_meta(content);
    if let Some(description) = parse_meta(&extracted.meta).description {
        return description;
    }
    let line = extracted
        .body
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("```"))
        .unwrap_or("");
    line.chars().take(MAX_DESCRIPTION_LENGTH).collect()
}

/// Build the Open Graph properties for a note page.
///
/// Explicit `opengraph` entries in the front matter win; `title` and `type`
/// are always present, `description` when the note has one.
pub fn parse_opengraph(meta: &NoteMeta, title: &str) -> BTreeMap<String, String> {
    let mut og = meta.opengraph.clone();
    og.entry("title".to_string())
        .and_modify(|t| {
            if t.is_empty() {
                *t = title.to_string();
            }
        })
        .or_insert_with(|| title.to_string());
    if let Some(description) = meta.description.as_ref().filter(|d| !d.is_empty()) {
        og.entry("description".to_string())
            .or_insert_with(|| description.clone());
    }
    og.entry("type".to_string())
        .or_insert_with(|| "website".to_string());
    og
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "---\ntitle: Weekly sync\ntags: [meeting, team]\ndescription: Notes from the sync\nopengraph:\n  image: https://example.com/a.png\n---\n# Heading\n\nBody text\n";

    #[test]
    fn front_matter_is_split_from_body() {
        let extracted = extract_meta(NOTE);
        assert_eq!(extracted.body, "# Heading\n\nBody text\n");
        assert_eq!(
            extracted.meta.get("title").and_then(YamlValue::as_str),
            Some("Weekly sync")
        );
    }

    #[test]
    fn content_without_front_matter_is_all_body() {
        let extracted = extract_meta("# Just a note\n");
        assert!(extracted.meta.is_empty());
        assert_eq!(extracted.body, "# Just a note\n");
    }

    #[test]
    fn malformed_front_matter_is_ignored() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        let extracted = extract_meta(content);
        assert!(extracted.meta.is_empty());
        assert_eq!(extracted.body, content);
    }

    #[test]
    fn empty_front_matter_is_accepted() {
        let extracted = extract_meta("---\n---\nbody");
        assert!(extracted.meta.is_empty());
        assert_eq!(extracted.body, "body");
    }

    #[test]
    fn meta_fields_are_parsed() {
        let meta = parse_meta(&extract_meta(NOTE).meta);
        assert_eq!(meta.title.as_deref(), Some("Weekly sync"));
        assert_eq!(meta.tags, vec!["meeting", "team"]);
        assert_eq!(meta.description.as_deref(), Some("Notes from the sync"));
        assert_eq!(
            meta.opengraph.get("image").map(String::as_str),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn comma_separated_tags_are_split() {
        let meta = parse_meta(&extract_meta("---\ntags: a, b ,c\n---\n").meta);
        assert_eq!(meta.tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn invalid_dir_is_dropped() {
        let meta = parse_meta(&extract_meta("---\ndir: sideways\n---\n").meta);
        assert_eq!(meta.dir, None);
    }

    #[test]
    fn titles() {
        assert_eq!(decode_title(""), UNTITLED);
        assert_eq!(decode_title("Plan"), "Plan");
        assert_eq!(generate_web_title("Plan"), "Plan - Notewell");
        assert_eq!(
            generate_web_title(""),
            "Notewell - Collaborative markdown notes"
        );
    }

    #[test]
    fn title_generation_prefers_front_matter_then_heading() {
        assert_eq!(generate_title(NOTE), "Weekly sync");
        assert_eq!(generate_title("intro\n# Release plan #\nmore"), "Release plan");
        assert_eq!(generate_title("no heading here"), UNTITLED);
    }

    #[test]
    fn description_generation() {
        assert_eq!(generate_description(NOTE), "Notes from the sync");
        assert_eq!(generate_description("# Title\n\nFirst line\nSecond"), "First line");
        assert_eq!(generate_description(&"x".repeat(500)).len(), 200);
    }

    #[test]
    fn opengraph_defaults_and_overrides() {
        let meta = parse_meta(&extract_meta(NOTE).meta);
        let og = parse_opengraph(&meta, "Weekly sync - Notewell");
        assert_eq!(og["title"], "Weekly sync - Notewell");
        assert_eq!(og["description"], "Notes from the sync");
        assert_eq!(og["type"], "website");
        assert_eq!(og["image"], "https://example.com/a.png");

        let custom = parse_meta(
            &extract_meta("---\nopengraph:\n  title: Custom\n  type: article\n---\n").meta,
        );
        let og = parse_opengraph(&custom, "Fallback");
        assert_eq!(og["title"], "Custom");
        assert_eq!(og["type"], "article");
        assert!(!og.contains_key("description"));
    }
}
