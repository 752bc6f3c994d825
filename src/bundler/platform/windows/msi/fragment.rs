//! WiX include fragment generation.
//!
//! Mirrors the staged `lib/` and `share/` trees as nested `Directory`
//! elements with one `Component` per file, followed by one `Component` per
//! runtime DLL at the staging root. The installer template pulls the result
//! in with `<?include libraries.wxi ?>` inside its install directory.

use super::{dependencies::ResolvedDependencies, template::render_markup};
use crate::bundler::error::{Error, ErrorExt, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{
    collections::HashSet,
    path::{Component, Path},
};

/// Staged subtrees mirrored into the fragment.
pub const MIRRORED_ROOTS: &[&str] = &["lib", "share"];

pub const FRAGMENT_TEMPLATE: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<!-- Generated by kodegen_bundler_msi -->
<Include>
{{#each elements}}
{{#if open}}
{{pad}}<Directory Id='{{id}}' Name='{{name}}'>
{{/if}}
{{#if close}}
{{pad}}</Directory>
{{/if}}
{{#if file}}
{{pad}}<Component Feature='Complete' Guid='*'>
{{pad}}    <File Id='{{id}}' Name='{{name}}' Source='{{source}}' />
{{pad}}</Component>
{{/if}}
{{/each}}
</Include>
"#;

/// WiX identifiers are limited to 72 characters.
const MAX_ID_LEN: usize = 72;
const PREFIX_LEN: usize = 48;
const HASH_LEN: usize = 8;

/// Hands out WiX identifiers that are unique within one document.
///
/// An identifier is `<kind>_<readable>_<hash>` where `readable` is the
/// relative path with every character outside `[A-Za-z0-9_]` replaced by
/// `_` and `hash` is the start of the SHA-256 of the path, so the same tree
/// always yields the same ids. If an id is already taken a counter suffix is
/// appended.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
}

impl IdAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh identifier for `rel_path`.
    ///
    /// `kind` must start with an ASCII letter.
    pub fn allocate(&mut self, kind: &str, rel_path: &str) -> String {
        let readable: String = rel_path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .take(PREFIX_LEN)
            .collect();
        let digest = format!("{:x}", Sha256::digest(rel_path.as_bytes()));
        let base = format!("{}_{}_{}", kind, readable, &digest[..HASH_LEN]);
        debug_assert!(base.len() + 8 <= MAX_ID_LEN);

        let mut id = base.clone();
        let mut n = 1u32;
        while !self.issued.insert(id.clone()) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        id
    }
}

/// Escapes a value for a single-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `rel` with `/` separators regardless of host.
fn slash_path(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// One line group of the fragment, in document order.
#[derive(Debug, Default, Serialize)]
struct Element {
    open: bool,
    close: bool,
    file: bool,
    pad: String,
    id: String,
    name: String,
    source: String,
}

impl Element {
    fn open_directory(depth: usize, id: String, name: String) -> Self {
        Self {
            open: true,
            pad: indent(depth),
            id,
            name,
            ..Default::default()
        }
    }

    fn close_directory(depth: usize) -> Self {
        Self {
            close: true,
            pad: indent(depth),
            ..Default::default()
        }
    }

    fn file(depth: usize, id: String, name: String, source: &Path) -> Self {
        Self {
            file: true,
            pad: indent(depth),
            id,
            name,
            source: source.display().to_string(),
            ..Default::default()
        }
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(4 * depth)
}

/// Renders the fragment for the staging tree at `out_dir`.
pub fn render(out_dir: &Path, dependencies: &ResolvedDependencies) -> Result<String> {
    let mut ids = IdAllocator::new();
    let mut elements = Vec::new();

    for root in MIRRORED_ROOTS {
        let subtree = out_dir.join(root);
        if !subtree.is_dir() {
            log::debug!("{} not staged, nothing to mirror", subtree.display());
            continue;
        }

        let mut open = 0usize;
        for entry in walkdir::WalkDir::new(&subtree).sort_by_file_name() {
            let entry = entry?;
            let depth = entry.depth();
            while open > depth {
                elements.push(Element::close_directory(open));
                open -= 1;
            }

            let rel = slash_path(entry.path().strip_prefix(out_dir)?);
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_dir() {
                let id = ids.allocate("d", &rel);
                elements.push(Element::open_directory(depth + 1, id, name));
                open += 1;
            } else {
                let id = ids.allocate("f", &rel);
                elements.push(Element::file(depth + 1, id, name, entry.path()));
            }
        }
        while open > 0 {
            elements.push(Element::close_directory(open));
            open -= 1;
        }
    }

    for file_name in dependencies.file_names() {
        let id = ids.allocate("l", file_name);
        let source = out_dir.join(file_name);
        elements.push(Element::file(1, id, file_name.to_string(), &source));
    }

    render_markup(
        "libraries.wxi",
        FRAGMENT_TEMPLATE,
        &serde_json::json!({ "elements": elements }),
    )
}

/// Renders the fragment and writes it to `dest`.
pub async fn write(out_dir: &Path, dependencies: &ResolvedDependencies, dest: &Path) -> Result<()> {
    let out = out_dir.to_path_buf();
    let deps = dependencies.clone();
    let xml = tokio::task::spawn_blocking(move || render(&out, &deps))
        .await
        .map_err(|e| Error::GenericError(format!("Fragment task panicked: {}", e)))??;

    tokio::fs::write(dest, xml)
        .await
        .fs_context("writing WiX fragment", dest)?;
    log::info!("Generated {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_valid_wix_identifiers() {
        let mut ids = IdAllocator::new();
        let id = ids.allocate("f", "share/icons/Adwaita/scalable/ui/window-close-symbolic.svg");
        assert!(id.len() <= MAX_ID_LEN);
        assert!(id.starts_with("f_share_icons_Adwaita_"));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn similar_names_do_not_collide() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate("f", "lib/a-b.txt");
        let b = ids.allocate("f", "lib/a_b.txt");
        let c = ids.allocate("f", "lib/a.b.txt");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn repeated_path_gets_counter() {
        let mut ids = IdAllocator::new();
        let first = ids.allocate("f", "lib/x");
        let second = ids.allocate("f", "lib/x");
        assert_eq!(second, format!("{first}_1"));
    }

    #[test]
    fn ids_are_stable_across_runs() {
        let a = IdAllocator::new().allocate("d", "share/icons");
        let b = IdAllocator::new().allocate("d", "share/icons");
        assert_eq!(a, b);
    }

    #[test]
    fn escapes_attribute_values() {
        assert_eq!(escape_attr("it's <a&b>"), "it&apos;s &lt;a&amp;b&gt;");
    }
}
