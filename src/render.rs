// SPDX-License-Identifier: AGPL-3.0-or-later
//! Static results page: collected rows inlined as JSON into an HTML template.
//!
//! The template holds exactly one `%s` placeholder; a literal percent sign
//! is written `%%`.
//!
//! # Examples
//!
//! ```
//! use cpuisfast::render::render_page;
//! use cpuisfast::store::CollectedRow;
//!
//! let rows = vec![CollectedRow { model: Some("Apple M2".into()), ..Default::default() }];
//! let page = render_page("<div style=\"width:100%%\"></div><script>var cpus = %s;</script>", &rows).unwrap();
//! assert!(page.starts_with("<div style=\"width:100%\">"));
//! assert!(page.contains("\"model\":\"Apple M2\""));
//! ```

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::store::{self, CollectedRow};

/// Default collection file read by `render`.
pub const DEFAULT_DATA_PATH: &str = "data.csv";

/// Default page template.
pub const DEFAULT_TEMPLATE_PATH: &str = "template.html";

/// Default rendered page.
pub const DEFAULT_OUTPUT_PATH: &str = "dist/index.html";

/// Replace the single `%s` in `template` with `value`, unescaping `%%`.
pub fn substitute(template: &str, value: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut placeholders = 0usize;
    let mut chars = template.char_indices();

    while let Some((pos, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '%')) => out.push('%'),
            Some((_, 's')) => {
                placeholders += 1;
                if placeholders > 1 {
                    return Err(Error::Template(format!(
                        "more than one %s placeholder (second at byte {})",
                        pos
                    )));
                }
                out.push_str(value);
            }
            Some((_, other)) => {
                return Err(Error::Template(format!(
                    "unsupported format character '{}' at byte {}",
                    other, pos
                )));
            }
            None => {
                return Err(Error::Template("incomplete format at end of template".into()));
            }
        }
    }

    if placeholders == 0 {
        return Err(Error::Template("no %s placeholder in template".into()));
    }
    Ok(out)
}

/// JSON array of rows, safe to embed inside a `<script>` element.
pub fn rows_json(rows: &[CollectedRow]) -> Result<String> {
    Ok(serde_json::to_string(rows)?.replace("</", "<\\/"))
}

/// Render the page for `rows`.
pub fn render_page(template: &str, rows: &[CollectedRow]) -> Result<String> {
    substitute(template, &rows_json(rows)?)
}

/// Read `data`, render it through `template` and write `output`.
///
/// Returns the number of rows rendered.
pub fn render_site(
    data: impl AsRef<Path>,
    template: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize> {
    let rows = store::read_rows(data)?;

    let template = fs::read_to_string(template.as_ref())?;
    let page = render_page(&template, &rows)?;

    let output = output.as_ref();
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, page)?;

    log::info!("Rendered {} rows into {}", rows.len(), output.display());
    Ok(rows.len())
}
