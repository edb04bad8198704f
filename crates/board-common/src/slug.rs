//! Column identity rules.
//!
//! The server stores columns as an ordered list of titles only, so a column's
//! id is recomputed from its title text on every load. Two columns with the
//! same title therefore share an id.

/// Lowercase the title and collapse every run of non-alphanumeric characters
/// into a single `-`, trimming dashes at both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Id for the column at `index` with the given title: its slug, or
/// `column-{index}` when the title has no alphanumeric characters.
pub fn column_id(title: &str, index: usize) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("column-{}", index)
    } else {
        slug
    }
}
