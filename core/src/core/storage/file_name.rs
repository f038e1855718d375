use crate::model::MediaFile;

const MAX_EXTENSION_LEN: usize = 10;

/// File name to store an upload under: `{media id}_{file id}_{slug}.{ext}`.
///
/// The ids make it unique, the slug makes it recognizable. Only the
/// extension of `hint` (the client supplied file name) is used, so path
/// tricks in the upload name have no effect.
pub fn safe_file_name(media_file: &MediaFile, hint: Option<&str>) -> String {
    let slug = slugify(&media_file.media_slug);
    let slug = if slug.is_empty() { "media" } else { &slug };
    match hint.and_then(extension) {
        Some(ext) => format!(
            "{}_{}_{}.{}",
            media_file.media_id.0, media_file.id.0, slug, ext
        ),
        None => format!("{}_{}_{}", media_file.media_id.0, media_file.id.0, slug),
    }
}

fn extension(hint: &str) -> Option<String> {
    let base_name = hint.rsplit(['/', '\\']).next().unwrap_or(hint);
    let (stem, ext) = base_name.rsplit_once('.')?;
    if stem.is_empty() {
        // dotfile, no extension
        return None;
    }
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        None
    } else {
        Some(ext)
    }
}

fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
