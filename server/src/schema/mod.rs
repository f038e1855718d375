pub mod id_types;
pub mod player;
pub mod storage;
pub use id_types::*;
pub use player::*;
pub use storage::*;

/// `snake_case` to `camelCase`, used for OpenAPI operation ids and for
/// field paths in error responses.
pub fn to_camel_case(s: &str) -> String {
    let mut cs = String::new();
    cs.reserve(s.len());
    let mut it = s.chars().peekable();
    while let Some(c) = it.next() {
        match (c, it.peek()) {
            ('_', Some(nc)) if *nc != '_' => {
                cs.push(nc.to_ascii_uppercase());
                let _ = it.next(); // consume nc
            }
            (c, _) => {
                cs.push(c);
            }
        }
    }
    cs
}
