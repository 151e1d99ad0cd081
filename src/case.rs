//! Case conversion for generated identifiers: one canonical scheme shared by every artifact.

use serde::Serialize;

/// Split an identifier into lowercase words.
/// e.g. "userId" -> ["user", "id"], "created_at" -> ["created", "at"], "HTTPServer" -> ["http", "server"]
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut cur = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            continue;
        }
        if c.is_uppercase() && !cur.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(std::mem::take(&mut cur));
            }
        }
        cur.extend(c.to_lowercase());
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

fn capitalize(w: &str) -> String {
    let mut chars = w.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "book_author" -> "BookAuthor"
pub fn to_pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// "book_author" -> "bookAuthor"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, w) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// "BookAuthor" -> "book-author"
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}

/// "BookAuthor" -> "book_author"
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Naive English plural of the last word: "category" -> "categories", "box" -> "boxes", "book" -> "books".
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    let ends_with_consonant_y = lower.ends_with('y')
        && !matches!(lower.chars().rev().nth(1), Some('a' | 'e' | 'i' | 'o' | 'u'));
    if ends_with_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|e| lower.ends_with(e)) {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// Every casing of one name that templates may ask for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameForms {
    pub pascal: String,
    pub camel: String,
    pub kebab: String,
    pub snake: String,
    /// Kebab-case plural, used for endpoint paths.
    pub plural: String,
    pub plural_camel: String,
}

impl NameForms {
    pub fn new(raw: &str) -> Self {
        let kebab = to_kebab_case(raw);
        let plural = pluralize(&kebab);
        NameForms {
            pascal: to_pascal_case(raw),
            camel: to_camel_case(raw),
            snake: to_snake_case(raw),
            plural_camel: to_camel_case(&plural),
            kebab,
            plural,
        }
    }
}
