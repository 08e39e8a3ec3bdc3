//! Name normalisation shared by registration and resume file naming.

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"o'NEIL-smith"` becomes `"O'Neil-Smith"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Turns a person's name into one path-safe segment: separators and control
/// characters are dropped, words are title-cased and joined with `_`.
pub fn name_segment(name: &str, fallback: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, '/' | '\\') && !c.is_control())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .map(|word| title_case(&word))
        .collect();

    if words.is_empty() {
        fallback.to_string()
    } else {
        words.join("_")
    }
}

/// `{Last}_{First}_Resume.pdf`
pub fn resume_file_name(first_name: &str, last_name: &str) -> String {
    format!(
        "{}_{}_Resume.pdf",
        name_segment(last_name, "Last"),
        name_segment(first_name, "First")
    )
}
