/// Turn a chapter title into a safe file stem
///
/// Quotes, punctuation and shell-special characters are dropped, `&` becomes
/// `and`, `/` and `.` become spaces, and whitespace runs collapse to one space.
pub fn sanitize_group_name(title: &str) -> String {
    let mut cleaned = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '/' | '.' => cleaned.push(' '),
            '&' => cleaned.push_str("and"),
            '\'' | '"' | ':' | '?' | '\\' | '|' | '*' | '<' | '>' | ',' | ';' | '!' | '@' | '#'
            | '$' | '%' | '^' | '(' | ')' | '[' | ']' | '{' | '}' | '=' | '+' => {}
            other => cleaned.push(other),
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_group_name() {
        assert_eq!(sanitize_group_name("Chapter 1: The Beginning"), "Chapter 1 The Beginning");
        assert_eq!(sanitize_group_name("Tom & Jerry's \"Big\" Day!"), "Tom and Jerrys Big Day");
        assert_eq!(sanitize_group_name("Part 2/Vol. 3"), "Part 2 Vol 3");
        assert_eq!(sanitize_group_name("  (Prologue)  [draft] "), "Prologue draft");
        assert_eq!(sanitize_group_name("Café, Été"), "Café Été");
        assert_eq!(sanitize_group_name("?!*"), "");
    }
}
