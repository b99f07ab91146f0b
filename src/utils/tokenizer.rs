/// Separator used between words of the screaming-snake form
const SEPARATOR: char = '_';

/// Splits a canonical resource name into ordered, upper-case alphabetic tokens.
///
/// Word boundaries come from separators (anything that is not an ASCII letter
/// or digit), lower-to-upper case changes, letter/digit transitions and the end
/// of an upper-case run (`JSONData` gives `JSON`, `DATA`). Tokens made only of
/// digits are dropped, so the result may be empty.
pub fn tokenize(name: &str) -> Vec<String> {
    to_screaming_snake(name)
        .split(SEPARATOR)
        .filter(|token| !token.is_empty() && !is_numeric(token))
        .map(str::to_string)
        .collect()
}

/// Converts a name to `SCREAMING_SNAKE` form with runs of separators collapsed
pub fn to_screaming_snake(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    let mut snake = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            push_separator(&mut snake);
            continue;
        }

        if i > 0 && starts_new_word(chars[i - 1], c, chars.get(i + 1).copied()) {
            push_separator(&mut snake);
        }

        snake.push(c.to_ascii_uppercase());
    }

    if snake.ends_with(SEPARATOR) {
        snake.pop();
    }

    snake
}

fn starts_new_word(prev: char, current: char, next: Option<char>) -> bool {
    (prev.is_ascii_lowercase() && current.is_ascii_uppercase())
        || (prev.is_ascii_alphabetic() && current.is_ascii_digit())
        || (prev.is_ascii_digit() && current.is_ascii_alphabetic())
        || (prev.is_ascii_uppercase()
            && current.is_ascii_uppercase()
            && next.is_some_and(|n| n.is_ascii_lowercase()))
}

fn push_separator(snake: &mut String) {
    if !snake.is_empty() && !snake.ends_with(SEPARATOR) {
        snake.push(SEPARATOR);
    }
}

fn is_numeric(token: &str) -> bool {
    token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_cloud_provider_name() {
        let tokens = tokenize("gke_elated-pottery-310110_us-central1-c_dwertent");
        assert_eq!(
            tokens,
            vec!["GKE", "ELATED", "POTTERY", "US", "CENTRAL", "C", "DWERTENT"]
        );
    }

    #[test]
    fn test_tokenize_drops_numeric_tokens() {
        assert_eq!(
            tokenize("77-gke_elated-pottery-12"),
            tokenize("gke_elated-pottery")
        );
    }

    #[test]
    fn test_tokenize_case_boundaries() {
        assert_eq!(tokenize("myCluster2Prod"), vec!["MY", "CLUSTER", "PROD"]);
        assert_eq!(tokenize("JSONData"), vec!["JSON", "DATA"]);
        assert_eq!(tokenize("aws.EKS  prod"), vec!["AWS", "EKS", "PROD"]);
    }

    #[test]
    fn test_tokenize_degenerate_names() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("---__--").is_empty());
        assert!(tokenize("310110-42_7").is_empty());
    }

    #[test]
    fn test_screaming_snake_collapses_separators() {
        assert_eq!(to_screaming_snake("__a--b__"), "A_B");
        assert_eq!(to_screaming_snake("us-central1"), "US_CENTRAL_1");
    }
}
