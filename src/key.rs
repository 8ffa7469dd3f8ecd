use crate::error::KeyError;

/// Reads a single ASCII letter, ignoring surrounding whitespace, and upper-cases it.
pub fn parse_letter(input: &str) -> Result<char, KeyError> {
    let input = input.trim();
    let mut chars = input.chars();
    let first = chars.next().ok_or(KeyError::Empty)?;
    if chars.next().is_some() {
        return Err(KeyError::TooLong(input.to_string()));
    }
    if !first.is_ascii_alphabetic() {
        return Err(KeyError::NotALetter(first));
    }
    Ok(first.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters() {
        assert_eq!(parse_letter("a"), Ok('A'));
        assert_eq!(parse_letter(" Q\n"), Ok('Q'));
    }

    #[test]
    fn rejects() {
        assert_eq!(parse_letter(""), Err(KeyError::Empty));
        assert_eq!(parse_letter("   "), Err(KeyError::Empty));
        assert_eq!(parse_letter("ab"), Err(KeyError::TooLong("ab".to_string())));
        assert_eq!(parse_letter("7"), Err(KeyError::NotALetter('7')));
        assert_eq!(parse_letter("é"), Err(KeyError::NotALetter('é')));
    }
}
